//! Live direction switching for editable fields.
//!
//! [`InputBinder`] runs against a [`HostPage`]: a headless document plus the
//! event, observer, store and timer plumbing a browser page would provide.

pub mod binder;
pub mod dom;
pub mod host;

pub use binder::{BinderConfig, ClassNames, EDITABLE_SELECTOR, InputBinder};
pub use dom::Document;
pub use host::{
    Capabilities, HostEvent, HostListener, HostPage, InputEventKind, ListenerHandle,
    MutationRecord, ObserverHandle, StoreSubscription, TimerId,
};

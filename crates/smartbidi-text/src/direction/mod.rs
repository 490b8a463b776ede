//! Direction decisions for classified text.
//!
//! A classification maps onto one of three variants (Mixed > RtlOnly > Neutral)
//! unless configuration says the fragment must be left alone.

pub mod decide;
pub mod variant;

pub use decide::{Decision, DirectionConfig, decide};
pub use variant::{DirectionVariant, TextDir};

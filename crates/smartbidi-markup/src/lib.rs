//! HTML/CSS output for SmartBiDi.
//!
//! Turns direction decisions into decorated fragments per content channel,
//! expands `[smartbidi]` shortcodes and renders the forced-RTL zone stylesheet.

pub mod channel;
pub mod escape;
pub mod pipeline;
pub mod shortcode;
pub mod transform;
pub mod zones;

pub use channel::{ChannelPolicies, ChannelPolicy, RenderChannel, UnknownChannel};
pub use pipeline::{BidiPipeline, RenderContext};
pub use transform::{existing_wrapper, transform, wrap};
pub use zones::{Zone, ZoneConfig, render_zone_styles, style_element};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::variant::DirectionVariant;
use crate::script::TextClassification;

/// Switches that gate decoration of server-rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionConfig {
    /// When false every fragment passes through untouched.
    pub enabled: bool,
    /// Skip decoration on administrative surfaces.
    pub admin_bypass: bool,
    /// Treat every fragment as right-to-left regardless of its scripts.
    pub force_rtl: bool,
}

impl DirectionConfig {
    /// Configuration used while typing into live inputs: always on, no bypass.
    pub const fn live_typing() -> Self {
        Self {
            enabled: true,
            admin_bypass: false,
            force_rtl: false,
        }
    }
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self::live_typing()
    }
}

/// Outcome of a direction decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "variant", rename_all = "snake_case")]
pub enum Decision {
    /// Leave the content exactly as it is.
    Passthrough,
    Decorate(DirectionVariant),
}

impl Decision {
    pub fn variant(self) -> Option<DirectionVariant> {
        match self {
            Decision::Passthrough => None,
            Decision::Decorate(variant) => Some(variant),
        }
    }
}

pub fn decide(
    classification: TextClassification,
    config: &DirectionConfig,
    is_admin_context: bool,
) -> Decision {
    if !config.enabled {
        return Decision::Passthrough;
    }
    if is_admin_context && config.admin_bypass {
        trace!("admin surface bypass");
        return Decision::Passthrough;
    }
    if config.force_rtl {
        return Decision::Decorate(DirectionVariant::RtlOnly);
    }
    Decision::Decorate(DirectionVariant::from_classification(classification))
}

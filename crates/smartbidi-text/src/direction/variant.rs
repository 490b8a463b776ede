use std::fmt;

use serde::{Deserialize, Serialize};

use crate::script::TextClassification;

/// Value of a `dir` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDir {
    Rtl,
    Ltr,
    /// Let the consuming bidi layer pick the paragraph direction.
    Auto,
}

impl TextDir {
    pub fn as_str(self) -> &'static str {
        match self {
            TextDir::Rtl => "rtl",
            TextDir::Ltr => "ltr",
            TextDir::Auto => "auto",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rtl" => Some(TextDir::Rtl),
            "ltr" => Some(TextDir::Ltr),
            "auto" => Some(TextDir::Auto),
            _ => None,
        }
    }
}

impl fmt::Display for TextDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionVariant {
    /// RTL and Latin in the same fragment.
    Mixed,
    RtlOnly,
    /// Latin only, or no directional script at all.
    Neutral,
}

impl DirectionVariant {
    pub const MIXED_CLASS: &'static str = "bidi-mixed";
    pub const RTL_ONLY_CLASS: &'static str = "rtl-only";

    pub fn from_classification(c: TextClassification) -> Self {
        match (c.has_rtl, c.has_latin) {
            (true, true) => DirectionVariant::Mixed,
            (true, false) => DirectionVariant::RtlOnly,
            _ => DirectionVariant::Neutral,
        }
    }

    pub fn dir(self) -> TextDir {
        match self {
            DirectionVariant::Mixed => TextDir::Auto,
            DirectionVariant::RtlOnly => TextDir::Rtl,
            DirectionVariant::Neutral => TextDir::Ltr,
        }
    }

    /// CSS class carried by decorated output; neutral text has none.
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            DirectionVariant::Mixed => Some(Self::MIXED_CLASS),
            DirectionVariant::RtlOnly => Some(Self::RTL_ONLY_CLASS),
            DirectionVariant::Neutral => None,
        }
    }

    /// Variant whose wrapper carries `dir`.
    pub fn from_dir(dir: TextDir) -> Self {
        match dir {
            TextDir::Auto => DirectionVariant::Mixed,
            TextDir::Rtl => DirectionVariant::RtlOnly,
            TextDir::Ltr => DirectionVariant::Neutral,
        }
    }
}

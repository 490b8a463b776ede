//! SmartBiDi configuration system
//!
//! Settings come from `smartbidi.toml`, environment variables, or a flat map of
//! plugin options handed over by the hosting CMS. The core never reads or
//! writes persistent storage itself; it works from the snapshot built here.

mod options;

use serde::{Deserialize, Serialize};
use smartbidi_text::{DirectionConfig, ScriptRange};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

pub use options::OPTION_PREFIX;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "smartbidi.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value {value:?} for option {name}")]
    InvalidOption { name: String, value: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SmartBidiConfig {
    /// Content decoration switches
    pub direction: DirectionSection,
    /// RTL detection range for server-rendered content
    pub script: ScriptSection,
    /// Escaping / LTR normalization per content channel
    pub channels: ChannelsSection,
    /// Forced-RTL page zones
    pub zones: ZonesSection,
    /// Live input binder settings
    pub binder: BinderSection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DirectionSection {
    /// Enable automatic BiDi detection (default: true)
    pub enabled: bool,
    /// Leave content untouched on administrative surfaces
    pub admin_bypass: bool,
    /// Wrap all content as RTL regardless of detected text
    pub force_rtl: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScriptSection {
    /// Inclusive upper bound of the RTL range (low bound is always U+0590)
    pub rtl_upper_bound: u32,
}

/// Escaping and normalization policy for one channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ChannelSection {
    /// HTML-escape the raw value before wrapping
    pub escape: bool,
    /// Wrap neutral (Latin-only) text with `dir="ltr"`
    pub normalize_ltr: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChannelsSection {
    pub content: ChannelSection,
    pub title: ChannelSection,
    pub excerpt: ChannelSection,
    pub comment: ChannelSection,
    pub widget: ChannelSection,
    pub shortcode: ChannelSection,
    pub product_name: ChannelSection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ZonesSection {
    pub force_navbar: bool,
    pub force_content: bool,
    pub force_footer: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BinderSection {
    /// Inclusive upper bound of the RTL range used while typing
    pub rtl_upper_bound: u32,
    /// Quiescence window for editor-store driven re-scans, in milliseconds
    pub debounce_ms: u64,
    /// Use the `hebrew-latin-mixed` / `hebrew-only` class names
    pub legacy_class_names: bool,
}

impl Default for DirectionSection {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_bypass: false,
            force_rtl: false,
        }
    }
}

impl Default for ScriptSection {
    fn default() -> Self {
        Self {
            rtl_upper_bound: ScriptRange::HEBREW_ARABIC.high(),
        }
    }
}

impl Default for ChannelsSection {
    fn default() -> Self {
        Self {
            content: ChannelSection::default(),
            title: ChannelSection {
                escape: false,
                normalize_ltr: true,
            },
            excerpt: ChannelSection::default(),
            comment: ChannelSection::default(),
            widget: ChannelSection::default(),
            shortcode: ChannelSection::default(),
            product_name: ChannelSection {
                escape: true,
                normalize_ltr: true,
            },
        }
    }
}

impl Default for BinderSection {
    fn default() -> Self {
        Self {
            rtl_upper_bound: ScriptRange::HEBREW.high(),
            debounce_ms: 300,
            legacy_class_names: false,
        }
    }
}

impl ChannelsSection {
    /// Channel names as used in option keys and the `[channels]` table.
    pub const NAMES: [&'static str; 7] = [
        "content",
        "title",
        "excerpt",
        "comment",
        "widget",
        "shortcode",
        "product_name",
    ];

    pub fn get(&self, name: &str) -> Option<&ChannelSection> {
        match name {
            "content" => Some(&self.content),
            "title" => Some(&self.title),
            "excerpt" => Some(&self.excerpt),
            "comment" => Some(&self.comment),
            "widget" => Some(&self.widget),
            "shortcode" => Some(&self.shortcode),
            "product_name" => Some(&self.product_name),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ChannelSection> {
        match name {
            "content" => Some(&mut self.content),
            "title" => Some(&mut self.title),
            "excerpt" => Some(&mut self.excerpt),
            "comment" => Some(&mut self.comment),
            "widget" => Some(&mut self.widget),
            "shortcode" => Some(&mut self.shortcode),
            "product_name" => Some(&mut self.product_name),
            _ => None,
        }
    }
}

impl SmartBidiConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `smartbidi.toml` from the current directory, or defaults if it is
    /// missing or unusable.
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(error) => {
                warn!(%error, "ignoring unusable {CONFIG_FILE}");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Some(val) = env_flag("SMARTBIDI_ENABLE") {
            self.direction.enabled = val;
        }
        if let Some(val) = env_flag("SMARTBIDI_FORCE_RTL") {
            self.direction.force_rtl = val;
        }
        if let Some(val) = env_flag("SMARTBIDI_ADMIN_BYPASS") {
            self.direction.admin_bypass = val;
        }

        if let Some(val) = env_flag("SMARTBIDI_FORCE_NAVBAR") {
            self.zones.force_navbar = val;
        }
        if let Some(val) = env_flag("SMARTBIDI_FORCE_CONTENT") {
            self.zones.force_content = val;
        }
        if let Some(val) = env_flag("SMARTBIDI_FORCE_FOOTER") {
            self.zones.force_footer = val;
        }

        if let Ok(val) = std::env::var("SMARTBIDI_RTL_UPPER_BOUND") {
            match options::parse_code_point(&val) {
                Some(bound) if ScriptRange::HEBREW.with_high(bound).is_ok() => {
                    self.script.rtl_upper_bound = bound;
                }
                _ => warn!(value = %val, "ignoring invalid SMARTBIDI_RTL_UPPER_BOUND"),
            }
        }
        if let Ok(val) = std::env::var("SMARTBIDI_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.binder.debounce_ms = ms;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from smartbidi.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Check values serde cannot: code-point bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, bound) in [
            ("script.rtl_upper_bound", self.script.rtl_upper_bound),
            ("binder.rtl_upper_bound", self.binder.rtl_upper_bound),
        ] {
            if ScriptRange::HEBREW.with_high(bound).is_err() {
                return Err(ConfigError::InvalidOption {
                    name: name.to_string(),
                    value: format!("{bound:#06X}"),
                });
            }
        }
        Ok(())
    }

    pub fn direction_config(&self) -> DirectionConfig {
        DirectionConfig {
            enabled: self.direction.enabled,
            admin_bypass: self.direction.admin_bypass,
            force_rtl: self.direction.force_rtl,
        }
    }

    /// RTL range for server-rendered content.
    pub fn script_range(&self) -> ScriptRange {
        range_or_default(self.script.rtl_upper_bound, ScriptRange::HEBREW_ARABIC)
    }

    /// RTL range for the live input binder.
    pub fn binder_script_range(&self) -> ScriptRange {
        range_or_default(self.binder.rtl_upper_bound, ScriptRange::HEBREW)
    }
}

fn range_or_default(high: u32, fallback: ScriptRange) -> ScriptRange {
    fallback.with_high(high).unwrap_or_else(|error| {
        warn!(%error, "falling back to U+{:04X} upper bound", fallback.high());
        fallback
    })
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|val| val == "1" || val.eq_ignore_ascii_case("true"))
}

//! Flat option snapshot, as stored by the hosting CMS.
//!
//! Option values are strings; a flag is on only when its value is exactly
//! `"1"`. Options that are absent keep their defaults and unknown names are
//! ignored, since the host hands over its whole option table.

use super::{ChannelsSection, ConfigError, SmartBidiConfig};
use tracing::debug;

pub const OPTION_PREFIX: &str = "smartbidi_";

/// Parse `0x08FF`, `U+08FF` or decimal `2303`.
pub(crate) fn parse_code_point(value: &str) -> Option<u32> {
    let value = value.trim();
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .or_else(|| value.strip_prefix("U+"))
        .or_else(|| value.strip_prefix("u+"));
    match hex {
        Some(digits) => u32::from_str_radix(digits, 16).ok(),
        None => value.parse().ok(),
    }
}

impl SmartBidiConfig {
    /// Build a snapshot from `smartbidi_*` options on top of the defaults.
    pub fn from_options<I, K, V>(options: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in options {
            config.apply_option(key.as_ref(), value.as_ref())?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply a single option. Returns whether the name was recognised.
    pub fn apply_option(&mut self, name: &str, value: &str) -> Result<bool, ConfigError> {
        let Some(key) = name.strip_prefix(OPTION_PREFIX) else {
            return Ok(false);
        };
        let flag = value == "1";
        match key {
            "enable" => self.direction.enabled = flag,
            "admin_bypass" => self.direction.admin_bypass = flag,
            "force_rtl" => self.direction.force_rtl = flag,
            "force_navbar" => self.zones.force_navbar = flag,
            "force_content" => self.zones.force_content = flag,
            "force_footer" => self.zones.force_footer = flag,
            "legacy_class_names" => self.binder.legacy_class_names = flag,
            "rtl_upper_bound" => {
                self.script.rtl_upper_bound =
                    parse_code_point(value).ok_or_else(|| invalid(name, value))?;
            }
            "binder_rtl_upper_bound" => {
                self.binder.rtl_upper_bound =
                    parse_code_point(value).ok_or_else(|| invalid(name, value))?;
            }
            "debounce_ms" => {
                self.binder.debounce_ms = value.trim().parse().map_err(|_| invalid(name, value))?;
            }
            other => return Ok(self.apply_channel_option(other, flag)),
        }
        Ok(true)
    }

    fn apply_channel_option(&mut self, key: &str, flag: bool) -> bool {
        for channel in ChannelsSection::NAMES {
            let Some(setting) = key
                .strip_prefix(channel)
                .and_then(|rest| rest.strip_prefix('_'))
            else {
                continue;
            };
            let Some(section) = self.channels.get_mut(channel) else {
                continue;
            };
            match setting {
                "escape" => section.escape = flag,
                "normalize_ltr" => section.normalize_ltr = flag,
                _ => continue,
            }
            return true;
        }
        debug!(option = key, "unrecognised smartbidi option");
        false
    }
}

fn invalid(name: &str, value: &str) -> ConfigError {
    ConfigError::InvalidOption {
        name: name.to_string(),
        value: value.to_string(),
    }
}

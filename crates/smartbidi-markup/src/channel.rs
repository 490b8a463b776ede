use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smartbidi_config::{ChannelSection, ChannelsSection};
use thiserror::Error;

/// Named content source handed over by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderChannel {
    /// Full post body, already rendered to trusted HTML.
    Content,
    Title,
    Excerpt,
    Comment,
    Widget,
    /// Inner content of a `[smartbidi]` shortcode.
    Shortcode,
    /// Raw product name field; untrusted.
    ProductName,
}

impl RenderChannel {
    pub const ALL: [RenderChannel; 7] = [
        RenderChannel::Content,
        RenderChannel::Title,
        RenderChannel::Excerpt,
        RenderChannel::Comment,
        RenderChannel::Widget,
        RenderChannel::Shortcode,
        RenderChannel::ProductName,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RenderChannel::Content => "content",
            RenderChannel::Title => "title",
            RenderChannel::Excerpt => "excerpt",
            RenderChannel::Comment => "comment",
            RenderChannel::Widget => "widget",
            RenderChannel::Shortcode => "shortcode",
            RenderChannel::ProductName => "product_name",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RenderChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown render channel {0:?}")]
pub struct UnknownChannel(pub String);

impl FromStr for RenderChannel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        RenderChannel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == normalized)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

/// How one channel is escaped and normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelPolicy {
    /// Escape the raw value before wrapping it.
    pub escape: bool,
    /// Wrap neutral text with `dir="ltr"` instead of leaving it untouched.
    pub normalize_ltr: bool,
}

impl From<ChannelSection> for ChannelPolicy {
    fn from(section: ChannelSection) -> Self {
        Self {
            escape: section.escape,
            normalize_ltr: section.normalize_ltr,
        }
    }
}

/// Policy table indexed by channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPolicies {
    policies: [ChannelPolicy; RenderChannel::ALL.len()],
}

impl ChannelPolicies {
    /// The same policy for every channel.
    pub fn uniform(policy: ChannelPolicy) -> Self {
        Self {
            policies: [policy; RenderChannel::ALL.len()],
        }
    }

    pub fn get(&self, channel: RenderChannel) -> ChannelPolicy {
        self.policies[channel.index()]
    }

    pub fn set(&mut self, channel: RenderChannel, policy: ChannelPolicy) {
        self.policies[channel.index()] = policy;
    }

    pub fn with(mut self, channel: RenderChannel, policy: ChannelPolicy) -> Self {
        self.set(channel, policy);
        self
    }
}

impl From<&ChannelsSection> for ChannelPolicies {
    fn from(section: &ChannelsSection) -> Self {
        let mut policies = Self::uniform(ChannelPolicy::default());
        for channel in RenderChannel::ALL {
            if let Some(entry) = section.get(channel.as_str()) {
                policies.set(channel, (*entry).into());
            }
        }
        policies
    }
}

impl Default for ChannelPolicies {
    fn default() -> Self {
        Self::from(&ChannelsSection::default())
    }
}

use std::borrow::Cow;

use smartbidi_config::SmartBidiConfig;
use smartbidi_text::{Decision, DirectionConfig, ScriptClassifier, TextClassification, decide};
use tracing::trace;

use crate::channel::{ChannelPolicies, RenderChannel};
use crate::shortcode;
use crate::transform::{detect_wrapper, transform};
use crate::zones::{ZoneConfig, render_zone_styles, style_element};

/// Surface the content is being rendered for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub is_admin: bool,
}

impl RenderContext {
    pub const fn public() -> Self {
        Self { is_admin: false }
    }

    pub const fn admin() -> Self {
        Self { is_admin: true }
    }
}

/// Classifier → decision → transformer, plus zone styling, in one value.
///
/// Built once from a configuration snapshot and handed to whatever adapter
/// bridges it to the host. Immutable, so it can be shared across requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BidiPipeline {
    classifier: ScriptClassifier,
    direction: DirectionConfig,
    channels: ChannelPolicies,
    zones: ZoneConfig,
}

impl BidiPipeline {
    pub fn new(
        classifier: ScriptClassifier,
        direction: DirectionConfig,
        channels: ChannelPolicies,
        zones: ZoneConfig,
    ) -> Self {
        Self {
            classifier,
            direction,
            channels,
            zones,
        }
    }

    pub fn from_config(config: &SmartBidiConfig) -> Self {
        Self::new(
            ScriptClassifier::new(config.script_range()),
            config.direction_config(),
            ChannelPolicies::from(&config.channels),
            ZoneConfig::from(&config.zones),
        )
    }

    pub fn classifier(&self) -> &ScriptClassifier {
        &self.classifier
    }

    pub fn direction(&self) -> &DirectionConfig {
        &self.direction
    }

    pub fn channels(&self) -> &ChannelPolicies {
        &self.channels
    }

    pub fn zones(&self) -> &ZoneConfig {
        &self.zones
    }

    pub fn classify(&self, text: &str) -> TextClassification {
        self.classifier.classify(text)
    }

    pub fn decide(&self, text: &str, ctx: RenderContext) -> Decision {
        decide(self.classify(text), &self.direction, ctx.is_admin)
    }

    /// Decorate one piece of channel content.
    ///
    /// Content that is already a wrapper produced here comes back unchanged,
    /// so running the filter twice over the same content is harmless. The
    /// check looks at the string alone: on escaping channels a raw value that
    /// is exactly a text-only wrapper also passes through unescaped.
    pub fn filter<'a>(
        &self,
        channel: RenderChannel,
        content: &'a str,
        ctx: RenderContext,
    ) -> Cow<'a, str> {
        let policy = self.channels.get(channel);
        if let Some(variant) = detect_wrapper(content, policy.escape) {
            trace!(%channel, ?variant, "already decorated");
            return Cow::Borrowed(content);
        }
        let decision = self.decide(content, ctx);
        trace!(%channel, ?decision, "filtered");
        transform(content, decision, policy)
    }

    /// Handler for a `[smartbidi]…[/smartbidi]` shortcode body.
    pub fn shortcode<'a>(&self, inner: &'a str) -> Cow<'a, str> {
        self.filter(RenderChannel::Shortcode, inner, RenderContext::public())
    }

    /// Replace every `[smartbidi]` shortcode in `text` with its decorated body.
    pub fn expand_shortcodes<'a>(&self, text: &'a str) -> Cow<'a, str> {
        shortcode::expand(text, |inner| self.shortcode(inner).into_owned())
    }

    pub fn zone_styles(&self) -> String {
        render_zone_styles(&self.zones)
    }

    /// `<style>` element for the head, `None` when no zone is forced.
    pub fn zone_style_element(&self) -> Option<String> {
        style_element(&self.zone_styles())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartbidi_text::{DirectionVariant, ScriptRange};

    #[test]
    fn from_config_carries_every_section() {
        let mut config = SmartBidiConfig::default();
        config.script.rtl_upper_bound = 0x05FF;
        config.direction.admin_bypass = true;
        config.zones.force_content = true;
        config.channels.comment.escape = true;

        let pipeline = BidiPipeline::from_config(&config);
        assert_eq!(pipeline.classifier().range(), ScriptRange::HEBREW);
        assert!(pipeline.direction().admin_bypass);
        assert!(pipeline.zones().force_content);
        assert!(pipeline.channels().get(RenderChannel::Comment).escape);
    }

    #[test]
    fn admin_bypass_needs_admin_context() {
        let mut config = SmartBidiConfig::default();
        config.direction.admin_bypass = true;
        let pipeline = BidiPipeline::from_config(&config);

        assert_eq!(
            pipeline.filter(RenderChannel::Content, "שלום", RenderContext::admin()),
            "שלום"
        );
        assert_eq!(
            pipeline.filter(RenderChannel::Content, "שלום", RenderContext::public()),
            r#"<div class="rtl-only" dir="rtl">שלום</div>"#
        );
    }

    #[test]
    fn decide_uses_configured_range() {
        let hebrew_only = BidiPipeline::new(
            ScriptClassifier::new(ScriptRange::HEBREW),
            DirectionConfig::live_typing(),
            ChannelPolicies::default(),
            ZoneConfig::default(),
        );
        assert_eq!(
            hebrew_only.decide("مرحبا", RenderContext::public()),
            Decision::Decorate(DirectionVariant::Neutral)
        );
        let wide = BidiPipeline::default();
        assert_eq!(
            wide.decide("مرحبا", RenderContext::public()),
            Decision::Decorate(DirectionVariant::RtlOnly)
        );
    }

    #[test]
    fn zone_element_absent_without_zones() {
        assert_eq!(BidiPipeline::default().zone_style_element(), None);
    }
}

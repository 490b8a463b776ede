//! Decorating content fragments with direction wrappers.
//!
//! A decorated fragment is exactly one `<div>` carrying a `dir` attribute and,
//! for RTL-bearing text, one of the `bidi-mixed` / `rtl-only` classes. Content
//! that already has that shape is never wrapped again.

use std::borrow::Cow;

use scraper::{Html, Node};
use smartbidi_text::{Decision, DirectionVariant, TextDir};

use crate::channel::ChannelPolicy;
use crate::escape::escape_html;

const WRAPPER_TAG: &str = "div";

/// Wrap `inner` (already escaped if needed) for `variant`.
pub fn wrap(inner: &str, variant: DirectionVariant) -> String {
    let dir = variant.dir();
    match variant.class_name() {
        Some(class) => format!(r#"<{WRAPPER_TAG} class="{class}" dir="{dir}">{inner}</{WRAPPER_TAG}>"#),
        None => format!(r#"<{WRAPPER_TAG} dir="{dir}">{inner}</{WRAPPER_TAG}>"#),
    }
}

/// Apply `decision` to `content` under a channel policy.
///
/// Content that is already a wrapper is returned as is, even on escaping
/// channels. There only a text-only wrapper is accepted, so no markup beyond
/// the wrapper itself gets through, but a raw value spelled exactly like a
/// wrapper is rendered as one rather than as literal text.
pub fn transform<'a>(content: &'a str, decision: Decision, policy: ChannelPolicy) -> Cow<'a, str> {
    let variant = match decision {
        Decision::Passthrough => return Cow::Borrowed(content),
        Decision::Decorate(DirectionVariant::Neutral) if !policy.normalize_ltr => {
            return Cow::Borrowed(content);
        }
        Decision::Decorate(variant) => variant,
    };
    if detect_wrapper(content, policy.escape).is_some() {
        return Cow::Borrowed(content);
    }
    let inner = if policy.escape {
        escape_html(content)
    } else {
        Cow::Borrowed(content)
    };
    Cow::Owned(wrap(&inner, variant))
}

/// Variant of the wrapper `content` already consists of, if any.
pub fn existing_wrapper(content: &str) -> Option<DirectionVariant> {
    detect_wrapper(content, false)
}

/// With `text_only`, a wrapper only counts when it holds nothing but text,
/// which is the only shape escaped output can take.
pub(crate) fn detect_wrapper(content: &str, text_only: bool) -> Option<DirectionVariant> {
    let trimmed = content.trim();
    if !trimmed.starts_with("<div") || !trimmed.ends_with("</div>") {
        return None;
    }

    let fragment = Html::parse_fragment(trimmed);
    let mut top = fragment.root_element().children();
    let only = top.next()?;
    if top.next().is_some() {
        return None;
    }
    let Node::Element(element) = only.value() else {
        return None;
    };
    if element.name() != WRAPPER_TAG {
        return None;
    }
    if text_only && only.children().any(|child| !child.value().is_text()) {
        return None;
    }

    let variant = DirectionVariant::from_dir(TextDir::parse(element.attr("dir")?)?);

    let expected_attrs = if variant.class_name().is_some() { 2 } else { 1 };
    if element.attrs().count() != expected_attrs || element.attr("class") != variant.class_name() {
        return None;
    }
    Some(variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRUSTED: ChannelPolicy = ChannelPolicy {
        escape: false,
        normalize_ltr: false,
    };
    const FIELD: ChannelPolicy = ChannelPolicy {
        escape: true,
        normalize_ltr: true,
    };

    #[test]
    fn wraps_each_variant() {
        assert_eq!(
            wrap("x", DirectionVariant::Mixed),
            r#"<div class="bidi-mixed" dir="auto">x</div>"#
        );
        assert_eq!(
            wrap("x", DirectionVariant::RtlOnly),
            r#"<div class="rtl-only" dir="rtl">x</div>"#
        );
        assert_eq!(wrap("x", DirectionVariant::Neutral), r#"<div dir="ltr">x</div>"#);
    }

    #[test]
    fn passthrough_is_identity() {
        let out = transform("<b>שלום</b>", Decision::Passthrough, FIELD);
        assert!(matches!(out, Cow::Borrowed("<b>שלום</b>")));
    }

    #[test]
    fn neutral_follows_normalization_toggle() {
        let neutral = Decision::Decorate(DirectionVariant::Neutral);
        assert_eq!(transform("Hello", neutral, TRUSTED), "Hello");
        assert_eq!(
            transform("Hello", neutral, FIELD),
            r#"<div dir="ltr">Hello</div>"#
        );
    }

    #[test]
    fn escaping_is_per_policy() {
        let rtl = Decision::Decorate(DirectionVariant::RtlOnly);
        assert_eq!(
            transform("<i>שלום</i>", rtl, TRUSTED),
            r#"<div class="rtl-only" dir="rtl"><i>שלום</i></div>"#
        );
        assert_eq!(
            transform("<i>שלום</i>", rtl, FIELD),
            r#"<div class="rtl-only" dir="rtl">&lt;i&gt;שלום&lt;/i&gt;</div>"#
        );
    }

    #[test]
    fn recognises_own_wrappers() {
        for variant in [
            DirectionVariant::Mixed,
            DirectionVariant::RtlOnly,
            DirectionVariant::Neutral,
        ] {
            assert_eq!(existing_wrapper(&wrap("שלום <em>a</em>", variant)), Some(variant));
        }
    }

    #[test]
    fn ignores_foreign_divs() {
        assert_eq!(existing_wrapper(r#"<div class="entry">שלום</div>"#), None);
        assert_eq!(
            existing_wrapper(r#"<div class="rtl-only" dir="auto">x</div>"#),
            None
        );
        assert_eq!(
            existing_wrapper(r#"<div class="rtl-only" dir="rtl" id="a">x</div>"#),
            None
        );
        assert_eq!(
            existing_wrapper(r#"<div dir="rtl">a</div><div dir="rtl">b</div>"#),
            None
        );
        assert_eq!(existing_wrapper("plain text"), None);
    }

    #[test]
    fn transform_does_not_double_wrap() {
        let mixed = Decision::Decorate(DirectionVariant::Mixed);
        let once = transform("Hello שלום", mixed, TRUSTED).into_owned();
        let twice = transform(&once, mixed, TRUSTED);
        assert_eq!(twice, once);

        let once = transform("<b>Hi</b> שלום", mixed, FIELD).into_owned();
        let twice = transform(&once, mixed, FIELD);
        assert_eq!(twice, once);
    }

    #[test]
    fn escaped_channel_rejects_wrapper_with_markup_inside() {
        let crafted = r#"<div class="rtl-only" dir="rtl"><img src=x onerror=alert(1)></div>"#;
        let out = transform(crafted, Decision::Decorate(DirectionVariant::Mixed), FIELD);
        assert!(out.starts_with(r#"<div class="bidi-mixed" dir="auto">&lt;div"#));
        assert!(!out.contains("<img"));
    }
}

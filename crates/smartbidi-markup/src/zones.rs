//! Forced right-to-left layout for structural page zones.
//!
//! Each zone maps to a fixed selector list. The emitted CSS is trusted
//! output and goes into a style context verbatim.

use smartbidi_config::ZonesSection;

/// `id` of the style element carrying zone rules.
pub const ZONE_STYLE_ID: &str = "smartbidi-zones";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneConfig {
    pub force_navbar: bool,
    pub force_content: bool,
    pub force_footer: bool,
}

impl ZoneConfig {
    pub fn is_empty(&self) -> bool {
        !(self.force_navbar || self.force_content || self.force_footer)
    }

    pub fn enabled(&self, zone: Zone) -> bool {
        match zone {
            Zone::Navbar => self.force_navbar,
            Zone::Content => self.force_content,
            Zone::Footer => self.force_footer,
        }
    }
}

impl From<&ZonesSection> for ZoneConfig {
    fn from(section: &ZonesSection) -> Self {
        Self {
            force_navbar: section.force_navbar,
            force_content: section.force_content,
            force_footer: section.force_footer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Navbar,
    Content,
    Footer,
}

impl Zone {
    /// Emission order.
    pub const ALL: [Zone; 3] = [Zone::Navbar, Zone::Content, Zone::Footer];

    pub fn selectors(self) -> &'static [&'static str] {
        match self {
            Zone::Navbar => NAVBAR_SELECTORS,
            Zone::Content => CONTENT_SELECTORS,
            Zone::Footer => FOOTER_SELECTORS,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Zone::Navbar => "navbar",
            Zone::Content => "content",
            Zone::Footer => "footer",
        }
    }
}

const NAVBAR_SELECTORS: &[&str] = &[
    "header",
    ".site-header",
    "nav",
    ".navbar",
    ".main-navigation",
    ".primary-menu",
    ".menu",
];

const CONTENT_SELECTORS: &[&str] = &[
    "main",
    ".site-main",
    ".site-content",
    ".content-area",
    ".entry-content",
    "article",
    ".woocommerce",
    ".woocommerce-breadcrumb",
    ".breadcrumb",
    ".breadcrumbs",
];

// Separators inside breadcrumbs point the other way once the trail runs RTL.
const BREADCRUMB_SEPARATOR_SELECTORS: &[&str] = &[
    ".woocommerce-breadcrumb .breadcrumb-separator",
    ".breadcrumb .separator",
    ".breadcrumbs .separator",
];

const FOOTER_SELECTORS: &[&str] = &["footer", ".site-footer", ".footer-widgets", ".site-info"];

const RTL_DECLARATIONS: &str = "  direction: rtl !important;\n  text-align: right !important;\n";
const MIRROR_DECLARATIONS: &str = "  display: inline-block;\n  transform: scaleX(-1);\n";

fn push_rule(out: &mut String, selectors: &[&str], declarations: &str) {
    out.push_str(&selectors.join(",\n"));
    out.push_str(" {\n");
    out.push_str(declarations);
    out.push_str("}\n");
}

fn render_zone(out: &mut String, zone: Zone) {
    out.push_str(&format!("/* smartbidi: {} */\n", zone.label()));
    push_rule(out, zone.selectors(), RTL_DECLARATIONS);
    if zone == Zone::Content {
        push_rule(out, BREADCRUMB_SEPARATOR_SELECTORS, MIRROR_DECLARATIONS);
    }
}

/// Stylesheet fragment for every enabled zone, navbar then content then footer.
///
/// Returns an empty string when no zone is forced.
pub fn render_zone_styles(config: &ZoneConfig) -> String {
    let mut out = String::new();
    for zone in Zone::ALL.into_iter().filter(|zone| config.enabled(*zone)) {
        render_zone(&mut out, zone);
    }
    out
}

/// `<style>` element for a fragment, or `None` so the caller can omit it.
pub fn style_element(css: &str) -> Option<String> {
    if css.trim().is_empty() {
        return None;
    }
    Some(format!(
        "<style id=\"{ZONE_STYLE_ID}\">\n{css}</style>"
    ))
}

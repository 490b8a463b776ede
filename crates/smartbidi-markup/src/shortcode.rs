use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Name of the enclosing shortcode, `[smartbidi]…[/smartbidi]`.
pub const SHORTCODE_TAG: &str = "smartbidi";

fn shortcode_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let tag = regex::escape(SHORTCODE_TAG);
        Regex::new(&format!(r"(?s)\[{tag}(?:\s[^\]]*)?\](.*?)\[/{tag}\]"))
            .expect("shortcode pattern is valid")
    })
}

/// Replace each `[smartbidi]…[/smartbidi]` pair with `render(inner)`.
///
/// Attributes on the opening tag are accepted and ignored. Unpaired tags are
/// left as they are.
pub fn expand<'a, F>(text: &'a str, mut render: F) -> Cow<'a, str>
where
    F: FnMut(&str) -> String,
{
    if !text.contains(&format!("[{SHORTCODE_TAG}")) {
        return Cow::Borrowed(text);
    }
    shortcode_pattern().replace_all(text, |caps: &Captures<'_>| render(&caps[1]))
}

use std::borrow::Cow;

/// Escape text for use inside an element or a quoted attribute.
///
/// Covers `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape_html("שלום world"), Cow::Borrowed(_)));
    }

    #[test]
    fn markup_is_neutralized() {
        let out = escape_html(r#"<script>alert("x")</script> & 'y'"#);
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
        assert!(!out.contains('"'));
        assert!(!out.contains('\''));
        assert!(out.starts_with("&lt;script&gt;"));
        assert!(out.contains("&amp;"));
    }
}

use scraper::Html;

/// Reduces an HTML job description to plain text.
///
/// Text nodes are joined with spaces so element boundaries stay token boundaries.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_collapses_whitespace() {
        let html = "<p>We use <strong>Python</strong>,<br/>React &amp; AWS.</p>\n<ul><li>C++</li></ul>";
        assert_eq!(strip_html(html), "We use Python , React & AWS. C++");
    }

    #[test]
    fn test_tags_become_token_boundaries() {
        assert_eq!(strip_html("<li>Rust</li><li>Go</li>"), "Rust Go");
    }

    #[test]
    fn test_double_escaped_entity() {
        assert_eq!(strip_html("&amp;lt;div&amp;gt;"), "&lt;div&gt;");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(strip_html("Python and AWS"), "Python and AWS");
    }

    #[test]
    fn test_bare_less_than_keeps_following_text() {
        assert_eq!(
            strip_html("<p>Salary < 100k. We need Python and AWS.</p>"),
            "Salary < 100k. We need Python and AWS."
        );
    }

    #[test]
    fn test_numeric_and_named_entities_decoded() {
        assert_eq!(strip_html("<li>C&#43;&#43; &amp; C&#x23;</li>"), "C++ & C#");
        assert_eq!(strip_html("<p>and more&hellip;</p>"), "and more\u{2026}");
    }
}

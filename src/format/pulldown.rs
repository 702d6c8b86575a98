//! pulldown-cmark backed formatter.

use pulldown_cmark::{html, Options, Parser};

use super::{FormatError, MarkdownFormatter};

/// Renders CommonMark (plus tables, strikethrough and task lists) to HTML.
#[derive(Debug, Clone, Copy)]
pub struct PulldownFormatter {
    options: Options,
}

impl PulldownFormatter {
    /// Formatter with the GitHub-flavoured extensions enabled.
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }
}

impl Default for PulldownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownFormatter for PulldownFormatter {
    fn format(&self, markdown: &str) -> Result<String, FormatError> {
        let parser = Parser::new_ext(markdown, self.options);
        let mut markup = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut markup, parser);
        Ok(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paragraph() {
        let markup = PulldownFormatter::new().format("Hello, world!").unwrap();
        assert_eq!(markup, "<p>Hello, world!</p>\n");
    }

    #[test]
    fn test_heading_and_emphasis() {
        let markup = PulldownFormatter::new().format("# Title\n\nSome *light* text").unwrap();
        assert_eq!(markup, "<h1>Title</h1>\n<p>Some <em>light</em> text</p>\n");
    }

    #[test]
    fn test_unclosed_emphasis_is_literal() {
        // Partial buffers routinely end mid-markup.
        let markup = PulldownFormatter::new().format("Some **bol").unwrap();
        assert_eq!(markup, "<p>Some **bol</p>\n");
    }

    #[test]
    fn test_strikethrough_enabled() {
        let markup = PulldownFormatter::new().format("~~gone~~").unwrap();
        assert_eq!(markup, "<p><del>gone</del></p>\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(PulldownFormatter::new().format("").unwrap(), "");
    }

    #[test]
    fn test_deterministic() {
        let formatter = PulldownFormatter::new();
        let text = "- one\n- two\n\n| a | b |\n|---|---|\n| 1 | 2 |";
        assert_eq!(formatter.format(text).unwrap(), formatter.format(text).unwrap());
    }
}

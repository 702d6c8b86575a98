//! Markdown to markup formatting.
//!
//! The renderer treats the formatter as a pure function of the whole buffer.
//! A formatter may still refuse input; [`format_or_escape`] turns such a
//! refusal into escaped plain text so rendering never stops on it.

mod pulldown;

use thiserror::Error;

pub use pulldown::PulldownFormatter;

/// Errors a formatter may report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The input could not be formatted.
    #[error("Formatter rejected input: {message}")]
    Rejected {
        /// Why the input was rejected.
        message: String,
    },
}

/// Converts markdown text to markup.
pub trait MarkdownFormatter: Send + Sync {
    /// Format `markdown`. Must be deterministic for a given input.
    fn format(&self, markdown: &str) -> Result<String, FormatError>;
}

impl<F> MarkdownFormatter for F
where
    F: Fn(&str) -> Result<String, FormatError> + Send + Sync,
{
    fn format(&self, markdown: &str) -> Result<String, FormatError> {
        self(markdown)
    }
}

/// Formats `markdown`, falling back to an escaped `<pre>` block on failure.
pub fn format_or_escape(formatter: &dyn MarkdownFormatter, markdown: &str) -> String {
    match formatter.format(markdown) {
        Ok(markup) => markup,
        Err(e) => {
            tracing::warn!(error = %e, chars = markdown.chars().count(), "Formatter failed, rendering plain text");
            format!("<pre>{}</pre>", escape_html(markdown))
        }
    }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

//! Markdown to sanitized HTML

use pulldown_cmark::{Options, Parser, html};
use std::fmt;

/// HTML that has already been sanitized and must be embedded without escaping
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render a document body.
///
/// Markdown is expanded first and the resulting HTML is then passed through
/// the ammonia allow-list, so raw HTML in the source and HTML produced by the
/// expansion are both cleaned.
pub fn render(body: &str) -> SafeHtml {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(body, options);
    let mut unsafe_html = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut unsafe_html, parser);

    SafeHtml(ammonia::clean(&unsafe_html))
}

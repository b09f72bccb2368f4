//! Markdown body rendering.

use pulldown_cmark::{Parser, html};

/// Render a Markdown body to HTML (CommonMark defaults).
pub fn render(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

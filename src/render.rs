//! Prose rendering.
//!
//! Prose blocks are markdown. They go through two steps before landing in the
//! page: [`render_markdown`] turns them into HTML (which may carry raw HTML
//! from the album, scripts included), then [`sanitize`] strips everything
//! outside an allow-list suited to user-written content.
//!
//! The generate stage only sees the [`ProseRenderer`] trait, so tests can swap
//! in a renderer that makes block boundaries obvious.

use pulldown_cmark::{Options, Parser, html as md_html};

/// Turns the text of a prose block into safe markup.
pub trait ProseRenderer: Sync {
    fn render(&self, markdown: &str) -> String;
}

/// Markdown via pulldown-cmark, sanitized via ammonia.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ProseRenderer for MarkdownRenderer {
    fn render(&self, markdown: &str) -> String {
        sanitize(&render_markdown(markdown))
    }
}

/// Markdown to HTML. The result is not safe to embed as is.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(markdown, options);
    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut html, parser);
    html
}

pub fn sanitize(unsafe_html: &str) -> String {
    ammonia::clean(unsafe_html)
}

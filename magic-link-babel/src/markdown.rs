//! Markdown rendering (Markdown → HTML with magic links)
//!
//! Pipeline: Markdown string → markdown-it AST (magic links resolved inline) → HTML string
//!
//!     The magic-link rule is one more inline rule of the same parser that handles emphasis,
//!     links and code, so a token's tail is checked against the real source that follows it,
//!     whatever node that source ends up in. Code spans, code blocks, raw HTML and link labels
//!     never reach the rule.
//!
//!     Linkify stays off: it would turn the URL inside `{name|https://...}` into a link before the
//!     magic-link rule ever sees the token.

use magic_link_parser::{MagicLink, MagicLinkOptions};
use markdown_it::parser::linkfmt::LinkFormatter;
use markdown_it::plugins::{cmark, extra, html};
use markdown_it::MarkdownIt;
use tracing::debug;

/// Renders markdown documents with a configured magic-link rule.
#[derive(Debug)]
pub struct MarkdownRenderer {
    md: MarkdownIt,
}

impl MarkdownRenderer {
    pub fn new(magic: MagicLink) -> Self {
        let mut md = MarkdownIt::new();
        cmark::add(&mut md);
        html::add(&mut md);
        extra::tables::add(&mut md);
        extra::strikethrough::add(&mut md);
        magic.add(&mut md);
        Self { md }
    }

    /// Replace the link formatter used for every link in the document, magic or not.
    pub fn with_link_formatter<F: LinkFormatter + 'static>(mut self, formatter: F) -> Self {
        self.md.link_formatter = Box::new(formatter);
        self
    }

    /// Render a markdown document to HTML.
    pub fn render(&self, source: &str) -> String {
        debug!(bytes = source.len(), "rendering markdown");
        self.md.parse(source).render()
    }
}

/// Render `source` with a magic-link rule built from `options`.
pub fn render_markdown(source: &str, options: MagicLinkOptions) -> String {
    MarkdownRenderer::new(MagicLink::new(options)).render(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> String {
        render_markdown(source, MagicLinkOptions::default())
    }

    #[test]
    fn plain_documents_are_untouched() {
        assert_eq!(render("Hello *world*"), "<p>Hello <em>world</em></p>\n");
    }

    #[test]
    fn expands_mentions_inside_emphasis() {
        let html = render("*{@antfu}*");
        assert!(html.starts_with("<p><em><a href=\"https://github.com/antfu\""));
        assert!(html.ends_with("ANTFU</a></em></p>\n"));
    }

    #[test]
    fn code_blocks_are_not_scanned() {
        assert_eq!(
            render("```\n{@antfu}\n```\n"),
            "<pre><code>{@antfu}\n</code></pre>\n"
        );
    }

    #[test]
    fn headings_are_scanned() {
        let html = render("# Hi {@antfu}");
        assert!(html.starts_with("<h1>Hi <a href=\"https://github.com/antfu\""));
    }

    #[test]
    fn tables_are_scanned() {
        let html = render("| who |\n| --- |\n| {@antfu} |\n");
        assert!(html.contains("<td><a href=\"https://github.com/antfu\""));
    }

    #[derive(Debug)]
    struct WwwFormatter;

    impl LinkFormatter for WwwFormatter {
        fn validate_link(&self, _url: &str) -> Option<()> {
            Some(())
        }

        fn normalize_link(&self, url: &str) -> String {
            url.replace("https://", "https://www.")
        }

        fn normalize_link_text(&self, url: &str) -> String {
            url.to_owned()
        }
    }

    #[test]
    fn custom_link_formatter_is_used() {
        let renderer =
            MarkdownRenderer::new(MagicLink::default()).with_link_formatter(WwwFormatter);
        let html = renderer.render("{@antfu} [x](https://y.z)");
        assert!(html.contains("href=\"https://www.github.com/antfu\""));
        assert!(html.contains("href=\"https://www.y.z\""));
    }
}

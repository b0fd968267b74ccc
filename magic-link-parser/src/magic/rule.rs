//! The magic-link inline rule
//!
//!     [`MagicLink`] owns the configured handler chain and override rules. [`MagicLink::add`]
//!     stores it on a markdown-it parser and registers [`MagicLinkScanner`] ahead of the text
//!     scanner. At every `{` the scanner runs: token matcher, handler chain, field resolver,
//!     override layer. On success it emits a [`ResolvedLink`] node covering the braces and the
//!     payload (never the tail character). On any failure it reports no match and the braces stay
//!     plain text.
//!
//!     Link labels are not scanned, an anchor inside `[...](...)` would nest.

use markdown_it::parser::extset::MarkdownItExt;
use markdown_it::parser::inline::builtin::TextScanner;
use markdown_it::parser::inline::{InlineRule, InlineState};
use markdown_it::parser::linkfmt::LinkFormatter;
use markdown_it::{MarkdownIt, Node};
use tracing::debug;

use super::handlers::HandlerChain;
use super::matcher::{match_token, OPEN};
use super::options::MagicLinkOptions;
use super::overrides::{apply_overrides, ImageOverride};
use super::record::ResolvedLink;
use super::resolver::materialize;

/// A configured magic link resolver.
#[derive(Debug)]
pub struct MagicLink {
    chain: HandlerChain,
    overrides: Vec<ImageOverride>,
}

impl MarkdownItExt for MagicLink {}

impl MagicLink {
    pub fn new(options: MagicLinkOptions) -> Self {
        let chain = match options.handlers {
            Some(chain) => chain,
            None => HandlerChain::standard(
                &options.links,
                &options.platform_users,
                &options.default_platform,
            ),
        };
        Self {
            chain,
            overrides: options.image_overrides,
        }
    }

    pub fn chain(&self) -> &HandlerChain {
        &self.chain
    }

    pub fn overrides(&self) -> &[ImageOverride] {
        &self.overrides
    }

    /// Resolve a raw payload (the text between the braces) to its final record.
    pub fn resolve(&self, payload: &str, formatter: &dyn LinkFormatter) -> Option<ResolvedLink> {
        let partial = self.chain.resolve(payload)?;
        let resolved = materialize(partial, formatter, &self.chain)?;
        Some(apply_overrides(resolved, &self.overrides))
    }

    /// Store this configuration on `md` and register the scanner ahead of the text rule.
    ///
    /// Adding a second configuration replaces the first.
    pub fn add(self, md: &mut MarkdownIt) {
        md.ext.insert(self);
        if !md.inline.has_rule::<MagicLinkScanner>() {
            md.inline
                .add_rule::<MagicLinkScanner>()
                .before::<TextScanner>();
        }
    }
}

impl Default for MagicLink {
    fn default() -> Self {
        Self::new(MagicLinkOptions::default())
    }
}

/// Register magic links built from `options` on `md`.
pub fn add(md: &mut MarkdownIt, options: MagicLinkOptions) {
    MagicLink::new(options).add(md);
}

/// Inline rule recognizing `{payload}` at the cursor.
pub struct MagicLinkScanner;

impl InlineRule for MagicLinkScanner {
    const MARKER: char = OPEN;

    fn run(state: &mut InlineState) -> Option<(Node, usize)> {
        if state.link_level > 0 {
            return None;
        }
        let magic = state.md.ext.get::<MagicLink>()?;
        let token = match_token(&state.src[..state.pos_max], state.pos)?;

        let Some(resolved) = magic.resolve(token.payload, state.md.link_formatter.as_ref()) else {
            debug!(payload = token.payload, "leaving unresolved magic link as text");
            return None;
        };
        Some((Node::new(resolved), token.consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic::handlers::from_fn;
    use crate::magic::record::PartialLink;
    use markdown_it::parser::linkfmt::MDLinkFormatter;

    fn parser(magic: MagicLink) -> MarkdownIt {
        let mut md = MarkdownIt::new();
        markdown_it::plugins::cmark::add(&mut md);
        magic.add(&mut md);
        md
    }

    fn render(md: &MarkdownIt, src: &str) -> String {
        md.parse(src).render()
    }

    #[test]
    fn registers_the_scanner() {
        let mut md = parser(MagicLink::default());
        assert!(md.inline.has_rule::<MagicLinkScanner>());
        assert!(md.ext.get::<MagicLink>().is_some());
    }

    #[test]
    fn emits_link_node_between_text() {
        let md = parser(MagicLink::default());
        let root = md.parse("Foo {@github} Bar");
        let mut links = Vec::new();
        root.walk(|node, _| {
            if let Some(link) = node.cast::<ResolvedLink>() {
                links.push(link.text.clone());
            }
        });
        assert_eq!(links, vec!["GITHUB".to_string()]);

        let html = root.render();
        assert!(html.starts_with("<p>Foo <a href=\"https://github.com/github\""));
        assert!(html.ends_with("GITHUB</a> Bar</p>\n"));
    }

    #[test]
    fn second_configuration_replaces_the_first() {
        let mut md = parser(MagicLink::default());
        MagicLink::new(MagicLinkOptions::new().with_link("Vite", "https://vitejs.dev")).add(&mut md);
        let html = render(&md, "{Vite}");
        assert!(html.contains("href=\"https://vitejs.dev\""));
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn scanner_without_configuration_declines() {
        let mut md = MarkdownIt::new();
        markdown_it::plugins::cmark::add(&mut md);
        md.inline.add_rule::<MagicLinkScanner>().before::<TextScanner>();
        assert_eq!(render(&md, "{@antfu}"), "<p>{@antfu}</p>\n");
    }

    #[test]
    fn unresolved_tokens_stay_text() {
        let md = parser(MagicLink::default());
        assert_eq!(render(&md, "{plain words}"), "<p>{plain words}</p>\n");
    }

    #[test]
    fn link_labels_are_not_scanned() {
        let md = parser(MagicLink::default());
        assert_eq!(
            render(&md, "[{@antfu}](https://x.y)"),
            "<p><a href=\"https://x.y\">{@antfu}</a></p>\n"
        );
    }

    #[test]
    fn custom_chain_replaces_builtins() {
        let chain = HandlerChain::new().with(from_fn("docs", |payload: &str| {
            payload
                .strip_prefix("doc:")
                .map(|page| PartialLink::new(format!("https://docs.rs/{page}")).with_type("doc"))
        }));
        let magic = MagicLink::new(MagicLinkOptions::new().with_handlers(chain));
        let formatter = MDLinkFormatter::new();

        let resolved = magic.resolve("doc:serde", &formatter).unwrap();
        assert_eq!(resolved.link, "https://docs.rs/serde");
        assert_eq!(resolved.text, "docs.rs/serde");
        assert_eq!(resolved.class[1], "markdown-magic-link-doc");
        assert!(magic.resolve("@antfu", &formatter).is_none());
    }

    #[derive(Debug)]
    struct Shouting;

    impl LinkFormatter for Shouting {
        fn validate_link(&self, _url: &str) -> Option<()> {
            Some(())
        }

        fn normalize_link(&self, url: &str) -> String {
            url.replace("vueuse", "VUEUSE")
        }

        fn normalize_link_text(&self, url: &str) -> String {
            url.to_owned()
        }
    }

    #[test]
    fn uses_host_link_formatter() {
        let resolved = MagicLink::default()
            .resolve("https://vueuse.org", &Shouting)
            .unwrap();
        assert_eq!(resolved.link, "https://VUEUSE.org");

        let mut md = parser(MagicLink::default());
        md.link_formatter = Box::new(Shouting);
        assert!(render(&md, "{https://vueuse.org}").contains("href=\"https://VUEUSE.org\""));
    }
}

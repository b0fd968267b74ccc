//! # magic-link-parser
//!
//! Recognizes and resolves `{magic link}` tokens inside inline markdown text.
//!
//! File Layout
//!
//!     The crate is split along the path a token takes through the system:
//!
//!     src/magic
//!       ├── matcher.rs     Token boundary detection (`{payload}` + tail guard)
//!       ├── handlers.rs    Handler trait and the ordered handler chain
//!       │   └── handlers/  Built-in handlers (link, platform mention, default mention)
//!       ├── resolver.rs    Field defaults and the postprocess pass
//!       ├── overrides.rs   Image override rules
//!       ├── record.rs      Partial and resolved link records, and their HTML
//!       └── rule.rs        The markdown-it inline rule tying it all together
//!
//!     The host markdown parser is markdown-it. This crate needs two things from it: an inline
//!     rule slot ahead of the text scanner, and the parser's link formatter for normalizing link
//!     targets. Block structure and whole-document rendering live in the magic-link-babel crate.
//!
//!     Resolution never fails: a token no handler accepts is left in the text verbatim.

pub mod magic;

pub use magic::handlers::{Handler, HandlerChain};
pub use magic::options::{DefaultPlatform, LinkTarget, MagicLinkOptions, PlatformUser};
pub use magic::overrides::{ImageOverride, UrlMatcher};
pub use magic::record::{PartialLink, ResolvedLink};
pub use magic::rule::{add, MagicLink, MagicLinkScanner};

//! Markdown documents with magic links
//!
//!     magic-link-parser supplies an inline rule. This crate puts it to work on whole markdown
//!     documents: markdown-it parses the document with the CommonMark rules, raw HTML, tables and
//!     strikethrough enabled, the magic-link rule runs alongside the other inline rules, and
//!     markdown-it renders the result to HTML.
//!
//!     As with the rest of the toolchain, we never write the markdown parser or the HTML
//!     serializer ourselves. The scope here is only choosing the parser setup.
//!
//!     This is a pure lib: no printing, no env vars, no file access.

pub mod markdown;

pub use markdown::{render_markdown, MarkdownRenderer};

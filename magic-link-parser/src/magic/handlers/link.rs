//! Generic link handler: `{url}`, `{name}` and `{name|url}`.

use std::collections::HashMap;

use super::{split_parts, Handler};
use crate::magic::options::LinkTarget;
use crate::magic::record::{PartialLink, LINK_TYPE};
use crate::magic::urls::{favicon_url, has_http_scheme, non_empty, strip_scheme};

/// Resolves literal link names and bare http(s) URLs.
///
/// The URL is the explicit second part when given, else the configured target for the name, else
/// the first part itself. Anything that does not end up as an http(s) URL is declined, which is
/// what keeps mentions and ordinary braced text out of this handler.
#[derive(Debug, Clone, Default)]
pub struct LinkHandler {
    links: HashMap<String, LinkTarget>,
}

impl LinkHandler {
    pub fn new(links: HashMap<String, LinkTarget>) -> Self {
        Self { links }
    }
}

impl Handler for LinkHandler {
    fn name(&self) -> &str {
        "link"
    }

    fn resolve(&self, payload: &str) -> Option<PartialLink> {
        let parts = split_parts(payload);
        let name = parts[0];
        let explicit = non_empty(parts.get(1).copied());
        let target = if name.is_empty() {
            None
        } else {
            self.links.get(name)
        };

        let url = explicit
            .or_else(|| non_empty(target.map(LinkTarget::link)))
            .unwrap_or(name);
        if !has_http_scheme(url) {
            return None;
        }

        let image_url = match non_empty(target.and_then(LinkTarget::image_url)) {
            Some(image) => image.to_string(),
            None => favicon_url(url)?,
        };
        let text = if name.is_empty() {
            strip_scheme(url)
        } else {
            name
        };

        Some(
            PartialLink::new(url)
                .with_text(text)
                .with_type(LINK_TYPE)
                .with_image(image_url),
        )
    }
}

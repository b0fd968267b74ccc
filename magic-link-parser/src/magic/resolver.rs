//! Field resolver
//!
//!     Turns the winning [`PartialLink`] into a [`ResolvedLink`]:
//!
//!     1. The link goes through the host's link formatter. Everything downstream sees the normalized value.
//!     2. The class list starts with the marker class and the type-qualified class, followed by any
//!        handler-supplied classes.
//!     3. Missing text becomes the link without its scheme.
//!     4. A missing image becomes the favicon of the link's host.
//!     5. Every handler's postprocess hook runs over the result, in chain order.
//!
//!     A record whose link is empty, or whose image cannot be defaulted because the link has no
//!     host, is dropped and the token stays literal.

use markdown_it::parser::linkfmt::LinkFormatter;
use tracing::debug;

use super::handlers::HandlerChain;
use super::record::{PartialLink, ResolvedLink, LINK_TYPE, MARKER_CLASS};
use super::urls::{favicon_url, non_empty, strip_scheme};

/// Fill every omitted field of `partial` and run the postprocess pass.
pub fn materialize(
    partial: PartialLink,
    formatter: &dyn LinkFormatter,
    chain: &HandlerChain,
) -> Option<ResolvedLink> {
    let link = formatter.normalize_link(&partial.link);
    if link.is_empty() {
        debug!(raw = %partial.link, "dropping magic link with empty target");
        return None;
    }

    let link_type = non_empty(partial.link_type).unwrap_or_else(|| LINK_TYPE.to_string());

    let mut class = vec![
        MARKER_CLASS.to_string(),
        format!("{MARKER_CLASS}-{link_type}"),
    ];
    class.extend(partial.class);

    let text = match non_empty(partial.text) {
        Some(text) => text,
        None => strip_scheme(&link).to_string(),
    };
    if text.is_empty() {
        debug!(%link, "dropping magic link without display text");
        return None;
    }

    let image_url = match non_empty(partial.image_url) {
        Some(image) => image,
        None => match favicon_url(&link) {
            Some(favicon) => favicon,
            None => {
                debug!(%link, "dropping magic link without a host to derive an image from");
                return None;
            }
        },
    };

    Some(chain.postprocess(ResolvedLink {
        text,
        link,
        link_type,
        class,
        image_url,
    }))
}

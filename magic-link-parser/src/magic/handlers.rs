//! Handler chain
//!
//!     A handler looks at a raw payload and either returns a [`PartialLink`] or declines with
//!     `None`. Declining is the normal way of saying "not my shape"; handlers never error on user
//!     input. The chain tries handlers in registration order and the first one that accepts wins.
//!
//!     After the winning record is defaulted, every handler gets a postprocess pass over it, again
//!     in registration order, so a handler can repair records produced by another one.
//!
//!     The default chain is: generic link, platform-scoped mention, default-platform mention.
//!     The order matters: `@user` must not be taken for a link, and `@platform:user` belongs to the
//!     scoped handler, which must therefore be tried before the default mention handler.

mod link;
mod mention;
mod platform;

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use super::options::{DefaultPlatform, LinkTarget, PlatformUsers};
use super::record::{PartialLink, ResolvedLink};

pub use link::LinkHandler;
pub use mention::MentionHandler;
pub use platform::PlatformHandler;

/// A resolver unit in the chain.
pub trait Handler: Send + Sync {
    /// Stable name, used in logs.
    fn name(&self) -> &str;

    /// Interpret `payload`, or decline with `None`.
    fn resolve(&self, payload: &str) -> Option<PartialLink>;

    /// Optionally replace the resolved record. `None` leaves it unchanged.
    fn postprocess(&self, _resolved: &ResolvedLink) -> Option<ResolvedLink> {
        None
    }
}

/// Ordered list of handlers.
#[derive(Default)]
pub struct HandlerChain {
    handlers: Vec<Box<dyn Handler>>,
}

impl HandlerChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        HandlerChain {
            handlers: Vec::new(),
        }
    }

    /// The built-in chain: link, platform mention, default-platform mention.
    pub fn standard(
        links: &HashMap<String, LinkTarget>,
        platform_users: &PlatformUsers,
        default_platform: &DefaultPlatform,
    ) -> Self {
        HandlerChain::new()
            .with(LinkHandler::new(links.clone()))
            .with(PlatformHandler::new(platform_users.clone()))
            .with(MentionHandler::new(default_platform.clone()))
    }

    /// Append a handler.
    pub fn push<H: Handler + 'static>(&mut self, handler: H) {
        self.handlers.push(Box::new(handler));
    }

    /// Append a handler, builder style.
    pub fn with<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.push(handler);
        self
    }

    /// Handler names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Resolve `payload` with the first handler that accepts it.
    pub fn resolve(&self, payload: &str) -> Option<PartialLink> {
        for handler in &self.handlers {
            match handler.resolve(payload) {
                Some(partial) => {
                    debug!(handler = handler.name(), payload, link = %partial.link, "magic link resolved");
                    return Some(partial);
                }
                None => trace!(handler = handler.name(), payload, "handler declined"),
            }
        }
        None
    }

    /// Run every postprocess hook in order, each seeing the previous hooks' edits.
    pub fn postprocess(&self, resolved: ResolvedLink) -> ResolvedLink {
        self.handlers.iter().fold(resolved, |current, handler| {
            match handler.postprocess(&current) {
                Some(replaced) => {
                    trace!(handler = handler.name(), link = %replaced.link, "postprocess replaced record");
                    replaced
                }
                None => current,
            }
        })
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Adapts a closure into a [`Handler`] without a postprocess hook.
pub struct FnHandler<F> {
    name: String,
    resolve: F,
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&str) -> Option<PartialLink> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, payload: &str) -> Option<PartialLink> {
        (self.resolve)(payload)
    }
}

/// Build a handler from a name and a resolve function.
pub fn from_fn<F>(name: impl Into<String>, resolve: F) -> FnHandler<F>
where
    F: Fn(&str) -> Option<PartialLink> + Send + Sync,
{
    FnHandler {
        name: name.into(),
        resolve,
    }
}

/// Split a payload on `|`, trimming every part.
pub(crate) fn split_parts(payload: &str) -> Vec<&str> {
    payload.split('|').map(str::trim).collect()
}

/// `@handle|text|link`, with empty optional parts treated as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MentionParts<'a> {
    /// The mention without its leading `@`.
    pub handle: &'a str,
    pub text: Option<&'a str>,
    pub link: Option<&'a str>,
}

impl<'a> MentionParts<'a> {
    /// `None` unless the first part starts with `@`.
    pub fn parse(payload: &'a str) -> Option<Self> {
        let parts = split_parts(payload);
        let handle = parts.first()?.strip_prefix('@')?;
        let optional = |index: usize| parts.get(index).copied().filter(|part| !part.is_empty());
        Some(MentionParts {
            handle,
            text: optional(1),
            link: optional(2),
        })
    }
}

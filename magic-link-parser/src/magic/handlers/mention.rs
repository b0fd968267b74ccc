//! Default-platform mentions: `{@name}`, `{@name|text}`, `{@name|text|url}`.
//!
//!     There is no lookup table here: any colon-free `@name` resolves to the default platform's
//!     profile and avatar templates. The postprocess hook also upgrades plain links that point at a
//!     profile on the platform, e.g. `{https://github.com/antfu}`, from the favicon to the avatar.

use super::{Handler, MentionParts};
use crate::magic::options::DefaultPlatform;
use crate::magic::record::{PartialLink, ResolvedLink};
use crate::magic::urls::FAVICON_SERVICE;

#[derive(Debug, Clone)]
pub struct MentionHandler {
    platform: DefaultPlatform,
    link_type: String,
}

impl MentionHandler {
    pub fn new(platform: DefaultPlatform) -> Self {
        let link_type = format!("{}-at", platform.name);
        Self {
            platform,
            link_type,
        }
    }

    /// The identifier of a profile link on the platform host.
    ///
    /// Accepts `[http[s]://]<host>/<id>` optionally followed by `/...`, where `id` is ASCII
    /// alphanumerics, `_` or `-`.
    fn profile_id<'a>(&self, link: &'a str) -> Option<&'a str> {
        let without_scheme = link
            .strip_prefix("https://")
            .or_else(|| link.strip_prefix("http://"))
            .unwrap_or(link);
        let path = without_scheme
            .strip_prefix(self.platform.host.as_str())?
            .strip_prefix('/')?;
        let end = path
            .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'))
            .unwrap_or(path.len());
        let (id, rest) = path.split_at(end);
        if id.is_empty() || !(rest.is_empty() || rest.starts_with('/')) {
            return None;
        }
        Some(id)
    }
}

impl Default for MentionHandler {
    fn default() -> Self {
        Self::new(DefaultPlatform::github())
    }
}

impl Handler for MentionHandler {
    fn name(&self) -> &str {
        &self.link_type
    }

    fn resolve(&self, payload: &str) -> Option<PartialLink> {
        let mention = MentionParts::parse(payload)?;
        if mention.handle.contains(':') {
            return None;
        }

        let handle = mention.handle;
        let text = match mention.text {
            Some(text) => text.to_string(),
            None => handle.to_uppercase(),
        };
        let link = match mention.link {
            Some(link) => link.to_string(),
            None => self.platform.profile_url_for(handle),
        };

        Some(
            PartialLink::new(link)
                .with_text(text)
                .with_type(self.link_type.as_str())
                .with_image(self.platform.avatar_url_for(handle)),
        )
    }

    fn postprocess(&self, resolved: &ResolvedLink) -> Option<ResolvedLink> {
        if resolved.link_type == self.link_type {
            return None;
        }
        let id = self.profile_id(&resolved.link)?;
        if self.platform.is_reserved(id) || !resolved.image_url.starts_with(FAVICON_SERVICE) {
            return None;
        }
        Some(ResolvedLink {
            image_url: self.platform.avatar_url_for(id),
            ..resolved.clone()
        })
    }
}

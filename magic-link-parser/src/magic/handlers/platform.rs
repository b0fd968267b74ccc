//! Platform-scoped mentions: `{@platform:user}`, `{@platform:user|text}`, `{@platform:user|text|url}`.

use super::{Handler, MentionParts};
use crate::magic::options::PlatformUsers;
use crate::magic::record::PartialLink;
use crate::magic::urls::non_empty;

/// Resolves mentions of users listed in the platform table.
///
/// Unknown platforms and users are declined, so they stay literal in the output.
#[derive(Debug, Clone, Default)]
pub struct PlatformHandler {
    users: PlatformUsers,
}

impl PlatformHandler {
    pub fn new(users: PlatformUsers) -> Self {
        Self { users }
    }
}

impl Handler for PlatformHandler {
    fn name(&self) -> &str {
        "platform-at"
    }

    fn resolve(&self, payload: &str) -> Option<PartialLink> {
        let mention = MentionParts::parse(payload)?;
        let (platform, username) = mention.handle.split_once(':')?;
        if platform.is_empty() || username.is_empty() {
            return None;
        }
        let user = self.users.get(platform)?.get(username)?;

        let text = match mention.text.or(non_empty(user.display_name.as_deref())) {
            Some(text) => text.to_string(),
            None => username.to_uppercase(),
        };
        let mut partial = PartialLink::new(mention.link.unwrap_or(&user.link))
            .with_text(text)
            .with_type(format!("{platform}-at"));
        if !user.avatar_url.is_empty() {
            partial = partial.with_image(user.avatar_url.as_str());
        }
        Some(partial)
    }
}

//! Configuration surface
//!
//!     Everything the handlers close over is handed in once, at setup time, through
//!     [`MagicLinkOptions`]. Nothing here is mutated while rendering, so a configured
//!     [`MagicLink`](super::rule::MagicLink) can be shared between threads.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::handlers::HandlerChain;
use super::overrides::ImageOverride;

/// Platform users keyed by platform id, then username.
pub type PlatformUsers = HashMap<String, HashMap<String, PlatformUser>>;

/// Target of a literal link name: a bare URL, or a URL with its own image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkTarget {
    Url(String),
    Detailed {
        link: String,
        #[serde(default)]
        image_url: Option<String>,
    },
}

impl LinkTarget {
    pub fn link(&self) -> &str {
        match self {
            LinkTarget::Url(link) | LinkTarget::Detailed { link, .. } => link,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            LinkTarget::Url(_) => None,
            LinkTarget::Detailed { image_url, .. } => image_url.as_deref(),
        }
    }
}

impl From<&str> for LinkTarget {
    fn from(link: &str) -> Self {
        LinkTarget::Url(link.to_string())
    }
}

/// A known user on a named platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformUser {
    /// Profile link.
    pub link: String,
    pub avatar_url: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl PlatformUser {
    pub fn new(link: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            avatar_url: avatar_url.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// The platform bare `@name` mentions point at.
///
/// Templates use `{id}` as the placeholder for the mentioned identifier. `reserved_routes` lists
/// first path segments on `host` that are site pages rather than profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPlatform {
    pub name: String,
    pub host: String,
    pub profile_url: String,
    pub avatar_url: String,
    #[serde(default)]
    pub reserved_routes: Vec<String>,
}

impl DefaultPlatform {
    /// GitHub, the platform used when nothing else is configured.
    pub fn github() -> Self {
        Self {
            name: "github".to_string(),
            host: "github.com".to_string(),
            profile_url: "https://github.com/{id}".to_string(),
            avatar_url: "https://github.com/{id}.png".to_string(),
            reserved_routes: [
                "settings",
                "pulls",
                "issues",
                "discussions",
                "sponsor",
                "sponsors",
                "notifications",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    pub fn profile_url_for(&self, id: &str) -> String {
        self.profile_url.replace("{id}", id)
    }

    pub fn avatar_url_for(&self, id: &str) -> String {
        self.avatar_url.replace("{id}", id)
    }

    pub fn is_reserved(&self, id: &str) -> bool {
        self.reserved_routes.iter().any(|route| route == id)
    }
}

impl Default for DefaultPlatform {
    fn default() -> Self {
        Self::github()
    }
}

/// Setup-time configuration for [`MagicLink`](super::rule::MagicLink).
#[derive(Default)]
pub struct MagicLinkOptions {
    /// Literal link names, matched case-sensitively.
    pub links: HashMap<String, LinkTarget>,
    pub platform_users: PlatformUsers,
    /// Tried in order, first match wins.
    pub image_overrides: Vec<ImageOverride>,
    pub default_platform: DefaultPlatform,
    /// Replaces the built-in handler chain entirely.
    pub handlers: Option<HandlerChain>,
}

impl MagicLinkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link(mut self, name: impl Into<String>, target: impl Into<LinkTarget>) -> Self {
        self.links.insert(name.into(), target.into());
        self
    }

    pub fn with_platform_user(
        mut self,
        platform: impl Into<String>,
        username: impl Into<String>,
        user: PlatformUser,
    ) -> Self {
        self.platform_users
            .entry(platform.into())
            .or_default()
            .insert(username.into(), user);
        self
    }

    pub fn with_image_override(mut self, rule: ImageOverride) -> Self {
        self.image_overrides.push(rule);
        self
    }

    pub fn with_default_platform(mut self, platform: DefaultPlatform) -> Self {
        self.default_platform = platform;
        self
    }

    pub fn with_handlers(mut self, handlers: HandlerChain) -> Self {
        self.handlers = Some(handlers);
        self
    }
}

impl fmt::Debug for MagicLinkOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MagicLinkOptions")
            .field("links", &self.links)
            .field("platform_users", &self.platform_users)
            .field("image_overrides", &self.image_overrides)
            .field("default_platform", &self.default_platform)
            .field("handlers", &self.handlers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_target_deserializes_both_shapes() {
        let bare: LinkTarget = serde_json::from_str(r#""https://vueuse.org""#).unwrap();
        assert_eq!(bare.link(), "https://vueuse.org");
        assert_eq!(bare.image_url(), None);

        let detailed: LinkTarget =
            serde_json::from_str(r#"{"link": "https://vueuse.org/1", "image_url": "https://i/1.png"}"#)
                .unwrap();
        assert_eq!(detailed.link(), "https://vueuse.org/1");
        assert_eq!(detailed.image_url(), Some("https://i/1.png"));
    }

    #[test]
    fn github_templates() {
        let github = DefaultPlatform::github();
        assert_eq!(github.profile_url_for("antfu"), "https://github.com/antfu");
        assert_eq!(github.avatar_url_for("antfu"), "https://github.com/antfu.png");
        assert!(github.is_reserved("settings"));
        assert!(!github.is_reserved("antfu"));
    }

    #[test]
    fn builder_groups_users_by_platform() {
        let options = MagicLinkOptions::new()
            .with_platform_user("bilibili", "a", PlatformUser::new("https://a", "https://a.png"))
            .with_platform_user("bilibili", "b", PlatformUser::new("https://b", "https://b.png"));
        assert_eq!(options.platform_users["bilibili"].len(), 2);
    }
}

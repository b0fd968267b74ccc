//! Shared configuration loader for magic-link.
//!
//! `defaults/magic-link.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`MagicLinkConfig`], which [`MagicLinkConfig::into_options`] turns into the
//! parser's [`MagicLinkOptions`].
//!
//! Link names and usernames are values, not table keys, so their case survives
//! the loader untouched.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use magic_link_parser::{
    DefaultPlatform, ImageOverride, LinkTarget, MagicLinkOptions, PlatformUser,
};
pub use config::ConfigError;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

const DEFAULT_TOML: &str = include_str!("../defaults/magic-link.default.toml");

/// Top-level configuration consumed by magic-link applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MagicLinkConfig {
    #[serde(default)]
    pub links: Vec<LinkConfig>,
    #[serde(default)]
    pub platform_users: Vec<PlatformUserConfig>,
    #[serde(default)]
    pub image_overrides: Vec<ImageOverrideConfig>,
    pub default_platform: DefaultPlatform,
}

/// One entry of the literal-link map.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    pub name: String,
    pub link: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One user on a named platform.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformUserConfig {
    pub platform: String,
    pub username: String,
    pub link: String,
    pub avatar_url: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// An image override rule; exactly one of `exact` and `pattern` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageOverrideConfig {
    #[serde(default)]
    pub exact: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    pub image: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("image override {index}: invalid pattern `{pattern}`: {source}")]
    Pattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("image override {index}: set exactly one of `exact` or `pattern`")]
    Matcher { index: usize },
}

impl MagicLinkConfig {
    /// Compile the configuration into parser options.
    pub fn into_options(self) -> Result<MagicLinkOptions, LoadError> {
        let mut options = MagicLinkOptions::new().with_default_platform(self.default_platform);

        for entry in self.links {
            let target = match entry.image_url {
                Some(image_url) => LinkTarget::Detailed {
                    link: entry.link,
                    image_url: Some(image_url),
                },
                None => LinkTarget::Url(entry.link),
            };
            options = options.with_link(entry.name, target);
        }

        for entry in self.platform_users {
            let mut user = PlatformUser::new(entry.link, entry.avatar_url);
            user.display_name = entry.display_name;
            options = options.with_platform_user(entry.platform, entry.username, user);
        }

        for (index, rule) in self.image_overrides.into_iter().enumerate() {
            let rule = match (rule.exact, rule.pattern) {
                (Some(link), None) => ImageOverride::exact(link, rule.image),
                (None, Some(pattern)) => ImageOverride::pattern(&pattern, rule.image)
                    .map_err(|source| LoadError::Pattern {
                        index,
                        pattern,
                        source,
                    })?,
                _ => return Err(LoadError::Matcher { index }),
            };
            options = options.with_image_override(rule);
        }

        Ok(options)
    }
}

/// Layers configuration files and `key=value` settings over the embedded defaults.
///
/// Later layers win. Settings use dotted keys into the TOML tree, e.g.
/// `default_platform.host`.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Layer a TOML file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    /// Apply `key=value` settings on top of every file layer.
    pub fn with_settings<K, V>(
        mut self,
        settings: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        V: Into<ValueKind>,
    {
        for (key, value) in settings {
            self.builder = self.builder.set_override(key.as_ref(), value)?;
        }
        Ok(self)
    }

    pub fn build(self) -> Result<MagicLinkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    /// Build and compile straight into parser options.
    pub fn build_options(self) -> Result<MagicLinkOptions, LoadError> {
        self.build()?.into_options()
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

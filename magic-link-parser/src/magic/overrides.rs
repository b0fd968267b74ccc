//! Image override rules, applied after every other resolution step.

use regex::Regex;
use tracing::debug;

use super::record::ResolvedLink;

/// How an override rule recognizes a resolved link.
#[derive(Debug, Clone)]
pub enum UrlMatcher {
    /// The link equals this string.
    Exact(String),
    /// The pattern matches somewhere in the link.
    Pattern(Regex),
}

impl UrlMatcher {
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(UrlMatcher::Pattern(Regex::new(pattern)?))
    }

    pub fn matches(&self, link: &str) -> bool {
        match self {
            UrlMatcher::Exact(expected) => link == expected,
            UrlMatcher::Pattern(regex) => regex.is_match(link),
        }
    }
}

/// Replace the image of links matching `matcher` with `image_url`.
#[derive(Debug, Clone)]
pub struct ImageOverride {
    pub matcher: UrlMatcher,
    pub image_url: String,
}

impl ImageOverride {
    pub fn exact(link: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            matcher: UrlMatcher::Exact(link.into()),
            image_url: image_url.into(),
        }
    }

    pub fn pattern(pattern: &str, image_url: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            matcher: UrlMatcher::pattern(pattern)?,
            image_url: image_url.into(),
        })
    }
}

/// Apply the first rule matching the link. At most one rule ever applies.
pub fn apply_overrides(mut resolved: ResolvedLink, rules: &[ImageOverride]) -> ResolvedLink {
    if let Some(rule) = rules.iter().find(|rule| rule.matcher.matches(&resolved.link)) {
        debug!(link = %resolved.link, image = %rule.image_url, "image override applied");
        resolved.image_url = rule.image_url.clone();
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(link: &str) -> ResolvedLink {
        ResolvedLink {
            text: "t".into(),
            link: link.into(),
            link_type: "link".into(),
            class: vec!["markdown-magic-link".into(), "markdown-magic-link-link".into()],
            image_url: "https://favicon.yandex.net/favicon/vueuse.org".into(),
        }
    }

    fn rules() -> Vec<ImageOverride> {
        vec![
            ImageOverride::pattern(r"^https://vueuse\.org/1", "https://example.com/favicon1.png")
                .unwrap(),
            ImageOverride::pattern(r"^https://vueuse\.org/", "https://example.com/favicon2.png")
                .unwrap(),
        ]
    }

    #[test]
    fn first_matching_rule_wins() {
        let link = apply_overrides(resolved("https://vueuse.org/1"), &rules());
        assert_eq!(link.image_url, "https://example.com/favicon1.png");
    }

    #[test]
    fn broader_rule_applies_when_narrow_one_misses() {
        let link = apply_overrides(resolved("https://vueuse.org/anything"), &rules());
        assert_eq!(link.image_url, "https://example.com/favicon2.png");
    }

    #[test]
    fn no_match_leaves_image_alone() {
        let link = apply_overrides(resolved("https://example.org"), &rules());
        assert_eq!(
            link.image_url,
            "https://favicon.yandex.net/favicon/vueuse.org"
        );
    }

    #[test]
    fn exact_matcher_compares_whole_link() {
        let rules = vec![ImageOverride::exact("https://vueuse.org", "https://img/exact.png")];
        assert_eq!(
            apply_overrides(resolved("https://vueuse.org"), &rules).image_url,
            "https://img/exact.png"
        );
        assert_ne!(
            apply_overrides(resolved("https://vueuse.org/1"), &rules).image_url,
            "https://img/exact.png"
        );
    }

    #[test]
    fn patterns_are_unanchored() {
        let matcher = UrlMatcher::pattern(r"vueuse").unwrap();
        assert!(matcher.matches("https://vueuse.org"));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(ImageOverride::pattern("(", "x").is_err());
    }
}

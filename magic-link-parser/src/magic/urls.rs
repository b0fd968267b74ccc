//! Small URL helpers shared by the handlers and the resolver.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Prefix of every favicon-by-domain image URL.
pub const FAVICON_SERVICE: &str = "https://favicon.yandex.net/favicon/";

static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("scheme prefix pattern is valid"));

/// Whether `url` starts with a lowercase `http://` or `https://` scheme.
pub fn has_http_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Drop a leading `http://` or `https://`, in any case.
pub fn strip_scheme(url: &str) -> &str {
    match SCHEME_PREFIX.find(url) {
        Some(prefix) => &url[prefix.end()..],
        None => url,
    }
}

/// Favicon lookup keyed by the host of `url`. `None` when the URL has no host.
pub fn favicon_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str().filter(|host| !host.is_empty())?;
    Some(format!("{FAVICON_SERVICE}{host}"))
}

/// `Some(value)` unless the value is empty.
pub fn non_empty<S: AsRef<str>>(value: Option<S>) -> Option<S> {
    value.filter(|value| !value.as_ref().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_case_insensitively() {
        assert_eq!(strip_scheme("https://vueuse.org"), "vueuse.org");
        assert_eq!(strip_scheme("HTTP://example.com/a"), "example.com/a");
        assert_eq!(strip_scheme("ftp://example.com"), "ftp://example.com");
    }

    #[test]
    fn scheme_check_is_case_sensitive() {
        assert!(has_http_scheme("http://a.b"));
        assert!(has_http_scheme("https://a.b"));
        assert!(!has_http_scheme("HTTPS://a.b"));
        assert!(!has_http_scheme("@antfu"));
    }

    #[test]
    fn favicon_uses_host_only() {
        assert_eq!(
            favicon_url("https://vueuse.org/guide?x=1").as_deref(),
            Some("https://favicon.yandex.net/favicon/vueuse.org")
        );
        assert_eq!(favicon_url("not a url"), None);
    }
}

//! Link records produced by handlers and consumed by the host.
//!
//!     Handlers return a [`PartialLink`] where everything but the link target is optional. The
//!     resolver turns it into a [`ResolvedLink`], whose fields are all filled in. Keeping the two
//!     as separate types means a half-defaulted record can never reach the renderer.

use markdown_it::{Node, NodeValue, Renderer};
use serde::Serialize;

/// Generic class carried by every rendered magic link.
pub const MARKER_CLASS: &str = "markdown-magic-link";
/// Class of the decorative span holding the image.
pub const IMAGE_CLASS: &str = "markdown-magic-link-image";
/// Type tag of plain links, also used when a handler sets none.
pub const LINK_TYPE: &str = "link";

/// Handler output. Only `link` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialLink {
    pub text: Option<String>,
    pub link: String,
    pub link_type: Option<String>,
    pub class: Vec<String>,
    pub image_url: Option<String>,
}

impl PartialLink {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = Some(link_type.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class.push(class.into());
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// Fully defaulted record, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLink {
    pub text: String,
    pub link: String,
    #[serde(rename = "type")]
    pub link_type: String,
    pub class: Vec<String>,
    pub image_url: String,
}

impl ResolvedLink {
    /// Space separated class attribute value.
    pub fn class_attr(&self) -> String {
        self.class.join(" ")
    }

    /// The decorative span showing the image as a CSS background.
    pub fn image_html(&self) -> String {
        format!(
            "<span class=\"{IMAGE_CLASS}\" style=\"background-image: url('{}');\"></span>",
            self.image_url
        )
    }
}

// Rendered as anchor open, image span, text, anchor close.
impl NodeValue for ResolvedLink {
    fn render(&self, node: &Node, fmt: &mut dyn Renderer) {
        let mut attrs = node.attrs.clone();
        attrs.push(("href", self.link.clone()));
        attrs.push(("class", self.class_attr()));

        fmt.open("a", &attrs);
        fmt.text_raw(&self.image_html());
        fmt.text(&self.text);
        fmt.close("a");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResolvedLink {
        ResolvedLink {
            text: "GITHUB".into(),
            link: "https://github.com/github".into(),
            link_type: "github-at".into(),
            class: vec![
                "markdown-magic-link".into(),
                "markdown-magic-link-github-at".into(),
            ],
            image_url: "https://github.com/github.png".into(),
        }
    }

    #[test]
    fn builds_partial_links() {
        let partial = PartialLink::new("https://a.b")
            .with_text("A")
            .with_type("link")
            .with_class("extra")
            .with_image("https://a.b/i.png");
        assert_eq!(partial.link, "https://a.b");
        assert_eq!(partial.text.as_deref(), Some("A"));
        assert_eq!(partial.class, vec!["extra".to_string()]);
    }

    #[test]
    fn renders_anchor_span_and_text() {
        let html = Node::new(sample()).render();
        assert_eq!(
            html,
            "<a href=\"https://github.com/github\" class=\"markdown-magic-link markdown-magic-link-github-at\">\
             <span class=\"markdown-magic-link-image\" style=\"background-image: url('https://github.com/github.png');\"></span>\
             GITHUB</a>"
        );
    }

    #[test]
    fn escapes_text_but_not_the_image_span() {
        let mut link = sample();
        link.text = "Tom & Jerry".into();
        let html = Node::new(link).render();
        assert!(html.contains("</span>Tom &amp; Jerry</a>"));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "github-at");
        assert_eq!(json["imageUrl"], "https://github.com/github.png");
        assert_eq!(json["class"][1], "markdown-magic-link-github-at");
    }
}

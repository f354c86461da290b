//! HTML syntax tree
//!
//! Produced by the markdown-to-HTML conversion, rewritten by the sanitize and
//! format stages, and written out by [`serializer`]. Raw nodes hold markup
//! copied from the markdown source; whether they are emitted verbatim is
//! decided at serialization time.

pub mod serializer;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Root {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Element(Element),
    Text { value: String },
    Comment { value: String },
    Raw { value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub tag_name: String,
    /// Attributes in output order
    pub properties: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Elements whose content is not reflowed by the formatter.
pub const WHITESPACE_SENSITIVE: &[&str] = &[
    "pre",
    "textarea",
    "script",
    "style",
    "listing",
    "plaintext",
    "xmp",
];

const PHRASING: &[&str] = &[
    "a", "abbr", "audio", "b", "bdi", "bdo", "br", "button", "canvas", "cite", "code", "data",
    "datalist", "del", "dfn", "em", "embed", "i", "iframe", "img", "input", "ins", "kbd",
    "label", "map", "mark", "math", "meter", "noscript", "object", "output", "picture",
    "progress", "q", "ruby", "s", "samp", "script", "select", "slot", "small", "span",
    "strong", "sub", "sup", "svg", "template", "textarea", "time", "u", "var", "video", "wbr",
];

/// Whether `tag` is phrasing (inline) content.
pub fn is_phrasing_tag(tag: &str) -> bool {
    PHRASING.contains(&tag)
}

impl Element {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    pub fn is_element(&self, tag: &str) -> bool {
        matches!(self, Node::Element(element) if element.tag_name == tag)
    }

    /// Phrasing content: text, raw markup, and inline elements.
    pub fn is_phrasing(&self) -> bool {
        match self {
            Node::Text { .. } | Node::Raw { .. } => true,
            Node::Comment { .. } => false,
            Node::Element(element) => is_phrasing_tag(&element.tag_name),
        }
    }

    /// Text consisting only of HTML whitespace.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text { value } if value.chars().all(is_html_whitespace))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

pub fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}')
}

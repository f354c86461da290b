//! Markdown syntax tree
//!
//! Owned tree produced by the parse stage and rewritten by the TOC stage.
//! Soft line breaks live inside [`Node::Text`] values as `\n`; adjacent text
//! is always merged into a single node.

pub mod parser;

use serde::Serialize;

/// Root of a markdown document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Root {
    pub children: Vec<Node>,
}

/// A markdown node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Blockquote {
        children: Vec<Node>,
    },
    Break,
    Code {
        lang: Option<String>,
        meta: Option<String>,
        value: String,
    },
    Delete {
        children: Vec<Node>,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Heading {
        depth: u8,
        children: Vec<Node>,
    },
    Html {
        value: String,
    },
    Image {
        url: String,
        title: Option<String>,
        alt: String,
    },
    InlineCode {
        value: String,
    },
    Link {
        url: String,
        title: Option<String>,
        children: Vec<Node>,
    },
    List(List),
    Paragraph {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    Table(Table),
    Text {
        value: String,
    },
    ThematicBreak,
}

/// An ordered or unordered list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub ordered: bool,
    /// Number of the first item, ordered lists only
    pub start: Option<u64>,
    /// Loose list: items are separated by blank lines
    pub spread: bool,
    pub children: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub spread: bool,
    /// Task-list state; `None` for plain items
    pub checked: Option<bool>,
    pub children: Vec<Node>,
}

/// A table; the first row is the header row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub align: Vec<Align>,
    pub children: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub children: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub children: Vec<Node>,
}

/// Column alignment of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    /// Child nodes of parent nodes that hold plain node lists.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Blockquote { children }
            | Node::Delete { children }
            | Node::Emphasis { children }
            | Node::Heading { children, .. }
            | Node::Link { children, .. }
            | Node::Paragraph { children }
            | Node::Strong { children } => Some(children),
            _ => None,
        }
    }
}

/// Append text to `nodes`, merging with a trailing text node.
pub fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text { value }) = nodes.last_mut() {
        value.push_str(text);
    } else {
        nodes.push(Node::text(text));
    }
}

/// Concatenated textual content of `nodes`.
///
/// Text, inline code and inline HTML contribute their values; image alt text
/// only when `include_image_alt` is set.
pub fn to_plain_text(nodes: &[Node], include_image_alt: bool) -> String {
    let mut out = String::new();
    collect_plain_text(nodes, include_image_alt, &mut out);
    out
}

fn collect_plain_text(nodes: &[Node], include_image_alt: bool, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text { value } | Node::InlineCode { value } | Node::Html { value } => {
                out.push_str(value)
            }
            Node::Code { value, .. } => out.push_str(value),
            Node::Image { alt, .. } if include_image_alt => out.push_str(alt),
            Node::List(list) => {
                for item in &list.children {
                    collect_plain_text(&item.children, include_image_alt, out);
                }
            }
            Node::Table(table) => {
                for cell in table.children.iter().flat_map(|row| &row.children) {
                    collect_plain_text(&cell.children, include_image_alt, out);
                }
            }
            other => {
                if let Some(children) = other.children() {
                    collect_plain_text(children, include_image_alt, out);
                }
            }
        }
    }
}

/// Visit every heading in document order, descending into containers.
pub fn visit_headings<'a>(nodes: &'a [Node], visit: &mut dyn FnMut(u8, &'a [Node])) {
    for node in nodes {
        match node {
            Node::Heading { depth, children } => visit(*depth, children),
            Node::Blockquote { children } => visit_headings(children, visit),
            Node::List(list) => {
                for item in &list.children {
                    visit_headings(&item.children, visit);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_text_merges_adjacent_text() {
        let mut nodes = vec![];
        push_text(&mut nodes, "one");
        push_text(&mut nodes, "\n");
        push_text(&mut nodes, "two");
        assert_eq!(nodes, vec![Node::text("one\ntwo")]);
    }

    #[test]
    fn plain_text_skips_image_alt_on_request() {
        let nodes = vec![
            Node::text("Intro "),
            Node::Emphasis {
                children: vec![Node::text("to")],
            },
            Node::InlineCode {
                value: " code".to_string(),
            },
            Node::Image {
                url: "a.png".to_string(),
                title: None,
                alt: " logo".to_string(),
            },
        ];
        assert_eq!(to_plain_text(&nodes, false), "Intro to code");
        assert_eq!(to_plain_text(&nodes, true), "Intro to code logo");
    }

    #[test]
    fn headings_are_visited_inside_containers() {
        let root = vec![
            Node::Heading {
                depth: 1,
                children: vec![Node::text("A")],
            },
            Node::Blockquote {
                children: vec![Node::Heading {
                    depth: 2,
                    children: vec![Node::text("B")],
                }],
            },
        ];
        let mut seen = vec![];
        visit_headings(&root, &mut |depth, children| {
            seen.push((depth, to_plain_text(children, false)));
        });
        assert_eq!(seen, vec![(1, "A".to_string()), (2, "B".to_string())]);
    }

    #[test]
    fn nodes_serialize_with_type_tag() {
        let node = Node::Heading {
            depth: 2,
            children: vec![Node::text("Hi")],
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "heading");
        assert_eq!(json["children"][0]["type"], "text");
        assert_eq!(json["children"][0]["value"], "Hi");
    }
}

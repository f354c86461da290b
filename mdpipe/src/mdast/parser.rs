//! Markdown parsing (markdown text → mdast)
//!
//! Pipeline: Markdown string → Comrak AST → mdast
//!
//! Comrak does the actual parsing; this module only maps its arena tree onto
//! the owned [`Root`] the later stages work with.

use super::{
    push_text, to_plain_text, Align, List, ListItem, Node, Root, Table, TableCell, TableRow,
};
use crate::error::ProcessError;
use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{parse_document, Arena, ComrakOptions};

/// Options for the parse stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Enable GitHub extensions: tables, strikethrough, task lists, autolinks
    pub gfm: bool,
    /// Typographic quotes, dashes and ellipses
    pub smart: bool,
    /// Deepest block/inline nesting accepted before the input is rejected
    pub max_nesting: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: false,
            smart: false,
            max_nesting: 256,
        }
    }
}

/// Parse markdown source into an mdast tree.
pub fn parse_markdown(source: &str, options: &ParseOptions) -> Result<Root, ProcessError> {
    let arena = Arena::new();
    let comrak_options = comrak_options(options);
    let root = parse_document(&arena, source, &comrak_options);

    let converter = Converter {
        limit: options.max_nesting,
    };
    let children = converter.children(root, 0)?;
    Ok(Root { children })
}

fn comrak_options(options: &ParseOptions) -> ComrakOptions<'static> {
    let mut comrak = ComrakOptions::default();
    comrak.extension.table = options.gfm;
    comrak.extension.strikethrough = options.gfm;
    comrak.extension.autolink = options.gfm;
    comrak.extension.tasklist = options.gfm;
    comrak.parse.smart = options.smart;
    comrak
}

struct Converter {
    limit: usize,
}

impl Converter {
    fn children<'a>(&self, node: &'a AstNode<'a>, depth: usize) -> Result<Vec<Node>, ProcessError> {
        let mut out = Vec::new();
        for child in node.children() {
            self.node(child, depth + 1, &mut out)?;
        }
        Ok(out)
    }

    fn node<'a>(
        &self,
        node: &'a AstNode<'a>,
        depth: usize,
        out: &mut Vec<Node>,
    ) -> Result<(), ProcessError> {
        if depth > self.limit {
            return Err(ProcessError::NestingTooDeep { limit: self.limit });
        }

        let data = node.data.borrow();
        match &data.value {
            NodeValue::Paragraph => out.push(Node::Paragraph {
                children: self.children(node, depth)?,
            }),

            NodeValue::Heading(heading) => out.push(Node::Heading {
                depth: heading.level,
                children: self.children(node, depth)?,
            }),

            NodeValue::ThematicBreak => out.push(Node::ThematicBreak),

            NodeValue::BlockQuote => out.push(Node::Blockquote {
                children: self.children(node, depth)?,
            }),

            NodeValue::List(list) => {
                let ordered = matches!(list.list_type, ListType::Ordered);
                let spread = !list.tight;
                let mut items = Vec::new();
                for child in node.children() {
                    items.push(self.list_item(child, depth + 1, spread)?);
                }
                out.push(Node::List(List {
                    ordered,
                    start: ordered.then_some(list.start as u64),
                    spread,
                    children: items,
                }));
            }

            NodeValue::CodeBlock(code) => {
                let (lang, meta) = split_info_string(&code.info);
                let value = code.literal.strip_suffix('\n').unwrap_or(&code.literal);
                out.push(Node::Code {
                    lang,
                    meta,
                    value: value.to_string(),
                });
            }

            NodeValue::HtmlBlock(html) => out.push(Node::Html {
                value: html.literal.trim_end_matches('\n').to_string(),
            }),

            NodeValue::Table(table) => {
                let align = table
                    .alignments
                    .iter()
                    .map(|alignment| match alignment {
                        TableAlignment::Left => Align::Left,
                        TableAlignment::Right => Align::Right,
                        TableAlignment::Center => Align::Center,
                        TableAlignment::None => Align::None,
                    })
                    .collect();
                let mut rows = Vec::new();
                for row in node.children() {
                    let mut cells = Vec::new();
                    for cell in row.children() {
                        cells.push(TableCell {
                            children: self.children(cell, depth + 2)?,
                        });
                    }
                    rows.push(TableRow { children: cells });
                }
                out.push(Node::Table(Table {
                    align,
                    children: rows,
                }));
            }

            NodeValue::Text(text) => push_text(out, text),

            NodeValue::SoftBreak => push_text(out, "\n"),

            NodeValue::LineBreak => out.push(Node::Break),

            NodeValue::Code(code) => out.push(Node::InlineCode {
                value: code.literal.clone(),
            }),

            NodeValue::HtmlInline(html) => out.push(Node::Html {
                value: html.clone(),
            }),

            NodeValue::Emph => out.push(Node::Emphasis {
                children: self.children(node, depth)?,
            }),

            NodeValue::Strong => out.push(Node::Strong {
                children: self.children(node, depth)?,
            }),

            NodeValue::Strikethrough => out.push(Node::Delete {
                children: self.children(node, depth)?,
            }),

            NodeValue::Link(link) => out.push(Node::Link {
                url: link.url.clone(),
                title: non_empty(&link.title),
                children: self.children(node, depth)?,
            }),

            NodeValue::Image(link) => {
                let alt = to_plain_text(&self.children(node, depth)?, true);
                out.push(Node::Image {
                    url: link.url.clone(),
                    title: non_empty(&link.title),
                    alt,
                });
            }

            _ => {
                // Document, stray items and extension nodes we do not model:
                // keep whatever content they carry.
                for child in self.children(node, depth)? {
                    match child {
                        Node::Text { value } => push_text(out, &value),
                        other => out.push(other),
                    }
                }
            }
        }

        Ok(())
    }

    fn list_item<'a>(
        &self,
        node: &'a AstNode<'a>,
        depth: usize,
        spread: bool,
    ) -> Result<ListItem, ProcessError> {
        if depth > self.limit {
            return Err(ProcessError::NestingTooDeep { limit: self.limit });
        }

        let checked = match &node.data.borrow().value {
            NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
            _ => None,
        };

        Ok(ListItem {
            spread,
            checked,
            children: self.children(node, depth)?,
        })
    }
}

/// Split a fenced code info string into language and meta.
fn split_info_string(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    if info.is_empty() {
        return (None, None);
    }
    match info.split_once(char::is_whitespace) {
        Some((lang, meta)) => (Some(lang.to_string()), non_empty(meta.trim())),
        None => (Some(info.to_string()), None),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

//! Table of contents insertion
//!
//! Looks for a top-level heading named like "Contents" / "Table of contents" /
//! "TOC" and replaces the section under it with a nested list of links to the
//! headings that follow the section.
//!
//! The section under the TOC heading runs until the next heading of the same
//! or a higher rank; only headings from that point on are listed. Headings
//! nested in block quotes or lists are never listed, but they do consume slugs
//! so the anchors agree with the ids generated by the HTML conversion.

use super::slug::Slugger;
use crate::error::ProcessError;
use crate::mdast::{to_plain_text, visit_headings, List, ListItem, Node, Root};
use regex::{Regex, RegexBuilder};

const STAGE: &str = "toc";

/// Options for the TOC stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocOptions {
    /// Pattern the whole heading text must match (case-insensitive)
    pub heading: String,
    pub min_depth: u8,
    pub max_depth: u8,
    /// Headings whose text fully matches this pattern are left out
    pub skip: Option<String>,
    /// Never wrap link text in paragraphs, even when entries nest
    pub tight: bool,
    pub ordered: bool,
    /// Prepended to every generated fragment, e.g. `user-content-`
    pub prefix: Option<String>,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            heading: "(table[ -]of[ -])?contents?|toc".to_string(),
            min_depth: 1,
            max_depth: 6,
            skip: None,
            tight: true,
            ordered: false,
            prefix: None,
        }
    }
}

/// A heading that ends up in the table of contents.
struct Entry {
    depth: u8,
    slug: String,
    children: Vec<Node>,
}

/// Insert a table of contents into `root`.
///
/// Returns `true` when the tree was changed. A document without a matching
/// heading, or with nothing to list after it, is left untouched.
pub fn insert_toc(root: &mut Root, options: &TocOptions) -> Result<bool, ProcessError> {
    let heading = full_match_pattern(&options.heading)?;
    let skip = options
        .skip
        .as_deref()
        .filter(|pattern| !pattern.is_empty())
        .map(full_match_pattern)
        .transpose()?;

    let mut slugger = Slugger::new();
    let mut index = None;
    let mut opening_depth = 0;
    let mut end_index = None;
    let mut entries = Vec::new();

    for (position, node) in root.children.iter().enumerate() {
        let (depth, children) = match node {
            Node::Heading { depth, children } => (*depth, children),
            other => {
                visit_headings(std::slice::from_ref(other), &mut |_, children| {
                    slugger.slug(&to_plain_text(children, false));
                });
                continue;
            }
        };

        let text = to_plain_text(children, false);
        let slug = slugger.slug(&text);

        if index.is_none() && heading.is_match(&text) {
            index = Some(position + 1);
            opening_depth = depth;
            continue;
        }

        if index.is_some() && end_index.is_none() && depth <= opening_depth {
            end_index = Some(position);
        }

        let in_range = depth >= options.min_depth && depth <= options.max_depth;
        let skipped = skip.as_ref().is_some_and(|skip| skip.is_match(&text));
        if end_index.is_some() && in_range && !skipped {
            entries.push(Entry {
                depth,
                slug,
                children: strip_links(children),
            });
        }
    }

    let Some(index) = index else {
        return Ok(false);
    };
    if entries.is_empty() {
        return Ok(false);
    }

    let end_index = end_index.unwrap_or(root.children.len());
    let table = contents(entries, options);
    tracing::debug!(index, end_index, "inserting table of contents");
    root.children.splice(index..end_index, std::iter::once(Node::List(table)));
    Ok(true)
}

fn full_match_pattern(pattern: &str) -> Result<Regex, ProcessError> {
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(true)
        .build()
        .map_err(|err| {
            ProcessError::invalid_option(STAGE, format!("bad pattern '{pattern}': {err}"))
        })
}

/// Build the nested list. Depths are normalised so the shallowest entry sits
/// at the top level.
fn contents(entries: Vec<Entry>, options: &TocOptions) -> List {
    let min_depth = entries.iter().map(|entry| entry.depth).min().unwrap_or(1);
    let mut table = empty_list(options);
    for entry in &entries {
        let depth = entry.depth - min_depth + 1;
        insert_into_list(&mut table, entry, depth, options);
    }
    table
}

fn empty_list(options: &TocOptions) -> List {
    List {
        ordered: options.ordered,
        start: options.ordered.then_some(1),
        spread: false,
        children: Vec::new(),
    }
}

fn insert_into_list(list: &mut List, entry: &Entry, depth: u8, options: &TocOptions) {
    if depth <= 1 {
        let prefix = options.prefix.as_deref().unwrap_or("");
        list.children.push(ListItem {
            spread: false,
            checked: None,
            children: vec![Node::Paragraph {
                children: vec![Node::Link {
                    url: format!("#{prefix}{}", entry.slug),
                    title: None,
                    children: entry.children.clone(),
                }],
            }],
        });
    } else if let Some(tail) = list.children.last_mut() {
        insert_into_item(tail, entry, depth, options);
    } else {
        let mut item = ListItem {
            spread: false,
            checked: None,
            children: Vec::new(),
        };
        insert_into_item(&mut item, entry, depth, options);
        list.children.push(item);
    }

    list.spread = !options.tight && list.children.iter().any(|item| item.spread);
}

fn insert_into_item(item: &mut ListItem, entry: &Entry, depth: u8, options: &TocOptions) {
    if let Some(Node::List(tail)) = item.children.last_mut() {
        insert_into_list(tail, entry, depth - 1, options);
    } else {
        let mut list = empty_list(options);
        insert_into_list(&mut list, entry, depth - 1, options);
        item.children.push(Node::List(list));
    }
    item.spread = !options.tight;
}

/// Copy heading content for use as link text: nested links are unwrapped.
fn strip_links(nodes: &[Node]) -> Vec<Node> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Link { children, .. } => out.extend(strip_links(children)),
            Node::Emphasis { children } => out.push(Node::Emphasis {
                children: strip_links(children),
            }),
            Node::Strong { children } => out.push(Node::Strong {
                children: strip_links(children),
            }),
            Node::Delete { children } => out.push(Node::Delete {
                children: strip_links(children),
            }),
            other => out.push(other.clone()),
        }
    }
    out
}

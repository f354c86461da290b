//! HTML tree formatting
//!
//! Collapses insignificant whitespace and re-indents the tree:
//! - an element with any non-phrasing child gets every child on its own line,
//!   indented one step deeper than the element, and its closing tag on a line
//!   of its own;
//! - phrasing content stays inline with runs of whitespace collapsed to a
//!   single space and trimmed at block boundaries;
//! - `pre`, `textarea`, `script` and `style` are left exactly as they are.
//!
//! The formatted document ends with a newline.

use crate::hast::{self, is_html_whitespace, Element, Node, WHITESPACE_SENSITIVE};

/// Options for the format stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// One level of indentation
    pub indent: String,
    /// Tag names separated by a blank line when they follow each other
    pub blanks: Vec<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            blanks: Vec::new(),
        }
    }
}

/// Format `root` in place.
pub fn format(root: &mut hast::Root, options: &FormatOptions) {
    let children = std::mem::take(&mut root.children);
    let mut children = format_block(children, 0, true, options);
    if !children.is_empty() {
        children.push(Node::text("\n"));
    }
    root.children = children;
}

fn format_element(mut element: Element, level: usize, options: &FormatOptions) -> Element {
    if WHITESPACE_SENSITIVE.contains(&element.tag_name.as_str()) {
        return element;
    }

    let children = std::mem::take(&mut element.children);
    element.children = if children.iter().any(|child| !child.is_phrasing()) {
        format_block(children, level + 1, false, options)
    } else {
        let mut children = children;
        collapse(&mut children, &mut true);
        if !hast::is_phrasing_tag(&element.tag_name) {
            trim_end(&mut children);
        }
        remove_empty_text(&mut children);
        children
    };
    element
}

/// One output line: a block node, or a run of phrasing content.
enum Line {
    Block(Node),
    Inline(Vec<Node>),
}

fn format_block(
    children: Vec<Node>,
    level: usize,
    is_root: bool,
    options: &FormatOptions,
) -> Vec<Node> {
    let mut lines = Vec::new();
    let mut run = Vec::new();

    for child in children {
        if child.is_phrasing() {
            run.push(child);
            continue;
        }
        flush_run(&mut run, &mut lines);
        let child = match child {
            Node::Element(element) => Node::Element(format_element(element, level, options)),
            other => other,
        };
        lines.push(Line::Block(child));
    }
    flush_run(&mut run, &mut lines);

    let indent = options.indent.repeat(level);
    let mut out = Vec::new();
    let mut previous_tag: Option<String> = None;

    for (index, line) in lines.into_iter().enumerate() {
        let tag = match &line {
            Line::Block(Node::Element(element)) => Some(element.tag_name.clone()),
            _ => None,
        };
        let blank = match (&previous_tag, &tag) {
            (Some(previous), Some(current)) => {
                options.blanks.contains(previous) && options.blanks.contains(current)
            }
            _ => false,
        };

        if index > 0 || !is_root {
            let separator = if blank { "\n\n" } else { "\n" };
            out.push(Node::text(format!("{separator}{indent}")));
        }

        match line {
            Line::Block(node) => out.push(node),
            Line::Inline(nodes) => out.extend(nodes),
        }
        previous_tag = tag;
    }

    if !is_root && !out.is_empty() {
        let closing = options.indent.repeat(level.saturating_sub(1));
        out.push(Node::text(format!("\n{closing}")));
    }

    out
}

/// Turn the pending phrasing run into lines.
///
/// A run made only of raw markup (HTML blocks from the source) puts each raw
/// node on its own line.
fn flush_run(run: &mut Vec<Node>, lines: &mut Vec<Line>) {
    if run.is_empty() {
        return;
    }
    let mut nodes = std::mem::take(run);
    collapse(&mut nodes, &mut true);
    trim_end(&mut nodes);
    remove_empty_text(&mut nodes);

    if nodes.is_empty() {
        return;
    }
    if nodes.iter().all(|node| matches!(node, Node::Raw { .. })) {
        lines.extend(nodes.into_iter().map(Line::Block));
    } else {
        lines.push(Line::Inline(nodes));
    }
}

/// Collapse whitespace runs across a sequence of phrasing nodes.
///
/// `previous_space` carries whether the output so far ends in whitespace, so a
/// space is never doubled across element boundaries.
fn collapse(nodes: &mut [Node], previous_space: &mut bool) {
    for node in nodes.iter_mut() {
        match node {
            Node::Text { value } => *value = collapse_text(value, previous_space),
            Node::Element(element) if WHITESPACE_SENSITIVE.contains(&element.tag_name.as_str()) => {
                *previous_space = false;
            }
            Node::Element(element) if element.tag_name == "br" => *previous_space = true,
            Node::Element(element) if element.children.is_empty() => *previous_space = false,
            Node::Element(element) => collapse(&mut element.children, previous_space),
            Node::Raw { .. } => *previous_space = false,
            Node::Comment { .. } => {}
        }
    }
}

fn collapse_text(value: &str, previous_space: &mut bool) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if is_html_whitespace(c) {
            if !*previous_space {
                out.push(' ');
                *previous_space = true;
            }
        } else {
            out.push(c);
            *previous_space = false;
        }
    }
    out
}

/// Remove trailing whitespace from the last text in a phrasing run.
fn trim_end(nodes: &mut [Node]) {
    for node in nodes.iter_mut().rev() {
        match node {
            Node::Text { value } => {
                let trimmed = value.trim_end_matches(is_html_whitespace).len();
                value.truncate(trimmed);
                if !value.is_empty() {
                    return;
                }
            }
            Node::Element(element)
                if !element.children.is_empty()
                    && !WHITESPACE_SENSITIVE.contains(&element.tag_name.as_str()) =>
            {
                trim_end(&mut element.children);
                return;
            }
            _ => return,
        }
    }
}

fn remove_empty_text(nodes: &mut Vec<Node>) {
    nodes.retain(|node| !matches!(node, Node::Text { value } if value.is_empty()));
    for node in nodes.iter_mut() {
        if let Node::Element(element) = node {
            if !WHITESPACE_SENSITIVE.contains(&element.tag_name.as_str()) {
                remove_empty_text(&mut element.children);
            }
        }
    }
}

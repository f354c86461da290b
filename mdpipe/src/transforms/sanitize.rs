//! HTML sanitization
//!
//! Rewrites the HTML tree against an allowlist modelled on GitHub's
//! rendering rules. Off by default: the pipeline passes raw HTML from the
//! markdown through untouched unless sanitization is switched on.
//!
//! - `script` and `style` are removed together with their content
//! - other unknown elements are replaced by their children
//! - attributes not allowed for the element are dropped
//! - URL attributes must be relative or use an allowed scheme
//! - `id` and `name` values are prefixed with `user-content-`
//! - comments are removed
//! - raw markup is cleaned with ammonia, together with the inline content
//!   between raw tags

use crate::error::ProcessError;
use crate::hast::serializer::{stringify, StringifyOptions};
use crate::hast::{self, Element, Node};
use std::collections::HashSet;

pub const CLOBBER_PREFIX: &str = "user-content-";

/// Options for the sanitize stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeOptions {
    pub enabled: bool,
}

const STRIP: &[&str] = &["script", "style"];

const TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "br", "b", "i", "strong", "em", "a", "pre", "code",
    "img", "tt", "div", "ins", "del", "sup", "sub", "p", "picture", "ol", "ul", "table",
    "thead", "tbody", "tfoot", "blockquote", "dl", "dt", "dd", "kbd", "q", "samp", "var", "hr",
    "ruby", "rt", "rp", "li", "tr", "td", "th", "s", "strike", "summary", "details", "caption",
    "figure", "figcaption", "abbr", "bdo", "cite", "dfn", "mark", "small", "span", "time",
    "wbr", "input", "section",
];

const GLOBAL_ATTRIBUTES: &[&str] = &[
    "abbr", "align", "alt", "axis", "colspan", "dir", "height", "hidden", "id", "lang", "name",
    "open", "rowspan", "span", "summary", "title", "valign", "width",
];

fn element_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href"],
        "img" => &["src", "longdesc"],
        "blockquote" | "del" | "ins" | "q" => &["cite"],
        "input" => &["type", "checked", "disabled"],
        "ol" => &["start", "reversed", "class"],
        "ul" | "li" | "code" => &["class"],
        "time" => &["datetime"],
        _ => &[],
    }
}

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Sanitize `root` in place.
pub fn sanitize(root: &mut hast::Root) -> Result<(), ProcessError> {
    let children = std::mem::take(&mut root.children);
    root.children = sanitize_nodes(children)?;
    Ok(())
}

/// Sanitize a list of siblings.
///
/// Inline HTML arrives as one raw node per tag, so raw nodes are cleaned
/// together with the phrasing siblings between them as a single fragment.
fn sanitize_nodes(nodes: Vec<Node>) -> Result<Vec<Node>, ProcessError> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut fragment = Vec::new();
    for node in nodes {
        for node in sanitize_node(node)? {
            match node {
                Node::Raw { .. } => fragment.push(node),
                _ if !fragment.is_empty() && node.is_phrasing() => fragment.push(node),
                _ => {
                    flush_fragment(&mut fragment, &mut out)?;
                    out.push(node);
                }
            }
        }
    }
    flush_fragment(&mut fragment, &mut out)?;
    Ok(out)
}

fn sanitize_node(node: Node) -> Result<Vec<Node>, ProcessError> {
    Ok(match node {
        Node::Text { .. } | Node::Raw { .. } => vec![node],
        Node::Comment { .. } => Vec::new(),
        Node::Element(element) if STRIP.contains(&element.tag_name.as_str()) => Vec::new(),
        Node::Element(element) if !TAGS.contains(&element.tag_name.as_str()) => {
            sanitize_nodes(element.children)?
        }
        Node::Element(element) => vec![Node::Element(sanitize_element(element)?)],
    })
}

/// Clean the pending fragment up to its last raw node and emit it as one raw
/// node; phrasing content after the last raw node is kept as a tree.
fn flush_fragment(fragment: &mut Vec<Node>, out: &mut Vec<Node>) -> Result<(), ProcessError> {
    let Some(last_raw) = fragment
        .iter()
        .rposition(|node| matches!(node, Node::Raw { .. }))
    else {
        out.append(fragment);
        return Ok(());
    };
    let tail = fragment.split_off(last_raw + 1);
    let markup = stringify(
        &hast::Root {
            children: std::mem::take(fragment),
        },
        &StringifyOptions {
            allow_dangerous_html: true,
        },
    )?;
    let value = clean_raw(&markup);
    if !value.is_empty() {
        out.push(Node::Raw { value });
    }
    out.extend(tail);
    Ok(())
}

fn sanitize_element(mut element: Element) -> Result<Element, ProcessError> {
    let allowed = element_attributes(&element.tag_name);
    let tag = element.tag_name.clone();
    element.properties = std::mem::take(&mut element.properties)
        .into_iter()
        .filter_map(|(name, value)| {
            let name = name.to_ascii_lowercase();
            if !GLOBAL_ATTRIBUTES.contains(&name.as_str()) && !allowed.contains(&name.as_str()) {
                return None;
            }
            sanitize_attribute(&tag, &name, value).map(|value| (name, value))
        })
        .collect();
    element.children = sanitize_nodes(std::mem::take(&mut element.children))?;
    Ok(element)
}

fn sanitize_attribute(tag: &str, name: &str, value: String) -> Option<String> {
    match name {
        "href" | "src" | "cite" | "longdesc" => safe_url(&value).then_some(value),
        "id" | "name" => Some(format!("{CLOBBER_PREFIX}{value}")),
        "type" if tag == "input" => (value == "checkbox").then_some(value),
        "class" => {
            let kept: Vec<&str> = value
                .split_ascii_whitespace()
                .filter(|class| allowed_class(tag, class))
                .collect();
            (!kept.is_empty()).then(|| kept.join(" "))
        }
        _ => Some(value),
    }
}

fn allowed_class(tag: &str, class: &str) -> bool {
    match tag {
        "code" => class.starts_with("language-"),
        "ul" | "ol" => class == "contains-task-list",
        "li" => class == "task-list-item",
        _ => false,
    }
}

/// Relative URLs are always allowed; absolute ones need a safe scheme.
fn safe_url(value: &str) -> bool {
    let value = value.trim();
    let colon = match value.find(':') {
        Some(colon) => colon,
        None => return true,
    };
    // A colon after a path, query or fragment separator does not start a scheme.
    if value[..colon].contains(['/', '?', '#']) {
        return true;
    }
    let scheme = value[..colon].to_ascii_lowercase();
    SAFE_SCHEMES.contains(&scheme.as_str())
}

fn clean_raw(value: &str) -> String {
    let schemes: HashSet<&str> = SAFE_SCHEMES.iter().copied().collect();
    ammonia::Builder::default()
        .url_schemes(schemes)
        .clean(value)
        .to_string()
}

//! Markdown tree → HTML tree conversion
//!
//! Block content is separated by `\n` text nodes so the tree serializes to
//! readable HTML even without the format stage.

use super::slug::Slugger;
use crate::hast::{self, Element};
use crate::mdast::{self, to_plain_text, Align, List, ListItem, Table};
use crate::vfile::VFile;

const STAGE: &str = "to-html";

/// Options for the markdown-to-HTML conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToHtmlOptions {
    /// Keep raw HTML from the source as raw nodes instead of dropping it
    pub allow_dangerous_html: bool,
    /// Give headings `id` attributes matching the TOC fragments
    pub heading_ids: bool,
}

/// Convert a markdown tree into an HTML tree.
pub fn to_hast(root: &mdast::Root, options: &ToHtmlOptions, file: &mut VFile) -> hast::Root {
    let mut state = State {
        options: *options,
        slugger: Slugger::new(),
        dropped_raw: 0,
    };
    let children = state.all(&root.children);
    if state.dropped_raw > 0 {
        file.message(
            STAGE,
            format!(
                "dropped {} raw HTML node(s); enable allow_dangerous_html to keep them",
                state.dropped_raw
            ),
        );
    }
    hast::Root {
        children: wrap(children, false),
    }
}

struct State {
    options: ToHtmlOptions,
    slugger: Slugger,
    dropped_raw: usize,
}

impl State {
    fn all(&mut self, nodes: &[mdast::Node]) -> Vec<hast::Node> {
        let mut out = Vec::new();
        for node in nodes {
            self.one(node, &mut out);
        }
        out
    }

    fn one(&mut self, node: &mdast::Node, out: &mut Vec<hast::Node>) {
        use mdast::Node as M;

        match node {
            M::Blockquote { children } => {
                let children = wrap(self.all(children), true);
                out.push(Element::new("blockquote").with_children(children).into());
            }

            M::Break => {
                out.push(Element::new("br").into());
                out.push(hast::Node::text("\n"));
            }

            M::Code { lang, value, .. } => {
                let mut code = Element::new("code");
                if let Some(lang) = lang {
                    code = code.with_property("class", format!("language-{lang}"));
                }
                if !value.is_empty() {
                    code.children.push(hast::Node::text(format!("{value}\n")));
                }
                out.push(Element::new("pre").with_children(vec![code.into()]).into());
            }

            M::Delete { children } => {
                let children = self.all(children);
                out.push(Element::new("del").with_children(children).into());
            }

            M::Emphasis { children } => {
                let children = self.all(children);
                out.push(Element::new("em").with_children(children).into());
            }

            M::Heading { depth, children } => {
                let mut heading = Element::new(format!("h{}", (*depth).clamp(1, 6)));
                if self.options.heading_ids {
                    let id = self.slugger.slug(&to_plain_text(children, false));
                    heading = heading.with_property("id", id);
                }
                heading.children = self.all(children);
                out.push(heading.into());
            }

            M::Html { value } => {
                if self.options.allow_dangerous_html {
                    out.push(hast::Node::Raw {
                        value: value.clone(),
                    });
                } else {
                    self.dropped_raw += 1;
                }
            }

            M::Image { url, title, alt } => {
                let mut img = Element::new("img")
                    .with_property("src", normalize_uri(url))
                    .with_property("alt", alt.clone());
                if let Some(title) = title {
                    img = img.with_property("title", title.clone());
                }
                out.push(img.into());
            }

            M::InlineCode { value } => {
                out.push(
                    Element::new("code")
                        .with_children(vec![hast::Node::text(value.clone())])
                        .into(),
                );
            }

            M::Link {
                url,
                title,
                children,
            } => {
                let mut anchor = Element::new("a").with_property("href", normalize_uri(url));
                if let Some(title) = title {
                    anchor = anchor.with_property("title", title.clone());
                }
                anchor.children = self.all(children);
                out.push(anchor.into());
            }

            M::List(list) => out.push(self.list(list).into()),

            M::Paragraph { children } => {
                let children = self.all(children);
                out.push(Element::new("p").with_children(children).into());
            }

            M::Strong { children } => {
                let children = self.all(children);
                out.push(Element::new("strong").with_children(children).into());
            }

            M::Table(table) => out.push(self.table(table).into()),

            M::Text { value } => out.push(hast::Node::text(trim_lines(value))),

            M::ThematicBreak => out.push(Element::new("hr").into()),
        }
    }

    fn list(&mut self, list: &List) -> Element {
        let loose = list.spread || list.children.iter().any(|item| item.spread);
        let mut element = Element::new(if list.ordered { "ol" } else { "ul" });

        if let Some(start) = list.start.filter(|start| list.ordered && *start != 1) {
            element = element.with_property("start", start.to_string());
        }
        if list.children.iter().any(|item| item.checked.is_some()) {
            element = element.with_property("class", "contains-task-list");
        }

        let items = list
            .children
            .iter()
            .map(|item| self.list_item(item, loose).into())
            .collect();
        element.children = wrap(items, true);
        element
    }

    fn list_item(&mut self, item: &ListItem, loose: bool) -> Element {
        let mut results = self.all(&item.children);
        let mut element = Element::new("li");

        if let Some(checked) = item.checked {
            if !matches!(results.first(), Some(first) if first.is_element("p")) {
                results.insert(0, Element::new("p").into());
            }
            if let Some(hast::Node::Element(paragraph)) = results.first_mut() {
                if !paragraph.children.is_empty() {
                    paragraph.children.insert(0, hast::Node::text(" "));
                }
                let mut checkbox = Element::new("input").with_property("type", "checkbox");
                if checked {
                    checkbox = checkbox.with_property("checked", "");
                }
                checkbox = checkbox.with_property("disabled", "");
                paragraph.children.insert(0, checkbox.into());
            }
            element = element.with_property("class", "task-list-item");
        }

        let last_is_paragraph = results.last().is_some_and(|last| last.is_element("p"));
        let has_results = !results.is_empty();
        let mut children = Vec::new();
        for (index, child) in results.into_iter().enumerate() {
            let is_paragraph = child.is_element("p");
            if loose || index != 0 || !is_paragraph {
                children.push(hast::Node::text("\n"));
            }
            match child {
                hast::Node::Element(paragraph) if paragraph.tag_name == "p" && !loose => {
                    children.extend(paragraph.children);
                }
                other => children.push(other),
            }
        }
        if has_results && (loose || !last_is_paragraph) {
            children.push(hast::Node::text("\n"));
        }

        element.children = children;
        element
    }

    fn table(&mut self, table: &Table) -> Element {
        let mut rows = table.children.iter();
        let mut sections = Vec::new();

        if let Some(header) = rows.next() {
            let row = self.table_row(header, &table.align, "th");
            let thead = Element::new("thead").with_children(wrap(vec![row.into()], true));
            sections.push(thead.into());
        }

        let body: Vec<hast::Node> = rows
            .map(|row| self.table_row(row, &table.align, "td").into())
            .collect();
        if !body.is_empty() {
            let tbody = Element::new("tbody").with_children(wrap(body, true));
            sections.push(tbody.into());
        }

        Element::new("table").with_children(wrap(sections, true))
    }

    fn table_row(&mut self, row: &mdast::TableRow, align: &[Align], tag: &str) -> Element {
        let cells = row
            .children
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let mut element = Element::new(tag);
                match align.get(index).copied().unwrap_or(Align::None) {
                    Align::Left => element = element.with_property("align", "left"),
                    Align::Center => element = element.with_property("align", "center"),
                    Align::Right => element = element.with_property("align", "right"),
                    Align::None => {}
                }
                element.children = self.all(&cell.children);
                element.into()
            })
            .collect();
        Element::new("tr").with_children(wrap(cells, true))
    }
}

/// Join nodes with line feeds; loose wrapping also pads both ends.
fn wrap(nodes: Vec<hast::Node>, loose: bool) -> Vec<hast::Node> {
    let mut result = Vec::with_capacity(nodes.len() * 2 + 1);
    if loose {
        result.push(hast::Node::text("\n"));
    }
    let has_nodes = !nodes.is_empty();
    for (index, node) in nodes.into_iter().enumerate() {
        if index > 0 {
            result.push(hast::Node::text("\n"));
        }
        result.push(node);
    }
    if loose && has_nodes {
        result.push(hast::Node::text("\n"));
    }
    result
}

/// Remove spaces and tabs around line endings.
fn trim_lines(value: &str) -> String {
    if !value.contains('\n') {
        return value.to_string();
    }
    let lines: Vec<&str> = value.split('\n').collect();
    let last = lines.len() - 1;
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let line = if index > 0 { line.trim_start_matches([' ', '\t']) } else { line };
            if index < last {
                line.trim_end_matches([' ', '\t'])
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Percent-encode characters that are not safe in a URL, leaving existing
/// `%XX` escapes intact.
pub fn normalize_uri(url: &str) -> String {
    let bytes = url.as_bytes();
    let mut out = String::with_capacity(url.len());
    let mut index = 0;
    while index < bytes.len() {
        let byte = bytes[index];
        if byte == b'%'
            && index + 2 < bytes.len()
            && bytes[index + 1].is_ascii_hexdigit()
            && bytes[index + 2].is_ascii_hexdigit()
        {
            out.push_str(&url[index..index + 3]);
            index += 3;
            continue;
        }
        if byte.is_ascii_alphanumeric() || b"!#$&'()*+,-./:;=?@_~".contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
        index += 1;
    }
    out
}

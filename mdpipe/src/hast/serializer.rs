//! HTML serialization
//!
//! Writes a [`Root`] through html5ever's serializer, so escaping, void
//! elements and raw-text elements (`script`, `style`) follow the HTML
//! serialization algorithm.
//!
//! Raw nodes bypass the serializer: with `allow_dangerous_html` they are
//! written verbatim into the same buffer, otherwise they are written as
//! escaped text.

use super::{Element, Node, Root};
use crate::error::ProcessError;
use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::{ns, serialize, LocalName, QualName};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Options for the stringify stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringifyOptions {
    /// Emit raw nodes as-is instead of escaping them
    pub allow_dangerous_html: bool,
}

/// Output buffer shared between the html5ever serializer and raw writes.
#[derive(Clone, Default)]
struct SharedSink(Rc<RefCell<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct Document<'a> {
    root: &'a Root,
    raw: SharedSink,
    options: StringifyOptions,
}

impl Serialize for Document<'_> {
    fn serialize<S>(&self, serializer: &mut S, _traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        for child in &self.root.children {
            self.node(child, serializer)?;
        }
        Ok(())
    }
}

impl Document<'_> {
    fn node<S: Serializer>(&self, node: &Node, serializer: &mut S) -> io::Result<()> {
        match node {
            Node::Element(element) => self.element(element, serializer),
            Node::Text { value } => serializer.write_text(value),
            Node::Comment { value } => serializer.write_comment(value),
            Node::Raw { value } if self.options.allow_dangerous_html => {
                self.raw.clone().write_all(value.as_bytes())
            }
            Node::Raw { value } => serializer.write_text(value),
        }
    }

    fn element<S: Serializer>(&self, element: &Element, serializer: &mut S) -> io::Result<()> {
        let name = html_name(&element.tag_name);
        let attributes: Vec<(QualName, &str)> = element
            .properties
            .iter()
            .map(|(key, value)| {
                (
                    QualName::new(None, ns!(), LocalName::from(key.as_str())),
                    value.as_str(),
                )
            })
            .collect();

        serializer.start_elem(
            name.clone(),
            attributes.iter().map(|(key, value)| (key, *value)),
        )?;
        for child in &element.children {
            self.node(child, serializer)?;
        }
        serializer.end_elem(name)
    }
}

fn html_name(tag: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(tag))
}

/// Serialize `root` to an HTML string.
pub fn stringify(root: &Root, options: &StringifyOptions) -> Result<String, ProcessError> {
    let sink = SharedSink::default();
    let document = Document {
        root,
        raw: sink.clone(),
        options: *options,
    };

    serialize(sink.clone(), &document, SerializeOpts::default())
        .map_err(|err| ProcessError::Serialization(format!("HTML serialization failed: {err}")))?;

    let bytes = sink.0.take();
    String::from_utf8(bytes)
        .map_err(|err| ProcessError::Serialization(format!("UTF-8 conversion failed: {err}")))
}

//! Document tree loading for BPMN markup
//!
//! The loader turns raw document bytes into an attributed [`Element`] tree.
//! Namespace prefixes are kept verbatim on tag and attribute names; callers
//! use [`local_name`] and the accessor methods to look through them.

use crate::error::CoverageError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// A child of an element: either a nested element or a text leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its (possibly prefixed) tag, attributes, and children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// Attributes in document order, names as written (e.g. `xsi:type`)
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Strip a `prefix:` from a qualified name
pub fn local_name(qualified: &str) -> &str {
    match qualified.rfind(':') {
        Some(pos) => &qualified[pos + 1..],
        None => qualified,
    }
}

impl Element {
    /// Tag name without namespace prefix
    pub fn local_name(&self) -> &str {
        local_name(&self.tag)
    }

    /// Attribute value by exact (prefixed) name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Element children in document order, skipping text leaves
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Element children whose local name matches, ignoring namespace prefixes
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements()
            .filter(move |child| child.local_name() == local)
    }

    /// First child element with the given local name
    pub fn first_child_named(&self, local: &str) -> Option<&Element> {
        self.child_elements().find(|child| child.local_name() == local)
    }

    /// Text content: the first non-empty text leaf, trimmed.
    ///
    /// Returns an empty string when the element carries no text, so callers
    /// never have to distinguish "no text" from "empty text".
    pub fn text(&self) -> &str {
        self.children
            .iter()
            .find_map(|child| match child {
                Node::Text(t) if !t.trim().is_empty() => Some(t.trim()),
                _ => None,
            })
            .unwrap_or("")
    }

    /// Visit this element and its descendants in pre-order.
    ///
    /// Uses an explicit stack, so nesting depth is bounded by memory only.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        let mut stack = vec![self];
        while let Some(element) = stack.pop() {
            visit(element);
            let first = stack.len();
            stack.extend(element.child_elements());
            stack[first..].reverse();
        }
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        // Flatten the subtree so dropping a deep document does not recurse
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Node::Element(mut element) = node {
                pending.append(&mut element.children);
            }
        }
    }
}

/// Parse document bytes into an element tree.
///
/// `path` is only used to label errors. Malformed markup is fatal: no partial
/// tree is returned.
pub fn parse_document(bytes: &[u8], path: &Path) -> crate::Result<Element> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let fail = |message: String| CoverageError::parse(path, message);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if root.is_some() {
                    return Err(fail("multiple root elements".to_string()));
                }
                stack.push(start_element(e).map_err(fail)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = start_element(e).map_err(fail)?;
                close_element(&mut stack, &mut root, element).map_err(fail)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| fail("unexpected closing tag".to_string()))?;
                close_element(&mut stack, &mut root, element).map_err(fail)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| fail(format!("invalid text content: {err}")))?;
                push_text(&mut stack, text.into_owned()).map_err(fail)?;
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                let text = std::str::from_utf8(&raw)
                    .map_err(|err| fail(format!("invalid CDATA: {err}")))?;
                push_text(&mut stack, text.to_string()).map_err(fail)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(fail(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(fail(format!("unclosed element <{}>", open.tag)));
    }
    root.ok_or_else(|| fail("document has no root element".to_string()))
}

fn start_element(e: &BytesStart<'_>) -> std::result::Result<Element, String> {
    let tag = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| format!("invalid tag name: {err}"))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| format!("attribute error in <{tag}>: {err}"))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| format!("attribute key error in <{tag}>: {err}"))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| format!("attribute value error in <{tag}>: {err}"))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        tag,
        attributes,
        children: Vec::new(),
    })
}

fn close_element(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> std::result::Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err("multiple root elements".to_string()),
    }
}

fn push_text(stack: &mut [Element], text: String) -> std::result::Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err("text content outside the root element".to_string()),
    }
}

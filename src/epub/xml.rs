//! Minimal element tree over quick-xml events.
//!
//! OPF and NCX parsing needs "children of `<metadata>`" and "first `<navLabel>`
//! child" style lookups, so documents are read into a small tree first.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

/// Deepest element nesting accepted by [`parse_document`].
///
/// Tree walks recurse per level, so unbounded nesting would exhaust the stack.
pub const MAX_DEPTH: usize = 256;

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its attributes and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified name, e.g. `dc:title`.
    pub name: String,
    /// Attributes in document order, qualified names, unescaped values.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let attributes = start
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let raw = String::from_utf8_lossy(&attr.value);
                let value = match quick_xml::escape::unescape(&raw) {
                    Ok(value) => value.into_owned(),
                    Err(_) => raw.into_owned(),
                };
                (key, value)
            })
            .collect();

        Self {
            name,
            attributes,
            children: Vec::new(),
        }
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Namespace prefix, if the name has one.
    pub fn prefix(&self) -> Option<&str> {
        self.name.rsplit_once(':').map(|(prefix, _)| prefix)
    }

    /// Attribute value by exact qualified name, falling back to a match on
    /// the local name (`event` finds `opf:event`).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(key, _)| local_name(key) == name)
            })
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value, or `""` when absent.
    pub fn attr_or_empty(&self, name: &str) -> &str {
        self.attr(name).unwrap_or_default()
    }

    /// Direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Direct child elements with the given local name.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements().filter(move |e| e.local_name() == local)
    }

    /// First direct child element with the given local name.
    pub fn first_child(&self, local: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.local_name() == local)
    }

    /// All descendant elements with the given local name, in document order.
    pub fn descendants<'a>(&'a self, local: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        collect_descendants(self, local, &mut found);
        found
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(existing)) = self.children.last_mut() {
            existing.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }
}

fn collect_descendants<'a>(element: &'a Element, local: &str, found: &mut Vec<&'a Element>) {
    for child in element.child_elements() {
        if child.local_name() == local {
            found.push(child);
        }
        collect_descendants(child, local, found);
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => collect_text(child, out),
        }
    }
}

/// Parse a document and return its root element.
pub fn parse_document(content: &str) -> Result<Element> {
    let mut reader = Reader::from_str(content);

    // Bottom of the stack is a synthetic document node.
    let mut stack: Vec<Element> = vec![Element::default()];

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                check_depth(stack.len())?;
                stack.push(Element::from_start(&e));
            }
            Event::Empty(e) => {
                check_depth(stack.len())?;
                let element = Element::from_start(&e);
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Element(element));
                }
            }
            Event::End(_) => {
                if stack.len() > 1
                    && let Some(element) = stack.pop()
                    && let Some(parent) = stack.last_mut()
                {
                    parent.children.push(Node::Element(element));
                }
            }
            Event::Text(e) => {
                if stack.len() > 1
                    && let Some(current) = stack.last_mut()
                {
                    current.push_text(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::CData(e) => {
                if stack.len() > 1
                    && let Some(current) = stack.last_mut()
                {
                    current.push_text(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Some(resolved) = resolve_entity(&entity)
                    && stack.len() > 1
                    && let Some(current) = stack.last_mut()
                {
                    current.push_text(&resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(Error::Format("Unclosed element at end of document".into()));
    }

    stack
        .pop()
        .and_then(|document| {
            document.children.into_iter().find_map(|node| match node {
                Node::Element(element) => Some(element),
                Node::Text(_) => None,
            })
        })
        .ok_or_else(|| Error::Format("Document has no root element".into()))
}

/// `open` counts the synthetic document node, so it is the depth a new
/// element would sit at.
fn check_depth(open: usize) -> Result<()> {
    if open > MAX_DEPTH {
        return Err(Error::Format(format!("Elements nested deeper than {MAX_DEPTH} levels")));
    }
    Ok(())
}

/// Extract local name from a namespaced XML name (e.g., "dc:title" -> "title").
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<Cow<'static, str>> {
    match entity {
        "apos" => return Some(Cow::Borrowed("'")),
        "quot" => return Some(Cow::Borrowed("\"")),
        "lt" => return Some(Cow::Borrowed("<")),
        "gt" => return Some(Cow::Borrowed(">")),
        "amp" => return Some(Cow::Borrowed("&")),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };

    char::from_u32(code).map(|c| Cow::Owned(c.to_string()))
}

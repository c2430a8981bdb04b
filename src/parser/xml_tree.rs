//! Owned XML element tree built with quick-xml.
//!
//! Office parts are small enough to materialize, and tree adapters need
//! random access to children and ancestors that a pull parser cannot give.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

/// Deepest element nesting accepted by [`parse`].
pub const MAX_DEPTH: usize = 1024;

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Preorder index within the document, unique per parse
    pub id: usize,
    /// Qualified name as written, e.g. `w:t`
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map(|(_, local)| local)
            .unwrap_or(&self.name)
    }

    /// Attribute value by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements in order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Child elements with the given qualified name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    /// First child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// First child element with the given local name, any prefix.
    pub fn child_local(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.local_name() == local)
    }

    /// All descendants with the given local name, depth-first.
    pub fn find_all_local<'a>(&'a self, local: &str, out: &mut Vec<&'a XmlElement>) {
        for child in self.elements() {
            if child.local_name() == local {
                out.push(child);
            }
            child.find_all_local(local, out);
        }
    }

    /// All descendants with the given name, depth-first.
    pub fn find_all<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlElement>) {
        for child in self.elements() {
            if child.name == name {
                out.push(child);
            }
            child.find_all(name, out);
        }
    }

    /// All descendant text, concatenated in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }
}

/// Parse a document into its root element.
///
/// `format` labels extraction errors (e.g. "DOCX"). Documents nested deeper
/// than [`MAX_DEPTH`] are rejected.
pub fn parse(xml: &str, format: &'static str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut next_id = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(Error::extraction(
                        format,
                        format!("nesting too deep (more than {} levels)", MAX_DEPTH),
                    ));
                }
                stack.push(open_element(&e, &mut next_id, format)?)
            }
            Ok(Event::Empty(e)) => {
                let el = open_element(&e, &mut next_id, format)?;
                attach(&mut stack, &mut root, el);
            }
            Ok(Event::End(_)) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| Error::extraction(format, "unbalanced end tag"))?;
                attach(&mut stack, &mut root, el);
            }
            Ok(Event::Text(t)) => {
                if let Some(parent) = stack.last_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::extraction(format, e.to_string()))?;
                    push_text(parent, text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(parent) = stack.last_mut() {
                    let bytes = c.into_inner();
                    push_text(parent, String::from_utf8_lossy(&bytes));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::extraction(
                    format,
                    format!("XML error at position {}: {}", reader.buffer_position(), e),
                ))
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::extraction(format, "unclosed element at end of input"));
    }
    root.ok_or_else(|| Error::extraction(format, "document has no root element"))
}

fn open_element(e: &BytesStart<'_>, next_id: &mut usize, format: &'static str) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::extraction(format, err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::extraction(format, err.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }
    let id = *next_id;
    *next_id += 1;
    Ok(XmlElement {
        id,
        name,
        attrs,
        children: Vec::new(),
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, el: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(el)),
        None => {
            if root.is_none() {
                *root = Some(el);
            }
        }
    }
}

fn push_text(parent: &mut XmlElement, text: Cow<'_, str>) {
    if text.is_empty() {
        return;
    }
    if let Some(XmlNode::Text(prev)) = parent.children.last_mut() {
        prev.push_str(&text);
    } else {
        parent.children.push(XmlNode::Text(text.into_owned()));
    }
}

//! Navigable XML document tree
//!
//! Response payloads are parsed strictly: mismatched or unclosed tags, a missing
//! or repeated root element and text outside the root are all errors.
//! Whitespace-only text nodes are dropped; any other text is kept verbatim.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, instrument};

use crate::error::{EndecaError, Result};

/// Node inside an element
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// Element with its attributes and child nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    nodes: Vec<XmlNode>,
}

/// Parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Parse a complete document
    ///
    /// # Errors
    ///
    /// * `EndecaError::XmlParseError` - If the payload is not UTF-8 or not well-formed
    ///
    /// # Example
    ///
    /// ```
    /// use endeca_client_rs::XmlDocument;
    ///
    /// let document = XmlDocument::parse(b"<Records count=\"1\"><Record>a</Record></Records>").unwrap();
    /// assert_eq!(document.root().attribute("count"), Some("1"));
    /// assert_eq!(document.root().child("Record").unwrap().text(), "a");
    /// ```
    #[instrument(skip(bytes), fields(size = bytes.len()))]
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes).map_err(EndecaError::parse)?;

        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(XmlElement::from_start(e)?),
                Ok(Event::Empty(ref e)) => {
                    let element = XmlElement::from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(ref e)) => {
                    let element = stack.pop().ok_or_else(|| {
                        EndecaError::parse(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(e.name().as_ref())
                        ))
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(EndecaError::parse)?;
                    push_text(&mut stack, &text)?;
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    push_text(&mut stack, &text)?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(EndecaError::parse(format!(
                        "{} at position {}",
                        e,
                        reader.buffer_position()
                    )));
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(EndecaError::parse(format!("unclosed element <{}>", open.name)));
        }
        let root = root.ok_or_else(|| EndecaError::parse("document has no root element"))?;

        debug!(root = %root.name, "Parsed XML document");
        Ok(Self { root })
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn into_root(self) -> XmlElement {
        self.root
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.nodes.push(XmlNode::Element(element)),
        None if root.is_some() => {
            return Err(EndecaError::parse(format!(
                "second root element <{}>",
                element.name
            )));
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(parent) => {
            parent.nodes.push(XmlNode::Text(text.to_string()));
            Ok(())
        }
        None => Err(EndecaError::parse("text outside the root element")),
    }
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(EndecaError::parse)?;
            let value = attribute.unescape_value().map_err(EndecaError::parse)?;
            attributes.push((
                String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
                value.into_owned(),
            ));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            nodes: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn nodes(&self) -> &[XmlNode] {
        &self.nodes
    }

    /// Child elements, skipping text nodes
    pub fn children(&self) -> impl Iterator<Item = &XmlElement> {
        self.nodes.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children().filter(move |child| child.name == name)
    }

    /// Follow a path of child names from this element
    pub fn find(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter()
            .try_fold(self, |element, name| element.child(name))
    }

    /// Direct text content, concatenated
    pub fn text(&self) -> String {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(text) => Some(text.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// True when the element has no child elements
    pub fn is_leaf(&self) -> bool {
        self.children().next().is_none()
    }

    /// All descendants with the given name, depth first
    pub fn descendants_named(&self, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        for child in self.children() {
            if child.name == name {
                found.push(child);
            }
            child.collect_named(name, found);
        }
    }
}

// Owned XML element tree
//
// Both wire surfaces answer with XML whose namespace prefixes vary between
// vCenter builds (`soapenv:`, `qs:`, default namespaces). Element names are
// therefore stored by local name only; attribute keys keep their prefix so
// `type` and `xsi:type` stay distinct on managed object references.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::Error;

/// A parsed XML element with its attributes, child elements and text.
///
/// Text is the concatenation of every text and CDATA node directly inside
/// the element, trimmed of surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    /// Parse a complete document and return its root element.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::open(&start)?),
                Event::Empty(start) => {
                    let element = Self::open(&start)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| Error::Xml {
                        message: "unbalanced end tag".into(),
                    })?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::Xml {
                message: "unexpected end of document".into(),
            });
        }

        root.ok_or_else(|| Error::Xml {
            message: "document has no root element".into(),
        })
    }

    fn open(start: &BytesStart<'_>) -> Result<Self, Error> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Local element name (namespace prefix stripped).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attribute value by qualified key (e.g. `type` or `xsi:type`).
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn into_children(self) -> Vec<XmlElement> {
        self.children
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first direct child with the given name, if present.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(XmlElement::text)
    }

    /// First descendant with the given local name, depth-first.
    pub fn first_descendant(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find_map(|c| {
            if c.name == name {
                Some(c)
            } else {
                c.first_descendant(name)
            }
        })
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Escape a value for inclusion in XML text or attribute content.
pub fn escape(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_document_by_local_name() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
            <soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
              <soapenv:Body>
                <FindByInventoryPathResponse xmlns="urn:vim25">
                  <returnval type="Folder">group-v3</returnval>
                </FindByInventoryPathResponse>
              </soapenv:Body>
            </soapenv:Envelope>"#;

        let root = XmlElement::parse(doc).unwrap();
        assert_eq!(root.name(), "Envelope");

        let returnval = root.first_descendant("returnval").unwrap();
        assert_eq!(returnval.text(), "group-v3");
        assert_eq!(returnval.attr("type"), Some("Folder"));
    }

    #[test]
    fn keeps_prefixed_attributes_distinct() {
        let doc = r#"<val xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="ArrayOfManagedObjectReference"><ManagedObjectReference type="VirtualMachine" xsi:type="ManagedObjectReference">vm-12</ManagedObjectReference></val>"#;

        let root = XmlElement::parse(doc).unwrap();
        let moref = root.child("ManagedObjectReference").unwrap();
        assert_eq!(moref.attr("type"), Some("VirtualMachine"));
        assert_eq!(moref.attr("xsi:type"), Some("ManagedObjectReference"));
    }

    #[test]
    fn unescapes_entities_and_cdata() {
        let doc = "<a><b>R&amp;D &lt;lab&gt;</b><c><![CDATA[x < y]]></c></a>";
        let root = XmlElement::parse(doc).unwrap();
        assert_eq!(root.child_text("b"), Some("R&D <lab>"));
        assert_eq!(root.child_text("c"), Some("x < y"));
    }

    #[test]
    fn empty_elements_become_children() {
        let root = XmlElement::parse("<r><vm/><vm id='1'/></r>").unwrap();
        assert_eq!(root.children_named("vm").count(), 2);
        assert_eq!(root.children()[1].attr("id"), Some("1"));
    }

    #[test]
    fn rejects_truncated_document() {
        let result = XmlElement::parse("<r><unclosed>");
        assert!(matches!(result, Err(Error::Xml { .. })), "got {result:?}");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(XmlElement::parse("").is_err());
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape("a<b&c"), "a&lt;b&amp;c");
    }
}

//! Owned XML tree for the service's `<Raven>` response envelope.
//!
//! Responses are small (a profile's domains, keywords, or links), so the
//! whole document is materialized into navigable elements rather than
//! streamed.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::response::Format;

/// A parsed XML response document.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// The document's root element; `<Raven>` for service responses.
    pub fn root(&self) -> &XmlElement {
        &self.root
    }
}

/// One element of a parsed document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// The element's tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Character data directly inside this element, with surrounding
    /// whitespace trimmed. Empty for purely structural elements.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// All child elements, in document order.
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// The first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// Parse an XML body into an owned element tree.
///
/// Structural problems (mismatched tags, no root, trailing elements,
/// unresolved entities) surface as [`Error::MalformedResponse`].
pub fn parse(input: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                place(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed("closing tag without a matching opening tag"))?;
                place(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                if let Some(open) = stack.last_mut() {
                    let chunk = text.decode().map_err(malformed)?;
                    open.text.push_str(&chunk);
                }
            }
            Event::CData(data) => {
                if let Some(open) = stack.last_mut() {
                    let raw = data.into_inner();
                    open.text.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::GeneralRef(entity) => {
                if let Some(open) = stack.last_mut() {
                    let name = String::from_utf8_lossy(&entity).into_owned();
                    let resolved = resolve_entity(&name)
                        .ok_or_else(|| malformed(format!("unresolved entity `&{name};`")))?;
                    open.text.push(resolved);
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and
            // doctypes carry nothing the tree needs.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(malformed("document ended with unclosed elements"));
    }
    match root {
        Some(root) => Ok(XmlDocument { root }),
        None => Err(malformed("document has no root element")),
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(malformed)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(malformed)?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        ..XmlElement::default()
    })
}

/// Attach a finished element to its parent, or make it the root.
fn place(
    mut element: XmlElement,
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
) -> Result<()> {
    let trimmed = element.text.trim();
    if trimmed.len() != element.text.len() {
        element.text = trimmed.to_string();
    }
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(malformed("content after the root element")),
    }
    Ok(())
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn malformed(message: impl std::fmt::Display) -> Error {
    Error::MalformedResponse {
        format: Format::Xml,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAINS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Raven>
  <domains>
    <domain>www.centresource.com</domain>
    <domain>www.example.com</domain>
  </domains>
</Raven>"#;

    #[test]
    fn parses_the_raven_envelope() {
        let doc = parse(DOMAINS).unwrap();
        assert_eq!(doc.root().name(), "Raven");

        let domains = doc.root().child("domains").unwrap();
        assert_eq!(domains.children().len(), 2);
        assert_eq!(domains.children()[0].text(), "www.centresource.com");
        assert_eq!(domains.children_named("domain").count(), 2);
        assert!(domains.children_named("engine").next().is_none());
    }

    #[test]
    fn structural_whitespace_is_dropped() {
        let doc = parse(DOMAINS).unwrap();
        assert_eq!(doc.root().text(), "");
        assert_eq!(doc.root().child("domains").unwrap().text(), "");
    }

    #[test]
    fn entities_resolve_in_text_and_attributes() {
        let doc = parse(
            r#"<Raven><link url="/a?b=1&amp;c=2">AT&amp;T &#38; &#x43;o</link></Raven>"#,
        )
        .unwrap();
        let link = doc.root().child("link").unwrap();
        assert_eq!(link.attribute("url"), Some("/a?b=1&c=2"));
        assert_eq!(link.attribute("missing"), None);
        assert_eq!(link.text(), "AT&T & Co");
    }

    #[test]
    fn named_and_numeric_references_cover_the_predefined_set() {
        let doc = parse("<Raven><q>&lt;b&gt; &quot;&apos; &#65;&#x41;&#x61;</q></Raven>").unwrap();
        assert_eq!(doc.root().child("q").unwrap().text(), "<b> \"' AAa");
    }

    #[test]
    fn unknown_entities_are_malformed() {
        let err = parse("<Raven><q>&nbsp;</q></Raven>").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { format: Format::Xml, .. }));
    }

    #[test]
    fn cdata_is_taken_verbatim() {
        let doc = parse("<Raven><note><![CDATA[a < b & c]]></note></Raven>").unwrap();
        assert_eq!(doc.root().child("note").unwrap().text(), "a < b & c");
    }

    #[test]
    fn empty_elements_are_navigable() {
        let doc = parse("<Raven><metrics/></Raven>").unwrap();
        let metrics = doc.root().child("metrics").unwrap();
        assert_eq!(metrics.name(), "metrics");
        assert!(metrics.children().is_empty());
        assert_eq!(metrics.text(), "");
    }

    #[test]
    fn mismatched_tags_are_malformed() {
        let err = parse("<Raven><a></b></Raven>").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { format: Format::Xml, .. }));
    }

    #[test]
    fn unclosed_documents_are_malformed() {
        let err = parse("<Raven><domains>").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { format: Format::Xml, .. }));
    }

    #[test]
    fn rootless_input_is_malformed() {
        let err = parse("this is not xml").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { format: Format::Xml, .. }));
    }
}

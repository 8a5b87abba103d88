//! XML response decoding.
//!
//! Shopforge's XML responses carry no fixed schema, so bodies are parsed
//! into an owned [`XmlElement`] tree instead of going through serde.
//! CDATA sections are merged into the surrounding element text, and
//! entity/character references are resolved in place.

use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::{Decoder, Reader};

use crate::error::ApiError;

/// One element of a decoded XML response.
///
/// ## Examples
///
/// ```rust
/// use shopforge_api::ResponseFormat;
///
/// let body = "<manufacturer id=\"1\"><name><![CDATA[Acme]]></name></manufacturer>";
/// let value = ResponseFormat::Xml.decode(body).unwrap();
///
/// let root = value.as_xml().unwrap();
/// assert_eq!(root.name, "manufacturer");
/// assert_eq!(root.attr("id"), Some("1"));
/// assert_eq!(root.child("name").unwrap().text(), "Acme");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    /// Tag name as written, including any namespace prefix.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Character data directly inside this element. CDATA sections are
    /// appended here, not kept as separate nodes.
    text: String,
}

impl XmlElement {
    /// Character data inside this element, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// First child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given tag name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Parses a complete XML document into its root element.
///
/// The reader validates tag nesting itself; this loop additionally rejects
/// documents with no root element, more than one root element, or
/// character data outside the root.
pub(crate) fn parse(body: &str) -> Result<XmlElement, ApiError> {
    let mut reader = Reader::from_str(body);
    let decoder = reader.decoder();

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(element_from_start(&start, decoder)?),
            Event::Empty(start) => {
                let element = element_from_start(&start, decoder)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => match stack.pop() {
                Some(element) => attach(&mut stack, &mut root, element)?,
                None => return Err(ApiError::XmlParse("unmatched closing tag".into())),
            },
            Event::Text(text) => {
                let content = text.decode().map_err(xml_error)?;
                match stack.last_mut() {
                    Some(parent) => parent.text.push_str(&content),
                    None if content.trim().is_empty() => {}
                    None => {
                        return Err(ApiError::XmlParse(
                            "character data outside the root element".into(),
                        ))
                    }
                }
            }
            Event::CData(cdata) => {
                let content = cdata.decode().map_err(xml_error)?;
                match stack.last_mut() {
                    Some(parent) => parent.text.push_str(&content),
                    None => {
                        return Err(ApiError::XmlParse(
                            "CDATA section outside the root element".into(),
                        ))
                    }
                }
            }
            Event::GeneralRef(reference) => {
                let resolved = resolve_reference(&reference)?;
                match stack.last_mut() {
                    Some(parent) => parent.text.push(resolved),
                    None => {
                        return Err(ApiError::XmlParse(
                            "reference outside the root element".into(),
                        ))
                    }
                }
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if !stack.is_empty() {
        return Err(ApiError::XmlParse("unexpected end of document".into()));
    }
    root.ok_or_else(|| ApiError::XmlParse("document has no root element".into()))
}

fn element_from_start(start: &BytesStart, decoder: Decoder) -> Result<XmlElement, ApiError> {
    let name = decoder
        .decode(start.name().as_ref())
        .map_err(xml_error)?
        .into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = decoder.decode(attr.key.as_ref()).map_err(xml_error)?.into_owned();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(xml_error)?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

/// Hands a completed element to its parent, or makes it the document root.
fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), ApiError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ApiError::XmlParse(
            "document has more than one root element".into(),
        ));
    }
    *root = Some(element);
    Ok(())
}

/// Resolves a character reference (`&#xA9;`) or one of the five predefined
/// entities. Anything else is an unknown entity.
fn resolve_reference(reference: &BytesRef) -> Result<char, ApiError> {
    if let Some(ch) = reference.resolve_char_ref().map_err(xml_error)? {
        return Ok(ch);
    }
    let name = reference.decode().map_err(xml_error)?;
    match name.as_ref() {
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "amp" => Ok('&'),
        "apos" => Ok('\''),
        "quot" => Ok('"'),
        other => Err(ApiError::XmlParse(format!(
            "unknown entity reference: &{other};"
        ))),
    }
}

fn xml_error(error: impl std::fmt::Display) -> ApiError {
    ApiError::XmlParse(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_document() {
        let root = parse("<manufacturers><count>2</count></manufacturers>").unwrap();
        assert_eq!(root.name, "manufacturers");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.child("count").unwrap().text(), "2");
    }

    #[test]
    fn test_parse_attributes() {
        let root = parse(r#"<manufacturer id="1" active="true"/>"#).unwrap();
        assert_eq!(root.attr("id"), Some("1"));
        assert_eq!(root.attr("active"), Some("true"));
        assert_eq!(root.attr("missing"), None);
    }

    #[test]
    fn test_cdata_merges_into_text() {
        let root = parse("<name>Acme <![CDATA[& Co]]> Ltd</name>").unwrap();
        assert_eq!(root.text(), "Acme & Co Ltd");
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_references_resolve_into_text() {
        let root = parse("<name>Tom &amp; Jerry &#x2122; &quot;inc&quot;</name>").unwrap();
        assert_eq!(root.text(), "Tom & Jerry \u{2122} \"inc\"");
    }

    #[test]
    fn test_repeated_children() {
        let root = parse(
            "<manufacturers>\
               <manufacturer><name>Acme</name></manufacturer>\
               <manufacturer><name>Globex</name></manufacturer>\
             </manufacturers>",
        )
        .unwrap();
        let names: Vec<_> = root
            .children_named("manufacturer")
            .filter_map(|m| m.child("name"))
            .map(|n| n.text().to_string())
            .collect();
        assert_eq!(names, ["Acme", "Globex"]);
    }

    #[test]
    fn test_declaration_and_comments_are_skipped() {
        let root = parse("<?xml version=\"1.0\"?><!-- header --><ok/>").unwrap();
        assert_eq!(root.name, "ok");
    }

    #[test]
    fn test_mismatched_tags_fail() {
        assert!(matches!(
            parse("<a><b></a></b>"),
            Err(ApiError::XmlParse(_))
        ));
    }

    #[test]
    fn test_unclosed_root_fails() {
        assert!(matches!(parse("<a><b/>"), Err(ApiError::XmlParse(_))));
    }

    #[test]
    fn test_plain_text_body_fails() {
        assert!(matches!(
            parse("definitely not xml"),
            Err(ApiError::XmlParse(_))
        ));
    }

    #[test]
    fn test_multiple_roots_fail() {
        assert!(matches!(parse("<a/><b/>"), Err(ApiError::XmlParse(_))));
    }

    #[test]
    fn test_unknown_entity_fails() {
        match parse("<a>&nbsp;</a>") {
            Err(ApiError::XmlParse(message)) => assert!(message.contains("nbsp")),
            other => panic!("expected XmlParse, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_document_fails() {
        assert!(matches!(parse(""), Err(ApiError::XmlParse(_))));
        assert!(matches!(parse("   "), Err(ApiError::XmlParse(_))));
    }
}

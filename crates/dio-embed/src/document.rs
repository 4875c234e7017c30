//! Diagram document model: an ordered XML tree with a deterministic serializer.
//!
//! Diagram files are untrusted input. `quick-xml` resolves no external
//! entities and performs no network access, so a hostile file cannot
//! trigger entity expansion or remote fetches during parsing.

use std::fmt::Write;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::DocumentError;

/// A single element of a parsed diagram document.
///
/// Attributes keep document order so a parse/serialize round trip is
/// deterministic. `tail` is the text between this element's end tag and
/// the next sibling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Element tag name.
    pub tag: String,
    /// Attributes in document order.
    pub attrs: Vec<(String, String)>,
    /// Text content before the first child.
    pub text: String,
    /// Text following this element's end tag.
    pub tail: String,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Look up an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Parse a diagram file into its root element.
///
/// Leading XML declarations, comments and processing instructions are
/// skipped; the first element found becomes the root.
pub fn parse_document(input: &str) -> Result<XmlElement, DocumentError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let tag = decode_tag(&reader, &e);
                let attrs = decode_attrs(&reader, &e);
                let mut root = parse_children(&mut reader, &tag)?;
                root.tag = tag;
                root.attrs = attrs;
                return Ok(root);
            }
            Event::Empty(e) => {
                return Ok(XmlElement {
                    tag: decode_tag(&reader, &e),
                    attrs: decode_attrs(&reader, &e),
                    ..XmlElement::default()
                });
            }
            Event::Eof => return Err(DocumentError::NoRoot),
            // Prolog content before the root element
            Event::Text(_)
            | Event::GeneralRef(_)
            | Event::CData(_)
            | Event::End(_)
            | Event::Comment(_)
            | Event::Decl(_)
            | Event::PI(_)
            | Event::DocType(_) => {}
        }
        buf.clear();
    }
}

/// Serialize an element tree back to a compact XML string.
///
/// The output is deterministic: attributes keep their parsed order and
/// childless, textless elements self-close.
#[must_use]
pub fn serialize_element(element: &XmlElement) -> String {
    let mut out = String::with_capacity(1024);
    serialize_into(element, &mut out);
    out
}

fn serialize_into(element: &XmlElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);

    for (key, value) in &element.attrs {
        write!(out, r#" {}="{}""#, key, escape_attr(value)).unwrap();
    }

    if element.children.is_empty() && element.text.is_empty() {
        out.push_str(" />");
    } else {
        out.push('>');

        if !element.text.is_empty() {
            out.push_str(&escape_text(&element.text));
        }

        for child in &element.children {
            serialize_into(child, out);
        }

        write!(out, "</{}>", element.tag).unwrap();
    }

    if !element.tail.is_empty() {
        out.push_str(&escape_text(&element.tail));
    }
}

fn parse_children(
    reader: &mut Reader<&[u8]>,
    parent_tag: &str,
) -> Result<XmlElement, DocumentError> {
    let mut buf = Vec::new();
    let mut node = XmlElement::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let child_tag = decode_tag(reader, &e);
                let child_attrs = decode_attrs(reader, &e);
                let mut child = parse_children(reader, &child_tag)?;
                child.tag = child_tag;
                child.attrs = child_attrs;
                node.children.push(child);
            }
            Event::Empty(e) => {
                node.children.push(XmlElement {
                    tag: decode_tag(reader, &e),
                    attrs: decode_attrs(reader, &e),
                    ..XmlElement::default()
                });
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?.into_owned();
                append_text(&mut node, &text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?.into_owned();
                append_text(&mut node, &decode_entity(&entity));
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                append_text(&mut node, &text);
            }
            Event::End(e) => {
                if decode_name(reader, e.name().as_ref()) == parent_tag {
                    return Ok(node);
                }
                // Mismatched end tag - continue
            }
            Event::Eof => return Ok(node),
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }
}

fn decode_tag(reader: &Reader<&[u8]>, e: &BytesStart) -> String {
    decode_name(reader, e.name().as_ref())
}

fn decode_name(reader: &Reader<&[u8]>, name: &[u8]) -> String {
    reader.decoder().decode(name).map_or_else(
        |_| String::from_utf8_lossy(name).into_owned(),
        std::borrow::Cow::into_owned,
    )
}

fn decode_attrs(reader: &Reader<&[u8]>, e: &BytesStart) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = decode_name(reader, attr.key.as_ref());
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        attrs.push((key, value));
    }
    attrs
}

/// Append text to the node's own text or the last child's tail.
fn append_text(node: &mut XmlElement, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        // Numeric character references
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        // Unknown entity - preserve as-is
        _ => format!("&{entity};"),
    }
}

fn escape_text(text: &str) -> String {
    escape_xml(text, false)
}

fn escape_attr(text: &str) -> String {
    escape_xml(text, true)
}

fn escape_xml(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            '\'' if escape_quotes => result.push_str("&apos;"),
            _ => result.push(ch),
        }
    }
    result
}

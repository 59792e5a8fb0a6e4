//! XML document reader.
//!
//! Builds an [`XmlElement`] tree from text. Namespace prefixes are resolved
//! by quick-xml's namespace-aware reader, and predefined and character
//! entity references are expanded.

use crate::element::XmlElement;
use crate::error::XmlError;
use quick_xml::NsReader;
use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::name::ResolveResult;

/// Parses an XML document into an element tree.
///
/// # Arguments
/// * `xml` - Document text
///
/// # Returns
/// The root element.
///
/// # Errors
/// Returns `XmlError` if the document is not well formed, has no or several
/// root elements, or uses an unknown or illegal entity.
pub fn read_document(xml: &str) -> Result<XmlElement, XmlError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
        let namespace = namespace_of(resolved);
        match event {
            Event::Start(ref e) => {
                let element = open_element(e, namespace, reader.decoder())?;
                stack.push(element);
            }
            Event::Empty(ref e) => {
                let element = open_element(e, namespace, reader.decoder())?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::malformed("closing tag without opening tag"))?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::Text(ref e) => {
                if let Some(top) = stack.last_mut() {
                    let text = e.decode().map_err(quick_xml::Error::from)?;
                    top.text.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if let Some(top) = stack.last_mut() {
                    let text = e.decode().map_err(quick_xml::Error::from)?;
                    top.text.push_str(&text);
                }
            }
            Event::GeneralRef(ref e) => {
                if let Some(top) = stack.last_mut() {
                    push_reference(&mut top.text, e)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::malformed(format!(
            "element '{}' is never closed",
            open.name
        )));
    }
    root.ok_or_else(|| XmlError::malformed("no root element"))
}

fn namespace_of(resolved: ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(ns) if !ns.0.is_empty() => {
            Some(String::from_utf8_lossy(ns.0).into_owned())
        }
        ResolveResult::Unknown(prefix) => {
            tracing::debug!(
                "Namespace prefix {:?} is not declared",
                String::from_utf8_lossy(&prefix)
            );
            None
        }
        _ => None,
    }
}

/// Reads the name and attributes of a start tag. Namespace declarations are
/// consumed by the reader and not kept as attributes.
fn open_element(
    e: &BytesStart<'_>,
    namespace: Option<String>,
    decoder: Decoder,
) -> Result<XmlElement, XmlError> {
    let local = std::str::from_utf8(e.local_name().into_inner())?;
    let mut element = XmlElement::new(local);
    element.namespace = namespace;

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = std::str::from_utf8(attr.key.local_name().into_inner())?.to_string();
        let value = attr.decode_and_unescape_value(decoder)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Expands a character or predefined entity reference into `text`.
fn push_reference(text: &mut String, reference: &BytesRef<'_>) -> Result<(), XmlError> {
    if let Some(ch) = reference.resolve_char_ref()? {
        text.push(ch);
        return Ok(());
    }
    let name = reference.decode().map_err(quick_xml::Error::from)?;
    let expansion = resolve_predefined_entity(&name).ok_or_else(|| XmlError::UnknownEntity {
        name: name.to_string(),
    })?;
    text.push_str(expansion);
    Ok(())
}

fn close_element(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::malformed(format!(
            "second root element '{}'",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_nested_document() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<ImageFormation xmlns="urn:SICD:1.2.1">
    <TxRcvPolarizationProc>V:V</TxRcvPolarizationProc>
    <TxFrequencyProc>
        <MinProc>1.0</MinProc>
        <MaxProc>2.0</MaxProc>
    </TxFrequencyProc>
    <Empty/>
</ImageFormation>"#;
        let root = read_document(xml).expect("Failed to read document");
        assert_eq!(root.name, "ImageFormation");
        assert_eq!(root.namespace.as_deref(), Some("urn:SICD:1.2.1"));
        assert!(root.attributes.is_empty());
        assert_eq!(root.children.len(), 3);

        let freq = root
            .child("TxFrequencyProc", Some("urn:SICD:1.2.1"))
            .expect("Failed to find child");
        let min = freq.child("MinProc", None).expect("Failed to find child");
        assert_eq!(min.trimmed_text(), "1.0");
        assert_eq!(min.namespace.as_deref(), Some("urn:SICD:1.2.1"));
    }

    #[test]
    fn test_prefixed_namespace() {
        let xml = r#"<s:Root xmlns:s="urn:x" other="1"><s:A>1</s:A><B>2</B></s:Root>"#;
        let root = read_document(xml).expect("Failed to read document");
        assert_eq!(root.name, "Root");
        assert_eq!(root.namespace.as_deref(), Some("urn:x"));
        assert_eq!(root.attribute("other"), Some("1"));
        assert_eq!(root.children[0].namespace.as_deref(), Some("urn:x"));
        assert_eq!(root.children[1].namespace, None);
    }

    #[test]
    fn test_entities() {
        let xml = r#"<P name="a&amp;b">x &lt; y &#65;&#x42;</P>"#;
        let root = read_document(xml).expect("Failed to read document");
        assert_eq!(root.attribute("name"), Some("a&b"));
        assert_eq!(root.text, "x < y AB");
    }

    #[test]
    fn test_illegal_character_reference() {
        assert!(read_document("<P>&#0;</P>").is_err());
        assert!(read_document("<P>&#xD800;</P>").is_err());
        assert!(read_document(r#"<P name="&#0;"/>"#).is_err());
    }

    #[test]
    fn test_nested_namespace_scopes() {
        let xml = r#"<Root xmlns="urn:a"><Inner xmlns="urn:b"><Leaf/></Inner><Leaf/></Root>"#;
        let root = read_document(xml).expect("Failed to read document");
        let inner = &root.children[0];
        assert_eq!(inner.namespace.as_deref(), Some("urn:b"));
        assert_eq!(inner.children[0].namespace.as_deref(), Some("urn:b"));
        assert_eq!(root.children[1].namespace.as_deref(), Some("urn:a"));
        assert!(root.attributes.is_empty());
    }

    #[test]
    fn test_unknown_entity() {
        let result = read_document("<P>&bogus;</P>");
        assert!(matches!(result, Err(XmlError::UnknownEntity { .. })));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(read_document("").is_err());
        assert!(read_document("<A><B></A>").is_err());
        assert!(matches!(
            read_document("<A/><B/>"),
            Err(XmlError::Malformed { .. })
        ));
        assert!(read_document("<A>").is_err());
    }
}

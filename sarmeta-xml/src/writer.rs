//! XML document writer.

use crate::element::XmlElement;
use crate::error::XmlError;
use crate::options::XmlOptions;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

/// Writes an element tree as XML text.
///
/// Elements without text or children are written as empty tags. Attribute
/// values and text are escaped.
///
/// # Arguments
/// * `root` - Root element
/// * `options` - Indentation and declaration settings
///
/// # Errors
/// Returns `XmlError` if the writer fails.
pub fn write_document(root: &XmlElement, options: &XmlOptions) -> Result<String, XmlError> {
    let mut writer = match options.indent {
        Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
        None => Writer::new(Vec::new()),
    };
    if options.declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }
    write_element(&mut writer, root)?;
    let bytes = writer.into_inner();
    String::from_utf8(bytes).map_err(|e| XmlError::Utf8(e.utf8_error()))
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if !element.text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(&element.text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_document;

    fn sample() -> XmlElement {
        let mut root = XmlElement::new("Processing");
        root.set_attribute("xmlns", "urn:test");
        root.push_child(XmlElement::with_text("Type", "a < b & c"));
        let param = root.push_child(XmlElement::with_text("Parameter", "1"));
        param.set_attribute("name", "\"quoted\"");
        root.push_child(XmlElement::new("Empty"));
        root
    }

    #[test]
    fn test_write_compact() {
        let xml = write_document(&sample(), &XmlOptions::new()).expect("Failed to write");
        assert_eq!(
            xml,
            "<Processing xmlns=\"urn:test\"><Type>a &lt; b &amp; c</Type>\
             <Parameter name=\"&quot;quoted&quot;\">1</Parameter><Empty/></Processing>"
        );
    }

    #[test]
    fn test_write_declaration_and_indent() {
        let options = XmlOptions::new().declaration(true).indent(2);
        let xml = write_document(&sample(), &options).expect("Failed to write");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("\n  <Type>"));
    }

    #[test]
    fn test_write_then_read() {
        let options = XmlOptions::new().indent(4);
        let xml = write_document(&sample(), &options).expect("Failed to write");
        let back = read_document(&xml).expect("Failed to read");
        assert_eq!(back.name, "Processing");
        assert_eq!(back.namespace.as_deref(), Some("urn:test"));
        let kind = back.child("Type", None).expect("Failed to find child");
        assert_eq!(kind.trimmed_text(), "a < b & c");
        let param = back.child("Parameter", None).expect("Failed to find child");
        assert_eq!(param.attribute("name"), Some("\"quoted\""));
    }
}

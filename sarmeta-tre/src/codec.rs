//! Fixed-width record encoding and decoding.
//!
//! Records are the concatenation of their fields in layout order:
//! - text fields are left-justified and padded with spaces
//! - unsigned integers are right-justified and padded with zeros
//! - signed integers are right-justified and padded with spaces
//!
//! Absent fields are written as spaces and read back as absent.

use crate::error::TreError;
use crate::options::{TreOptions, TruncationPolicy};
use bytes::Bytes;
use sarmeta_core::{FixedWidthReader, FixedWidthWriter, Justify, RawValue};
use sarmeta_schema::{BinaryField, BinaryLayout, FieldEncoding, Node};

/// A string that was cut to fit its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    /// Field name.
    pub field: String,
    /// Original length in bytes.
    pub length: usize,
    /// Field width in bytes.
    pub width: usize,
}

/// Output of [`encode_record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    /// Record bytes, exactly the layout length.
    pub bytes: Bytes,
    /// Strings cut to fit their fields.
    pub truncations: Vec<Truncation>,
}

/// Encodes a node into a fixed-width record.
///
/// # Arguments
/// * `node` - Record to encode
/// * `layout` - Wire layout
/// * `options` - Truncation handling
///
/// # Errors
/// Returns `TreError::FieldOverflow` if an integer does not fit its width or
/// is negative in an unsigned field, and `TreError::StringTooLong` if a
/// string is too long and truncation is rejected.
pub fn encode_record(
    node: &Node,
    layout: &BinaryLayout,
    options: &TreOptions,
) -> Result<EncodedRecord, TreError> {
    let mut writer = FixedWidthWriter::with_capacity(layout.length());
    let mut truncations = Vec::new();

    for field in layout.fields() {
        match field.encoding {
            FieldEncoding::FixedString => {
                let Some(text) = node.str(&field.name) else {
                    writer.put_blank(field.width, b' ');
                    continue;
                };
                if text.len() > field.width {
                    if options.truncation == TruncationPolicy::Reject {
                        return Err(TreError::StringTooLong {
                            field: field.name.clone(),
                            length: text.len(),
                            width: field.width,
                        });
                    }
                    tracing::warn!(
                        "Truncating field {} of {} from {} to {} bytes",
                        field.name,
                        layout.tag(),
                        text.len(),
                        field.width
                    );
                    truncations.push(Truncation {
                        field: field.name.clone(),
                        length: text.len(),
                        width: field.width,
                    });
                }
                let kept = &text[..char_boundary(text, field.width)];
                writer.put_justified(kept.as_bytes(), field.width, Justify::Left, b' ');
            }
            FieldEncoding::UnsignedInteger | FieldEncoding::SignedInteger => {
                let Some(value) = node.int(&field.name) else {
                    writer.put_blank(field.width, b' ');
                    continue;
                };
                let (digits, pad) = integer_text(field, value)?;
                writer.put_justified(digits.as_bytes(), field.width, Justify::Right, pad);
            }
        }
    }

    Ok(EncodedRecord {
        bytes: writer.freeze(),
        truncations,
    })
}

/// Largest char boundary of `text` not beyond `width`.
fn char_boundary(text: &str, width: usize) -> usize {
    let mut end = width.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}

fn integer_text(field: &BinaryField, value: i64) -> Result<(String, u8), TreError> {
    let overflow = || TreError::FieldOverflow {
        field: field.name.clone(),
        value,
        width: field.width,
    };
    let (digits, pad) = match field.encoding {
        FieldEncoding::UnsignedInteger if value < 0 => return Err(overflow()),
        FieldEncoding::UnsignedInteger => (value.to_string(), b'0'),
        _ => (value.to_string(), b' '),
    };
    if digits.len() > field.width {
        return Err(overflow());
    }
    Ok((digits, pad))
}

/// Decodes a fixed-width record.
///
/// Bytes beyond the layout length are ignored. Blank integer fields are
/// left absent and strings lose their trailing padding.
///
/// # Arguments
/// * `bytes` - Record bytes
/// * `layout` - Wire layout
///
/// # Errors
/// Returns `TreError::TruncatedRecord` if `bytes` is shorter than the
/// layout, `TreError::InvalidUtf8` for undecodable text, or
/// `TreError::Node` if an integer field holds non-numeric text.
pub fn decode_record(bytes: &[u8], layout: &BinaryLayout) -> Result<Node, TreError> {
    if bytes.len() < layout.length() {
        return Err(TreError::truncated(layout.tag(), layout.length(), bytes.len()));
    }
    if bytes.len() > layout.length() {
        tracing::debug!(
            "Ignoring {} trailing bytes after {}",
            bytes.len() - layout.length(),
            layout.tag()
        );
    }

    let mut node = Node::new(layout.schema().clone());
    let mut reader = FixedWidthReader::new(bytes);

    for field in layout.fields() {
        let text = reader.take_str(field.width).map_err(|err| match err {
            sarmeta_core::Error::InvalidUtf8 { offset } => TreError::InvalidUtf8 {
                field: field.name.clone(),
                offset,
            },
            _ => TreError::truncated(layout.tag(), layout.length(), bytes.len()),
        })?;
        match field.encoding {
            FieldEncoding::FixedString => node.set(&field.name, text)?,
            FieldEncoding::UnsignedInteger | FieldEncoding::SignedInteger => {
                let digits = text.trim();
                if !digits.is_empty() {
                    node.set(&field.name, RawValue::Text(digits.to_string()))?;
                }
            }
        }
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sarmeta_schema::NodeError;
    use std::sync::Arc;

    fn layout() -> Arc<BinaryLayout> {
        BinaryLayout::builder("TEST01")
            .text("NAME", 6)
            .unsigned("COUNT", 4)
            .signed("DELTA", 5)
            .length(15)
            .build()
            .expect("Failed to build layout")
    }

    fn sample(layout: &BinaryLayout) -> Node {
        let mut node = Node::new(layout.schema().clone());
        node.set("NAME", "ABC").expect("Failed to set");
        node.set("COUNT", 42).expect("Failed to set");
        node.set("DELTA", -17).expect("Failed to set");
        node
    }

    #[test]
    fn test_encode_padding() {
        let layout = layout();
        let encoded =
            encode_record(&sample(&layout), &layout, &TreOptions::new()).expect("Failed to encode");
        assert_eq!(&encoded.bytes[..], b"ABC   0042  -17");
        assert!(encoded.truncations.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let layout = layout();
        let node = sample(&layout);
        let encoded = encode_record(&node, &layout, &TreOptions::new()).expect("Failed to encode");
        let decoded = decode_record(&encoded.bytes, &layout).expect("Failed to decode");
        assert_eq!(decoded, node);
        assert_eq!(decoded.int("DELTA"), Some(-17));
    }

    #[test]
    fn test_trailing_spaces_round_trip() {
        let layout = layout();
        let mut node = sample(&layout);
        node.set("NAME", " AB  ").expect("Failed to set");
        assert_eq!(node.str("NAME"), Some(" AB"));

        let encoded = encode_record(&node, &layout, &TreOptions::new()).expect("Failed to encode");
        assert_eq!(&encoded.bytes[..6], b" AB   ");
        let decoded = decode_record(&encoded.bytes, &layout).expect("Failed to decode");
        assert_eq!(decoded, node);

        node.set("NAME", "      ").expect("Failed to set");
        let encoded = encode_record(&node, &layout, &TreOptions::new()).expect("Failed to encode");
        let decoded = decode_record(&encoded.bytes, &layout).expect("Failed to decode");
        assert_eq!(decoded.str("NAME"), Some(""));
        assert_eq!(decoded, node);
    }

    #[test]
    fn test_absent_fields_blank() {
        let layout = layout();
        let mut node = Node::new(layout.schema().clone());
        node.set("NAME", "X").expect("Failed to set");
        let encoded = encode_record(&node, &layout, &TreOptions::new()).expect("Failed to encode");
        assert_eq!(&encoded.bytes[..], b"X              ");

        let decoded = decode_record(&encoded.bytes, &layout).expect("Failed to decode");
        assert_eq!(decoded.str("NAME"), Some("X"));
        assert!(!decoded.is_present("COUNT"));
        assert!(!decoded.is_present("DELTA"));
        assert!(!decoded.is_valid());
    }

    #[test]
    fn test_string_truncation_warns() {
        let layout = layout();
        let mut node = sample(&layout);
        node.set("NAME", "ABCDEFGH").expect("Failed to set");
        let encoded = encode_record(&node, &layout, &TreOptions::new()).expect("Failed to encode");
        assert_eq!(&encoded.bytes[..6], b"ABCDEF");
        assert_eq!(encoded.bytes.len(), 15);
        assert_eq!(
            encoded.truncations,
            vec![Truncation {
                field: "NAME".to_string(),
                length: 8,
                width: 6,
            }]
        );
    }

    #[test]
    fn test_string_truncation_rejected() {
        let layout = layout();
        let mut node = sample(&layout);
        node.set("NAME", "ABCDEFGH").expect("Failed to set");
        let options = TreOptions::new().truncation(TruncationPolicy::Reject);
        let result = encode_record(&node, &layout, &options);
        assert!(matches!(result, Err(TreError::StringTooLong { length: 8, .. })));
    }

    #[test]
    fn test_truncation_keeps_whole_chars() {
        let layout = BinaryLayout::builder("T")
            .text("S", 3)
            .build()
            .expect("Failed to build layout");
        let mut node = Node::new(layout.schema().clone());
        node.set("S", "aéé").expect("Failed to set");
        let encoded = encode_record(&node, &layout, &TreOptions::new()).expect("Failed to encode");
        assert_eq!(&encoded.bytes[..], "aé".as_bytes());
        let decoded = decode_record(&encoded.bytes, &layout).expect("Failed to decode");
        assert_eq!(decoded.str("S"), Some("aé"));
    }

    #[test]
    fn test_integer_overflow() {
        let layout = layout();
        let mut node = sample(&layout);
        node.set("COUNT", 12_345).expect("Failed to set");
        let result = encode_record(&node, &layout, &TreOptions::new());
        assert!(matches!(
            result,
            Err(TreError::FieldOverflow {
                value: 12_345,
                width: 4,
                ..
            })
        ));

        let mut node = sample(&layout);
        node.set("DELTA", -12_345).expect("Failed to set");
        assert!(encode_record(&node, &layout, &TreOptions::new()).is_err());
    }

    #[test]
    fn test_negative_unsigned() {
        let layout = layout();
        let mut node = sample(&layout);
        node.set("COUNT", -1).expect("Failed to set");
        let result = encode_record(&node, &layout, &TreOptions::new());
        assert!(matches!(result, Err(TreError::FieldOverflow { value: -1, .. })));
    }

    #[test]
    fn test_decode_truncated() {
        let layout = layout();
        let result = decode_record(b"ABC   0042", &layout);
        assert_eq!(result, Err(TreError::truncated("TEST01", 15, 10)));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let layout = layout();
        let decoded = decode_record(b"ABC   0042  -17EXTRA", &layout).expect("Failed to decode");
        assert_eq!(decoded.int("COUNT"), Some(42));
        assert_eq!(decoded.int("DELTA"), Some(-17));
    }

    #[test]
    fn test_decode_non_numeric() {
        let layout = layout();
        let result = decode_record(b"ABC   00X2  -17", &layout);
        assert!(matches!(
            result,
            Err(TreError::Node(NodeError::Coercion { ref field, .. })) if field == "COUNT"
        ));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let layout = layout();
        let mut bytes = b"ABC   0042  -17".to_vec();
        bytes[1] = 0xFF;
        let result = decode_record(&bytes, &layout);
        assert!(matches!(
            result,
            Err(TreError::InvalidUtf8 { ref field, offset: 1 }) if field == "NAME"
        ));
    }
}

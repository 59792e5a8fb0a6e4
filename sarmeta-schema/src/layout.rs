//! Fixed-width binary record layouts.
//!
//! A [`BinaryLayout`] lists the fields of a text-encoded extension record in
//! wire order with their widths. Each layout derives a [`RecordSchema`] so
//! decoded records are ordinary [`Node`](crate::Node)s.

use crate::descriptor::FieldDescriptor;
use crate::error::SchemaError;
use crate::record::RecordSchema;
use std::sync::Arc;

/// Wire encoding of one fixed-width field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEncoding {
    /// Left-justified text padded with spaces.
    FixedString,
    /// Right-justified decimal padded with zeros.
    UnsignedInteger,
    /// Right-justified decimal padded with spaces, `-` for negatives.
    SignedInteger,
}

/// One field of a binary layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryField {
    /// Field name.
    pub name: String,
    /// Wire encoding.
    pub encoding: FieldEncoding,
    /// Width in bytes.
    pub width: usize,
    /// Offset from the start of the record.
    pub offset: usize,
}

/// Wire layout of a fixed-width record.
#[derive(Debug)]
pub struct BinaryLayout {
    tag: String,
    fields: Vec<BinaryField>,
    length: usize,
    schema: Arc<RecordSchema>,
}

impl BinaryLayout {
    /// Starts building a layout for the given extension tag.
    pub fn builder(tag: impl Into<String>) -> BinaryLayoutBuilder {
        BinaryLayoutBuilder {
            tag: tag.into(),
            fields: Vec::new(),
            declared_length: None,
        }
    }

    /// Extension tag, e.g. `CSCCGA`.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Fields in wire order.
    #[must_use]
    pub fn fields(&self) -> &[BinaryField] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&BinaryField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Total record length in bytes.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Record schema derived from the layout.
    #[must_use]
    pub const fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }
}

/// Builder for [`BinaryLayout`].
#[derive(Debug)]
pub struct BinaryLayoutBuilder {
    tag: String,
    fields: Vec<(String, FieldEncoding, usize)>,
    declared_length: Option<usize>,
}

impl BinaryLayoutBuilder {
    /// Appends a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, width: usize) -> Self {
        self.fields.push((name.into(), FieldEncoding::FixedString, width));
        self
    }

    /// Appends an unsigned integer field.
    #[must_use]
    pub fn unsigned(mut self, name: impl Into<String>, width: usize) -> Self {
        self.fields.push((name.into(), FieldEncoding::UnsignedInteger, width));
        self
    }

    /// Appends a signed integer field.
    #[must_use]
    pub fn signed(mut self, name: impl Into<String>, width: usize) -> Self {
        self.fields.push((name.into(), FieldEncoding::SignedInteger, width));
        self
    }

    /// Declares the expected total length, checked at build time.
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.declared_length = Some(length);
        self
    }

    /// Builds the layout and its derived schema.
    ///
    /// Every field of the derived schema is required, and text fields drop
    /// trailing spaces on assignment. Whether an integer fits its width is
    /// checked when encoding.
    ///
    /// # Errors
    /// Returns `SchemaError` if a width is zero, the declared length differs
    /// from the sum of widths, or field names repeat.
    pub fn build(self) -> Result<Arc<BinaryLayout>, SchemaError> {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut schema = RecordSchema::builder(&self.tag);
        let mut offset = 0;

        for (name, encoding, width) in self.fields {
            if width == 0 {
                return Err(SchemaError::ZeroWidth {
                    layout: self.tag,
                    field: name,
                });
            }
            let descriptor = match encoding {
                FieldEncoding::FixedString => FieldDescriptor::string(&name).right_trimmed(),
                FieldEncoding::UnsignedInteger | FieldEncoding::SignedInteger => {
                    FieldDescriptor::integer(&name)
                }
            };
            schema = schema.field(descriptor.required());
            fields.push(BinaryField {
                name,
                encoding,
                width,
                offset,
            });
            offset += width;
        }

        if let Some(declared) = self.declared_length
            && declared != offset
        {
            return Err(SchemaError::LengthMismatch {
                layout: self.tag,
                declared,
                calculated: offset,
            });
        }

        Ok(Arc::new(BinaryLayout {
            schema: schema.build()?,
            tag: self.tag,
            fields,
            length: offset,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_and_length() {
        let layout = BinaryLayout::builder("TEST01")
            .text("NAME", 4)
            .unsigned("COUNT", 3)
            .signed("DELTA", 5)
            .length(12)
            .build()
            .expect("Failed to build layout");
        assert_eq!(layout.tag(), "TEST01");
        assert_eq!(layout.length(), 12);
        let offsets: Vec<usize> = layout.fields().iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 4, 7]);
        assert_eq!(layout.schema().name(), "TEST01");
        assert_eq!(layout.schema().required().count(), 3);
    }

    #[test]
    fn test_derived_schema_kinds() {
        let layout = BinaryLayout::builder("T")
            .unsigned("U", 3)
            .text("S", 3)
            .build()
            .expect("Failed to build layout");
        let kind = |name: &str| {
            layout
                .schema()
                .field(name)
                .and_then(|f| f.kind().primitive())
        };
        assert_eq!(kind("U"), Some(sarmeta_core::PrimitiveKind::Integer));
        assert_eq!(kind("S"), Some(sarmeta_core::PrimitiveKind::String));
        assert_eq!(layout.field("S").map(|f| f.offset), Some(3));
    }

    #[test]
    fn test_duplicate_layout_field() {
        let result = BinaryLayout::builder("T").text("A", 1).text("A", 2).build();
        assert!(matches!(result, Err(SchemaError::DuplicateField { .. })));
    }

    #[test]
    fn test_length_mismatch() {
        let result = BinaryLayout::builder("T").text("A", 4).length(5).build();
        assert!(matches!(
            result,
            Err(SchemaError::LengthMismatch {
                declared: 5,
                calculated: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_width() {
        let result = BinaryLayout::builder("T").text("A", 0).build();
        assert!(matches!(result, Err(SchemaError::ZeroWidth { .. })));
    }
}

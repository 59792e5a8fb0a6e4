//! Field descriptors.
//!
//! A [`FieldDescriptor`] binds a field name to a coercion rule, a
//! required/optional flag, an optional numeric output format, an optional
//! enumerated value set and the collection mode used by external codecs.

use crate::node::Strictness;
use crate::record::RecordSchema;
use sarmeta_core::{
    CoercionError, EnumValues, IntegerRange, NumericFormat, PrimitiveKind, RawValue, Value,
    coerce, format_value,
};
use std::sync::Arc;

/// What a field holds.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A primitive value.
    Primitive(PrimitiveKind),
    /// A nested record, exclusively owned by its parent node.
    Record(Arc<RecordSchema>),
}

impl FieldKind {
    /// Returns the primitive kind, if any.
    #[must_use]
    pub const fn primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            Self::Record(_) => None,
        }
    }

    /// Returns the nested record schema, if any.
    #[must_use]
    pub const fn record(&self) -> Option<&Arc<RecordSchema>> {
        match self {
            Self::Primitive(_) => None,
            Self::Record(schema) => Some(schema),
        }
    }
}

/// How a field's multiplicity is encoded externally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionMode {
    /// Single value.
    Scalar,
    /// Numeric array held in one element; rows of `columns` entries.
    ArrayOfScalars {
        /// Entries per row (1 for a flat array).
        columns: usize,
    },
    /// One child element per entry, all sharing the given tag.
    RepeatedChild(String),
    /// Key/value pairs, one child element per key with a `name` attribute.
    ParameterMap(String),
}

impl CollectionMode {
    /// Returns the child tag of repeated and parameter collections.
    #[must_use]
    pub fn child_tag(&self) -> Option<&str> {
        match self {
            Self::RepeatedChild(tag) | Self::ParameterMap(tag) => Some(tag),
            _ => None,
        }
    }
}

/// Declaration of one field of a record.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    pub(crate) required: bool,
    pub(crate) collection: CollectionMode,
    pub(crate) numeric_format: Option<NumericFormat>,
    enum_values: Option<EnumValues>,
    range: Option<IntegerRange>,
    frequency_relative: bool,
    right_trimmed: bool,
    doc: Option<String>,
}

impl FieldDescriptor {
    /// Creates a scalar, optional field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            collection: CollectionMode::Scalar,
            numeric_format: None,
            enum_values: None,
            range: None,
            frequency_relative: false,
            right_trimmed: false,
            doc: None,
        }
    }

    /// Creates an integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveKind::Integer))
    }

    /// Creates a float field.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveKind::Float))
    }

    /// Creates a boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveKind::Boolean))
    }

    /// Creates a complex field.
    pub fn complex(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveKind::Complex))
    }

    /// Creates a date/time field.
    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveKind::DateTime))
    }

    /// Creates a free text field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(PrimitiveKind::String))
    }

    /// Creates an enumerated text field.
    pub fn enumeration(name: impl Into<String>, values: EnumValues) -> Self {
        let mut field = Self::new(name, FieldKind::Primitive(PrimitiveKind::EnumString));
        field.enum_values = Some(values);
        field
    }

    /// Creates a nested record field.
    pub fn record(name: impl Into<String>, schema: Arc<RecordSchema>) -> Self {
        Self::new(name, FieldKind::Record(schema))
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the collection mode.
    #[must_use]
    pub fn collection(mut self, mode: CollectionMode) -> Self {
        self.collection = mode;
        self
    }

    /// Sets the numeric output format.
    #[must_use]
    pub fn format(mut self, format: NumericFormat) -> Self {
        self.numeric_format = Some(format);
        self
    }

    /// Restricts integer values to an inclusive range.
    #[must_use]
    pub fn range(mut self, range: IntegerRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Marks the field as shifted by reference-frequency derivation.
    #[must_use]
    pub fn frequency_relative(mut self) -> Self {
        self.frequency_relative = true;
        self
    }

    /// Strips trailing spaces from text values on assignment, matching
    /// space-padded fixed-width storage.
    #[must_use]
    pub fn right_trimmed(mut self) -> Self {
        self.right_trimmed = true;
        self
    }

    /// Attaches documentation.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field kind.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns true if the field is required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Collection mode.
    #[must_use]
    pub const fn collection_mode(&self) -> &CollectionMode {
        &self.collection
    }

    /// Numeric output format.
    #[must_use]
    pub const fn numeric_format(&self) -> Option<&NumericFormat> {
        self.numeric_format.as_ref()
    }

    /// Enumerated value set.
    #[must_use]
    pub const fn enum_values(&self) -> Option<&EnumValues> {
        self.enum_values.as_ref()
    }

    /// Integer range.
    #[must_use]
    pub const fn integer_range(&self) -> Option<IntegerRange> {
        self.range
    }

    /// Returns true if reference-frequency derivation shifts this field.
    #[must_use]
    pub const fn is_frequency_relative(&self) -> bool {
        self.frequency_relative
    }

    /// Returns true if trailing spaces are stripped from text values.
    #[must_use]
    pub const fn is_right_trimmed(&self) -> bool {
        self.right_trimmed
    }

    /// Documentation string.
    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Coerces a raw value for this field.
    ///
    /// In [`Strictness::Lenient`] mode a value outside the enumerated set is
    /// kept and reported later by validation.
    ///
    /// # Errors
    /// Returns `CoercionError` if the value cannot be coerced, is out of
    /// range, or violates the enumerated set in strict mode. Nested record
    /// fields reject every raw value.
    pub fn coerce(&self, raw: &RawValue, strictness: Strictness) -> Result<Value, CoercionError> {
        let kind = self
            .kind
            .primitive()
            .ok_or_else(|| CoercionError::mismatch(PrimitiveKind::String, "record"))?;
        let value = match coerce(kind, raw)? {
            Value::Str(mut text) if self.right_trimmed => {
                text.truncate(text.trim_end_matches(' ').len());
                Value::Str(text)
            }
            other => other,
        };
        match value {
            Value::Int(v) => match self.range {
                Some(range) => range.check(v).map(Value::Int),
                None => Ok(value),
            },
            Value::Str(text) if kind == PrimitiveKind::EnumString => {
                match (self.enum_values.as_ref(), strictness) {
                    (Some(values), Strictness::Strict) => values.check(&text).map(Value::Str),
                    (Some(values), Strictness::Lenient) => match values.find(&text) {
                        Some(canonical) => Ok(Value::Str(canonical.to_string())),
                        None => {
                            tracing::warn!(
                                "Field {} got value '{}' outside of {:?}; keeping it",
                                self.name,
                                text,
                                values.values()
                            );
                            Ok(Value::Str(text))
                        }
                    },
                    (None, _) => Ok(Value::Str(text)),
                }
            }
            other => Ok(other),
        }
    }

    /// Returns true if `value` satisfies the enumerated set, when one is declared.
    #[must_use]
    pub fn accepts_enum(&self, value: &Value) -> bool {
        match (&self.enum_values, value) {
            (Some(values), Value::Str(text)) => values.contains(text),
            _ => true,
        }
    }

    /// Formats a value for external output using the declared format.
    #[must_use]
    pub fn format_for_output(&self, value: &Value) -> String {
        format_value(value, self.numeric_format.as_ref())
    }
}

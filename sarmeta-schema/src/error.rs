//! Error types for schema construction and object graph mutation.

use sarmeta_core::CoercionError;
use thiserror::Error;

/// Error raised while building a record schema or binary layout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A field name appears twice in the same schema.
    #[error("duplicate field '{field}' in record '{record}'")]
    DuplicateField {
        /// Record name.
        record: String,
        /// Field name.
        field: String,
    },

    /// A required or collection declaration names a field that does not exist.
    #[error("{declaration} references unknown field '{field}' in record '{record}'")]
    UnknownField {
        /// Record name.
        record: String,
        /// Field name.
        field: String,
        /// Which declaration held the reference.
        declaration: &'static str,
    },

    /// A field declaration is inconsistent with its kind.
    #[error("invalid declaration for field '{field}' in record '{record}': {message}")]
    InvalidField {
        /// Record name.
        record: String,
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Numeric format specifier could not be parsed.
    #[error("invalid numeric format '{spec}' for field '{field}'")]
    InvalidFormat {
        /// Field name.
        field: String,
        /// Offending specifier.
        spec: String,
    },

    /// Binary layout field declared with zero width.
    #[error("field '{field}' of layout '{layout}' has zero width")]
    ZeroWidth {
        /// Layout tag.
        layout: String,
        /// Field name.
        field: String,
    },

    /// Declared record length differs from the sum of field widths.
    #[error("layout '{layout}' declares length {declared}, fields sum to {calculated}")]
    LengthMismatch {
        /// Layout tag.
        layout: String,
        /// Declared length.
        declared: usize,
        /// Sum of field widths.
        calculated: usize,
    },
}

impl SchemaError {
    /// Creates an invalid field error.
    pub fn invalid_field(
        record: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            record: record.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error raised by object graph mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    /// No field with this name exists in the record.
    #[error("record '{record}' has no field '{field}'")]
    UnknownField {
        /// Record name.
        record: String,
        /// Field name.
        field: String,
    },

    /// Raw value could not be coerced to the field's kind.
    #[error("field '{field}': {source}")]
    Coercion {
        /// Field name.
        field: String,
        /// Underlying coercion failure.
        #[source]
        source: CoercionError,
    },

    /// The assignment shape does not match the field's collection mode.
    #[error("field '{field}' cannot be assigned this way: {reason}")]
    UnsupportedAssignment {
        /// Field name.
        field: String,
        /// Explanation.
        reason: String,
    },

    /// A nested record of the wrong type was supplied.
    #[error("field '{field}' expects record '{expected}', got '{found}'")]
    SchemaMismatch {
        /// Field name.
        field: String,
        /// Expected record name.
        expected: String,
        /// Supplied record name.
        found: String,
    },

    /// Parameter key inserted twice.
    #[error("duplicate parameter '{key}' in field '{field}'")]
    DuplicateParameter {
        /// Field name.
        field: String,
        /// Duplicate key.
        key: String,
    },

    /// Array values do not fill whole rows.
    #[error("field '{field}' expects rows of {columns} entries, got {found} values")]
    ShapeMismatch {
        /// Field name.
        field: String,
        /// Declared row width.
        columns: usize,
        /// Offending value or row length.
        found: usize,
    },

    /// No derivation hook registered under this name.
    #[error("record '{record}' has no derivation hook '{hook}'")]
    UnknownHook {
        /// Record name.
        record: String,
        /// Hook name.
        hook: String,
    },

    /// A derivation hook was invoked with the wrong kind of input.
    #[error("derivation hook '{hook}' expects {expected}")]
    DerivationInput {
        /// Hook name.
        hook: String,
        /// Expected input kind.
        expected: &'static str,
    },
}

impl NodeError {
    /// Creates an unsupported assignment error.
    pub fn unsupported(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedAssignment {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the coercion failure, if this error wraps one.
    #[must_use]
    pub const fn coercion(&self) -> Option<&CoercionError> {
        match self {
            Self::Coercion { source, .. } => Some(source),
            _ => None,
        }
    }
}

//! Error types for sarmeta core operations.

use crate::types::PrimitiveKind;
use thiserror::Error;

/// Error raised when a raw input cannot be coerced to a field's primitive kind.
///
/// Coercion errors are always surfaced at the point of assignment; nothing in
/// the engine recovers from them silently.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// The input shape is not accepted by the target kind.
    #[error("cannot coerce {found} into {expected}")]
    TypeMismatch {
        /// Target primitive kind.
        expected: PrimitiveKind,
        /// Shape of the rejected input.
        found: &'static str,
    },

    /// Text input could not be parsed for the target kind.
    #[error("cannot parse '{text}' as {expected}")]
    InvalidText {
        /// Target primitive kind.
        expected: PrimitiveKind,
        /// Offending text.
        text: String,
    },

    /// Integer value lies outside the range declared by the field.
    #[error("value {value} outside of range [{min}, {max}]")]
    OutOfRange {
        /// Rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// Value is not a member of the field's enumerated value set.
    #[error("value '{value}' is not one of {allowed:?}")]
    EnumViolation {
        /// Rejected value.
        value: String,
        /// Allowed values.
        allowed: Vec<String>,
    },
}

impl CoercionError {
    /// Creates an invalid text error.
    pub fn invalid_text(expected: PrimitiveKind, text: impl Into<String>) -> Self {
        Self::InvalidText {
            expected,
            text: text.into(),
        }
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub const fn mismatch(expected: PrimitiveKind, found: &'static str) -> Self {
        Self::TypeMismatch { expected, found }
    }
}

/// Core error type for buffer and formatting operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer is too short for the requested operation.
    #[error("buffer too short: required {required} bytes, available {available} bytes")]
    BufferTooShort {
        /// Required buffer size in bytes.
        required: usize,
        /// Available buffer size in bytes.
        available: usize,
    },

    /// Invalid UTF-8 encoding in a text field.
    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 {
        /// Byte offset where invalid UTF-8 was found.
        offset: usize,
    },

    /// Numeric format specifier could not be parsed.
    #[error("invalid numeric format '{spec}'")]
    InvalidFormat {
        /// Offending specifier.
        spec: String,
    },

    /// Coercion failure.
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

/// Result type alias for sarmeta core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_error_display() {
        let err = CoercionError::invalid_text(PrimitiveKind::Float, "abc");
        let msg = err.to_string();
        assert!(msg.contains("abc"));
        assert!(msg.contains("float"));
    }

    #[test]
    fn test_buffer_too_short_display() {
        let err = Error::BufferTooShort {
            required: 80,
            available: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("80"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_coercion_error_converts() {
        let err: Error = CoercionError::OutOfRange {
            value: 300,
            min: 0,
            max: 255,
        }
        .into();
        assert!(matches!(err, Error::Coercion(CoercionError::OutOfRange { .. })));
    }
}

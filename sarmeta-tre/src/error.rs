//! Error types for the fixed-width record codec.

use sarmeta_schema::NodeError;
use thiserror::Error;

/// Errors raised while encoding or decoding fixed-width records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreError {
    /// Buffer holds fewer bytes than the record requires.
    #[error("record '{tag}' truncated: required {required} bytes, available {available} bytes")]
    TruncatedRecord {
        /// Extension tag.
        tag: String,
        /// Bytes required.
        required: usize,
        /// Bytes available.
        available: usize,
    },

    /// Integer does not fit its field.
    #[error("value {value} of field '{field}' does not fit {width} bytes")]
    FieldOverflow {
        /// Field name.
        field: String,
        /// Rejected value.
        value: i64,
        /// Field width in bytes.
        width: usize,
    },

    /// String longer than its field while truncation is rejected.
    #[error("field '{field}' holds {length} bytes but is {width} bytes wide")]
    StringTooLong {
        /// Field name.
        field: String,
        /// Value length in bytes.
        length: usize,
        /// Field width in bytes.
        width: usize,
    },

    /// Field bytes are not valid UTF-8.
    #[error("field '{field}' is not valid UTF-8 at offset {offset}")]
    InvalidUtf8 {
        /// Field name.
        field: String,
        /// Byte offset within the record.
        offset: usize,
    },

    /// Extension envelope length is not a decimal number.
    #[error("extension '{tag}' has invalid length '{text}'")]
    InvalidLength {
        /// Extension tag.
        tag: String,
        /// Offending length text.
        text: String,
    },

    /// Extension data does not fit the envelope's length field.
    #[error("extension '{tag}' data of {length} bytes exceeds the envelope limit")]
    ExtensionTooLong {
        /// Extension tag.
        tag: String,
        /// Data length in bytes.
        length: usize,
    },

    /// Node operation failure while building a decoded record.
    #[error("node error: {0}")]
    Node(#[from] NodeError),
}

impl TreError {
    /// Creates a truncated record error.
    pub fn truncated(tag: impl Into<String>, required: usize, available: usize) -> Self {
        Self::TruncatedRecord {
            tag: tag.into(),
            required,
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_display() {
        let err = TreError::truncated("CSCCGA", 60, 12);
        let msg = err.to_string();
        assert!(msg.contains("CSCCGA"));
        assert!(msg.contains("60"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_overflow_display() {
        let err = TreError::FieldOverflow {
            field: "ORIGIN_SAMPLE".to_string(),
            value: 123_456,
            width: 5,
        };
        assert!(err.to_string().contains("ORIGIN_SAMPLE"));
    }
}

//! Error types for XML reading, writing and decoding.

use sarmeta_schema::NodeError;
use thiserror::Error;

/// Error type for XML codec operations.
#[derive(Debug, Error)]
pub enum XmlError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Document structure is not well formed.
    #[error("malformed document: {message}")]
    Malformed {
        /// Error message.
        message: String,
    },

    /// Entity reference that is neither predefined nor a character reference.
    #[error("unknown entity '&{name};'")]
    UnknownEntity {
        /// Entity name.
        name: String,
    },

    /// Parameter key repeated within one parameter collection.
    #[error("duplicate parameter '{key}' at {path}")]
    DuplicateParameter {
        /// Dotted path of the parameter field.
        path: String,
        /// Duplicate key.
        key: String,
    },

    /// Object graph rejected a decoded value.
    #[error("object graph error: {0}")]
    Node(#[from] NodeError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl XmlError {
    /// Creates a malformed document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

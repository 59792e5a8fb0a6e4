//! Non-fatal findings collected while decoding external data.

use std::fmt;

/// A decoding problem that caused one entry to be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An element or attribute could not be turned into a field value.
    MalformedExternalData {
        /// Dotted path of the affected field.
        path: String,
        /// What was wrong with the data.
        reason: String,
    },
}

impl Diagnostic {
    /// Creates a malformed data diagnostic.
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedExternalData {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Dotted path of the affected field.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MalformedExternalData { path, .. } => path,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedExternalData { path, reason } => {
                write!(f, "skipped {path}: {reason}")
            }
        }
    }
}

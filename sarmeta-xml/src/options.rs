//! XML codec configuration.

use sarmeta_schema::Strictness;

/// Settings for reading and writing records as XML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlOptions {
    /// Default namespace declared on the top element when writing. When
    /// reading, child elements must belong to it; `None` matches local names
    /// in any namespace.
    pub namespace: Option<String>,
    /// Strictness of nodes built while decoding.
    pub strictness: Strictness,
    /// Validate nodes before writing and log every violation.
    pub check_validity: bool,
    /// Indentation width; `None` writes compact XML.
    pub indent: Option<usize>,
    /// Write an XML declaration.
    pub declaration: bool,
}

impl XmlOptions {
    /// Creates default options: no namespace, lenient, compact, no declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the strictness of decoded nodes.
    #[must_use]
    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Enables or disables validation before writing.
    #[must_use]
    pub fn check_validity(mut self, check: bool) -> Self {
        self.check_validity = check;
        self
    }

    /// Sets the indentation width.
    #[must_use]
    pub fn indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Enables or disables the XML declaration.
    #[must_use]
    pub fn declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }
}

//! Owned XML element tree.

/// One XML element with resolved namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Local name, without prefix.
    pub name: String,
    /// Namespace URI the element's prefix resolved to.
    pub namespace: Option<String>,
    /// Attributes in document order, keyed by local name.
    pub attributes: Vec<(String, String)>,
    /// Concatenated character data, unescaped and untrimmed.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates an element holding text.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the namespace of this element.
    #[must_use]
    pub fn in_namespace(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace.map(str::to_string);
        self
    }

    /// Sets or replaces an attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Appends a child and returns a mutable reference to it.
    pub fn push_child(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Returns true if the element has this local name and, when a namespace
    /// is given, this namespace.
    #[must_use]
    pub fn matches(&self, name: &str, namespace: Option<&str>) -> bool {
        self.name == name && namespace.is_none_or(|ns| self.namespace.as_deref() == Some(ns))
    }

    /// First child matching a name.
    #[must_use]
    pub fn child(&self, name: &str, namespace: Option<&str>) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.matches(name, namespace))
    }

    /// Children matching a name, in document order.
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = &'a XmlElement> {
        self.children
            .iter()
            .filter(move |c| c.matches(name, namespace))
    }

    /// Character data with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

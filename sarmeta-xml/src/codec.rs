//! Schema-driven conversion between nodes and XML.
//!
//! Each present field becomes one child element named after the field,
//! except repeated collections and parameter maps, whose entries become
//! sibling children named by the collection's child tag. Absent fields are
//! omitted.

use crate::diagnostics::Diagnostic;
use crate::element::XmlElement;
use crate::error::XmlError;
use crate::options::XmlOptions;
use crate::reader::read_document;
use crate::writer::write_document;
use sarmeta_core::{PrimitiveKind, RawValue, Value, format_component};
use sarmeta_schema::{
    ArrayValue, CollectionMode, FieldDescriptor, FieldKind, FieldValue, Node, NodeError,
    RecordSchema,
};
use std::sync::Arc;

/// Result of decoding XML into a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Decoded node.
    pub node: Node,
    /// Entries skipped because their data was malformed.
    pub diagnostics: Vec<Diagnostic>,
}

/// Converts nodes to and from XML according to their schemas.
#[derive(Debug, Clone, Default)]
pub struct XmlCodec {
    options: XmlOptions,
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

impl XmlCodec {
    /// Creates a codec with the given options.
    #[must_use]
    pub const fn new(options: XmlOptions) -> Self {
        Self { options }
    }

    /// Codec options.
    #[must_use]
    pub const fn options(&self) -> &XmlOptions {
        &self.options
    }

    fn namespace(&self) -> Option<&str> {
        self.options.namespace.as_deref()
    }

    /// Serializes a node as an element with the given tag.
    ///
    /// When `parent` is given the element is appended to it and a copy is
    /// returned; otherwise the element is returned alone.
    #[must_use]
    pub fn serialize(&self, node: &Node, tag: &str, parent: Option<&mut XmlElement>) -> XmlElement {
        if self.options.check_validity {
            for violation in node.validate() {
                tracing::error!("{} is not valid: {}", node.name(), violation);
            }
        }
        let element = self.encode_node(node, tag);
        if let Some(parent) = parent {
            parent.push_child(element.clone());
        }
        element
    }

    /// Serializes a node as a top element named after its record, declaring
    /// the default namespace when one is configured.
    #[must_use]
    pub fn to_element(&self, node: &Node) -> XmlElement {
        let mut element = self.serialize(node, node.name(), None);
        if let Some(ns) = self.namespace() {
            element.set_attribute("xmlns", ns);
        }
        element
    }

    /// Serializes a node to XML text.
    ///
    /// # Errors
    /// Returns `XmlError` if writing fails.
    pub fn to_xml_string(&self, node: &Node) -> Result<String, XmlError> {
        write_document(&self.to_element(node), &self.options)
    }

    fn leaf(&self, name: &str, text: String) -> XmlElement {
        XmlElement::with_text(name, text).in_namespace(self.namespace())
    }

    fn encode_value(&self, field: &FieldDescriptor, tag: &str, value: &Value) -> XmlElement {
        match value {
            Value::Complex(c) => {
                let format = field.numeric_format();
                let mut element = XmlElement::new(tag).in_namespace(self.namespace());
                element.push_child(self.leaf("Real", format_component(c.re, format)));
                element.push_child(self.leaf("Imag", format_component(c.im, format)));
                element
            }
            other => self.leaf(tag, field.format_for_output(other)),
        }
    }

    fn encode_array(&self, field: &FieldDescriptor, array: &ArrayValue) -> XmlElement {
        let text = array
            .iter_rows()
            .map(|row| {
                row.iter()
                    .map(|v| field.format_for_output(v))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join(" ");
        let mut element = self.leaf(field.name(), text);
        element.set_attribute("size", array.rows().to_string());
        element
    }

    fn encode_node(&self, node: &Node, tag: &str) -> XmlElement {
        let mut element = XmlElement::new(tag).in_namespace(self.namespace());
        for (field, value) in node.present() {
            let child_tag = field.collection_mode().child_tag().unwrap_or(field.name());
            match value {
                FieldValue::Scalar(v) => {
                    element.push_child(self.encode_value(field, field.name(), v));
                }
                FieldValue::Array(array) => {
                    element.push_child(self.encode_array(field, array));
                }
                FieldValue::List(values) => {
                    for v in values {
                        element.push_child(self.encode_value(field, child_tag, v));
                    }
                }
                FieldValue::Record(child) => {
                    element.push_child(self.encode_node(child, field.name()));
                }
                FieldValue::Records(children) => {
                    for child in children {
                        element.push_child(self.encode_node(child, child_tag));
                    }
                }
                FieldValue::Parameters(map) => {
                    for (key, text) in map.iter() {
                        let param = element.push_child(self.leaf(child_tag, text.to_string()));
                        param.set_attribute("name", key);
                    }
                }
            }
        }
        element
    }

    /// Decodes an element into a node of the given schema.
    ///
    /// Missing children leave fields absent. Malformed scalars, array rows
    /// and parameters without a `name` are skipped and reported as
    /// diagnostics.
    ///
    /// # Errors
    /// Returns `XmlError::DuplicateParameter` if a parameter key repeats.
    pub fn deserialize(
        &self,
        element: &XmlElement,
        schema: &Arc<RecordSchema>,
    ) -> Result<Decoded, XmlError> {
        if element.name != schema.name() {
            tracing::debug!(
                "Decoding element '{}' as record {}",
                element.name,
                schema.name()
            );
        }
        let mut diagnostics = Vec::new();
        let node = self.decode_node(element, schema, "", &mut diagnostics)?;
        for diagnostic in &diagnostics {
            tracing::warn!("{}", diagnostic);
        }
        Ok(Decoded { node, diagnostics })
    }

    /// Parses XML text and decodes its root element.
    ///
    /// # Errors
    /// Returns `XmlError` if the document is malformed or a parameter key
    /// repeats.
    pub fn from_xml_str(&self, xml: &str, schema: &Arc<RecordSchema>) -> Result<Decoded, XmlError> {
        let root = read_document(xml)?;
        self.deserialize(&root, schema)
    }

    fn decode_node(
        &self,
        element: &XmlElement,
        schema: &Arc<RecordSchema>,
        path: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Node, XmlError> {
        let mut node = Node::with_strictness(Arc::clone(schema), self.options.strictness);
        for field in schema.fields() {
            let field_path = join(path, field.name());
            let value = match (field.kind(), field.collection_mode()) {
                (FieldKind::Primitive(_), CollectionMode::Scalar) => element
                    .child(field.name(), self.namespace())
                    .and_then(|child| {
                        self.decode_scalar(field, child, &field_path, diagnostics)
                    })
                    .map(FieldValue::Scalar),
                (FieldKind::Primitive(_), CollectionMode::ArrayOfScalars { columns }) => {
                    match element.child(field.name(), self.namespace()) {
                        Some(child) => Some(FieldValue::Array(self.decode_array(
                            field,
                            *columns,
                            child,
                            &field_path,
                            diagnostics,
                        )?)),
                        None => None,
                    }
                }
                (FieldKind::Primitive(_), CollectionMode::RepeatedChild(tag)) => {
                    let values: Vec<Value> = element
                        .children_named(tag, self.namespace())
                        .enumerate()
                        .filter_map(|(i, child)| {
                            let entry_path = format!("{field_path}[{i}]");
                            self.decode_scalar(field, child, &entry_path, diagnostics)
                        })
                        .collect();
                    (!values.is_empty()).then_some(FieldValue::List(values))
                }
                (FieldKind::Primitive(_), CollectionMode::ParameterMap(tag)) => {
                    self.decode_parameters(&mut node, field, element, tag, &field_path, diagnostics)?;
                    None
                }
                (FieldKind::Record(child_schema), CollectionMode::RepeatedChild(tag)) => {
                    let mut children = Vec::new();
                    for (i, child) in element.children_named(tag, self.namespace()).enumerate() {
                        let child_path = format!("{field_path}[{i}]");
                        children.push(self.decode_node(child, child_schema, &child_path, diagnostics)?);
                    }
                    (!children.is_empty()).then_some(FieldValue::Records(children))
                }
                (FieldKind::Record(child_schema), _) => {
                    match element.child(field.name(), self.namespace()) {
                        Some(child) => Some(FieldValue::Record(Box::new(self.decode_node(
                            child,
                            child_schema,
                            &field_path,
                            diagnostics,
                        )?))),
                        None => None,
                    }
                }
            };
            if let Some(value) = value {
                node.put(field.name(), value)?;
            }
        }
        Ok(node)
    }

    fn decode_scalar(
        &self,
        field: &FieldDescriptor,
        element: &XmlElement,
        path: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Value> {
        let raw = match field.kind().primitive() {
            Some(PrimitiveKind::Complex) => {
                match self.decode_complex(element) {
                    Ok(pair) => RawValue::Pair(pair.0, pair.1),
                    Err(reason) => {
                        diagnostics.push(Diagnostic::malformed(path, reason));
                        return None;
                    }
                }
            }
            Some(kind) if kind.is_textual() => RawValue::Text(element.text.clone()),
            _ => RawValue::Text(element.trimmed_text().to_string()),
        };
        match field.coerce(&raw, self.options.strictness) {
            Ok(value) => Some(value),
            Err(e) => {
                diagnostics.push(Diagnostic::malformed(path, e.to_string()));
                None
            }
        }
    }

    fn decode_complex(&self, element: &XmlElement) -> Result<(f64, f64), String> {
        let part = |name: &str| -> Result<f64, String> {
            let child = element
                .child(name, self.namespace())
                .ok_or_else(|| format!("missing {name} component"))?;
            let text = child.trimmed_text();
            text.parse()
                .map_err(|_| format!("cannot parse '{text}' as the {name} component"))
        };
        Ok((part("Real")?, part("Imag")?))
    }

    fn decode_array(
        &self,
        field: &FieldDescriptor,
        columns: usize,
        element: &XmlElement,
        path: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<ArrayValue, XmlError> {
        let mut values = Vec::new();
        let mut rows = 0;
        for (i, row) in element.text.split_whitespace().enumerate() {
            let row_path = format!("{path}[{i}]");
            let tokens: Vec<&str> = row.split(',').collect();
            if tokens.len() != columns {
                diagnostics.push(Diagnostic::malformed(
                    row_path,
                    format!("expected {columns} entries, got '{row}'"),
                ));
                continue;
            }
            let parsed: Result<Vec<Value>, _> = tokens
                .iter()
                .map(|token| {
                    field.coerce(
                        &RawValue::Text((*token).to_string()),
                        self.options.strictness,
                    )
                })
                .collect();
            match parsed {
                Ok(row_values) => {
                    values.extend(row_values);
                    rows += 1;
                }
                Err(e) => diagnostics.push(Diagnostic::malformed(row_path, e.to_string())),
            }
        }
        if let Some(size) = element.attribute("size")
            && size.trim().parse::<usize>().ok() != Some(rows)
        {
            tracing::debug!("{} declares size {} but holds {} rows", path, size, rows);
        }
        ArrayValue::new(columns, values)
            .ok_or_else(|| XmlError::malformed(format!("{path} has zero columns")))
    }

    fn decode_parameters(
        &self,
        node: &mut Node,
        field: &FieldDescriptor,
        element: &XmlElement,
        tag: &str,
        path: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<(), XmlError> {
        for (i, child) in element.children_named(tag, self.namespace()).enumerate() {
            let Some(key) = child.attribute("name") else {
                diagnostics.push(Diagnostic::malformed(
                    format!("{path}[{i}]"),
                    "parameter without a name attribute",
                ));
                continue;
            };
            match node.insert_parameter(field.name(), key, child.text.as_str()) {
                Ok(()) => {}
                Err(NodeError::DuplicateParameter { key, .. }) => {
                    return Err(XmlError::DuplicateParameter {
                        path: path.to_string(),
                        key,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

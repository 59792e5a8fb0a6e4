//! The object graph.
//!
//! A [`Node`] is one record instance: a schema reference plus one optional
//! slot per declared field. Nested records are owned by their parent, so a
//! node graph is always a tree.

use crate::derive::DerivationInput;
use crate::descriptor::{CollectionMode, FieldDescriptor, FieldKind};
use crate::error::NodeError;
use crate::params::ParameterMap;
use crate::record::RecordSchema;
use crate::validation::{Violation, validate};
use chrono::NaiveDateTime;
use sarmeta_core::{Complex64, RawValue, Value};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use std::sync::Arc;

/// How enumerated-value mismatches are handled on assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Out-of-set values are rejected at assignment.
    Strict,
    /// Out-of-set values are kept with a warning and reported by validation.
    #[default]
    Lenient,
}

/// Rows of a numeric array, stored flat in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    columns: usize,
    values: Vec<Value>,
}

impl ArrayValue {
    /// Creates an array from flat values.
    ///
    /// Returns `None` if `columns` is zero or the values do not fill whole rows.
    #[must_use]
    pub fn new(columns: usize, values: Vec<Value>) -> Option<Self> {
        (columns > 0 && values.len() % columns == 0).then_some(Self { columns, values })
    }

    /// Entries per row.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.values.len() / self.columns
    }

    /// Iterates over rows.
    pub fn iter_rows(&self) -> std::slice::ChunksExact<'_, Value> {
        self.values.chunks_exact(self.columns)
    }

    /// Flat values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Flat values, mutable.
    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    /// Values as floats, skipping non-numeric entries.
    #[must_use]
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }
}

/// Content of one present field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Single primitive value.
    Scalar(Value),
    /// Numeric array.
    Array(ArrayValue),
    /// Repeated primitive values.
    List(Vec<Value>),
    /// Nested record.
    Record(Box<Node>),
    /// Repeated nested records.
    Records(Vec<Node>),
    /// Key/value parameters.
    Parameters(ParameterMap),
}

impl FieldValue {
    /// Returns the scalar value, if this is one.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Returns true for a repeated or parameter collection with no entries.
    /// Such values are treated as absent.
    #[must_use]
    pub fn is_empty_collection(&self) -> bool {
        match self {
            Self::List(values) => values.is_empty(),
            Self::Records(nodes) => nodes.is_empty(),
            Self::Parameters(map) => map.is_empty(),
            Self::Scalar(_) | Self::Array(_) | Self::Record(_) => false,
        }
    }

    const fn shape(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Array(_) => "array",
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Records(_) => "record list",
            Self::Parameters(_) => "parameters",
        }
    }
}

/// One record instance.
#[derive(Clone)]
pub struct Node {
    schema: Arc<RecordSchema>,
    strictness: Strictness,
    values: Vec<Option<FieldValue>>,
}

impl Node {
    /// Creates an empty lenient node.
    #[must_use]
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        Self::with_strictness(schema, Strictness::default())
    }

    /// Creates an empty node with the given strictness.
    #[must_use]
    pub fn with_strictness(schema: Arc<RecordSchema>, strictness: Strictness) -> Self {
        let values = vec![None; schema.len()];
        Self {
            schema,
            strictness,
            values,
        }
    }

    /// Creates a node and assigns fields positionally.
    ///
    /// # Errors
    /// Returns `NodeError` if more values than fields are given or any
    /// assignment fails.
    pub fn from_positional<I>(
        schema: Arc<RecordSchema>,
        strictness: Strictness,
        values: I,
    ) -> Result<Self, NodeError>
    where
        I: IntoIterator<Item = RawValue>,
    {
        let mut node = Self::with_strictness(schema, strictness);
        let mut count = 0;
        for raw in values {
            let name = node
                .schema
                .fields()
                .get(count)
                .map(|f| f.name().to_string())
                .ok_or_else(|| {
                    NodeError::unsupported(
                        node.schema.name(),
                        format!("more than {} positional values", node.schema.len()),
                    )
                })?;
            node.set(&name, raw)?;
            count += 1;
        }
        Ok(node)
    }

    /// Record schema.
    #[must_use]
    pub const fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Record name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Strictness applied to assignments.
    #[must_use]
    pub const fn strictness(&self) -> Strictness {
        self.strictness
    }

    fn locate(&self, name: &str) -> Result<(usize, &FieldDescriptor), NodeError> {
        self.schema
            .position(name)
            .map(|i| (i, &self.schema.fields()[i]))
            .ok_or_else(|| NodeError::UnknownField {
                record: self.schema.name().to_string(),
                field: name.to_string(),
            })
    }

    fn coerce_scalar(&self, field: &FieldDescriptor, raw: &RawValue) -> Result<Value, NodeError> {
        field
            .coerce(raw, self.strictness)
            .map_err(|source| NodeError::Coercion {
                field: field.name().to_string(),
                source,
            })
    }

    fn child_node(&self, schema: &Arc<RecordSchema>, raw: RawValue) -> Result<Node, NodeError> {
        let items = match raw {
            RawValue::List(items) => items,
            other => {
                return Err(NodeError::unsupported(
                    schema.name(),
                    format!("nested records are built from a list, got {}", other.shape()),
                ));
            }
        };
        Node::from_positional(Arc::clone(schema), self.strictness, items)
    }

    /// Assigns a field from a raw value.
    ///
    /// Scalars are coerced. Arrays take a flat list or a list of rows.
    /// Repeated primitive fields take a list (or a single value). Nested
    /// record fields take a list of positional values, and repeated record
    /// fields a list of such lists.
    ///
    /// # Errors
    /// Returns `NodeError` if the field is unknown, the value cannot be
    /// coerced, or its shape does not suit the field's collection mode.
    pub fn set(&mut self, name: &str, raw: impl Into<RawValue>) -> Result<(), NodeError> {
        let raw = raw.into();
        let (index, field) = self.locate(name)?;
        let value = match (field.kind(), field.collection_mode()) {
            (FieldKind::Primitive(_), CollectionMode::Scalar) => {
                FieldValue::Scalar(self.coerce_scalar(field, &raw)?)
            }
            (FieldKind::Primitive(_), CollectionMode::ArrayOfScalars { columns }) => {
                FieldValue::Array(self.coerce_array(field, *columns, raw)?)
            }
            (FieldKind::Primitive(_), CollectionMode::RepeatedChild(_)) => {
                let items = match raw {
                    RawValue::List(items) => items,
                    single => vec![single],
                };
                let values = items
                    .iter()
                    .map(|item| self.coerce_scalar(field, item))
                    .collect::<Result<Vec<_>, _>>()?;
                FieldValue::List(values)
            }
            (FieldKind::Primitive(_), CollectionMode::ParameterMap(_)) => {
                return Err(NodeError::unsupported(
                    name,
                    "parameter maps are assigned with insert_parameter or set_parameters",
                ));
            }
            (FieldKind::Record(schema), CollectionMode::RepeatedChild(_)) => {
                let RawValue::List(items) = raw else {
                    return Err(NodeError::unsupported(name, "expected a list of records"));
                };
                let nodes = items
                    .into_iter()
                    .map(|item| self.child_node(schema, item))
                    .collect::<Result<Vec<_>, _>>()?;
                FieldValue::Records(nodes)
            }
            (FieldKind::Record(schema), _) => {
                FieldValue::Record(Box::new(self.child_node(schema, raw)?))
            }
        };
        self.store(index, value);
        Ok(())
    }

    fn store(&mut self, index: usize, value: FieldValue) {
        self.values[index] = (!value.is_empty_collection()).then_some(value);
    }

    fn slot(&self, index: usize) -> Option<&FieldValue> {
        self.values[index]
            .as_ref()
            .filter(|value| !value.is_empty_collection())
    }

    fn coerce_array(
        &self,
        field: &FieldDescriptor,
        columns: usize,
        raw: RawValue,
    ) -> Result<ArrayValue, NodeError> {
        let RawValue::List(items) = raw else {
            return Err(NodeError::unsupported(field.name(), "arrays take a list"));
        };
        let nested = items.iter().any(|item| matches!(item, RawValue::List(_)));
        let flat: Vec<RawValue> = if nested {
            let mut flat = Vec::with_capacity(items.len() * columns);
            for row in items {
                let row = match row {
                    RawValue::List(row) => row,
                    single => vec![single],
                };
                if row.len() != columns {
                    return Err(NodeError::ShapeMismatch {
                        field: field.name().to_string(),
                        columns,
                        found: row.len(),
                    });
                }
                flat.extend(row);
            }
            flat
        } else {
            items
        };
        let found = flat.len();
        let values = flat
            .iter()
            .map(|item| self.coerce_scalar(field, item))
            .collect::<Result<Vec<_>, _>>()?;
        ArrayValue::new(columns, values).ok_or_else(|| NodeError::ShapeMismatch {
            field: field.name().to_string(),
            columns,
            found,
        })
    }

    /// Assigns an already-typed field value after checking its shape.
    ///
    /// # Errors
    /// Returns `NodeError` if the field is unknown or the value's shape,
    /// element kinds or nested schema do not match the field.
    pub fn put(&mut self, name: &str, value: FieldValue) -> Result<(), NodeError> {
        let (index, field) = self.locate(name)?;
        check_shape(field, &value)?;
        self.store(index, value);
        Ok(())
    }

    /// Assigns a numeric array.
    ///
    /// # Errors
    /// Returns `NodeError` if the field is not an array of this row width or
    /// the values are of the wrong kind.
    pub fn set_array(&mut self, name: &str, array: ArrayValue) -> Result<(), NodeError> {
        self.put(name, FieldValue::Array(array))
    }

    /// Assigns a nested record.
    ///
    /// # Errors
    /// Returns `NodeError::SchemaMismatch` if the node's record type differs
    /// from the field's.
    pub fn set_record(&mut self, name: &str, node: Node) -> Result<(), NodeError> {
        self.put(name, FieldValue::Record(Box::new(node)))
    }

    /// Replaces a repeated record field.
    ///
    /// # Errors
    /// Returns `NodeError` if the field does not hold repeated records of
    /// this type.
    pub fn set_records(&mut self, name: &str, nodes: Vec<Node>) -> Result<(), NodeError> {
        self.put(name, FieldValue::Records(nodes))
    }

    /// Appends a record to a repeated record field.
    ///
    /// # Errors
    /// Returns `NodeError` if the field does not hold repeated records of
    /// this type.
    pub fn push_record(&mut self, name: &str, node: Node) -> Result<(), NodeError> {
        let (index, field) = self.locate(name)?;
        check_shape(field, &FieldValue::Records(Vec::new()))?;
        check_record(field, &node)?;
        match &mut self.values[index] {
            Some(FieldValue::Records(nodes)) => nodes.push(node),
            slot => *slot = Some(FieldValue::Records(vec![node])),
        }
        Ok(())
    }

    /// Appends a value to a repeated primitive field.
    ///
    /// # Errors
    /// Returns `NodeError` if the field is not a repeated primitive or the
    /// value cannot be coerced.
    pub fn push(&mut self, name: &str, raw: impl Into<RawValue>) -> Result<(), NodeError> {
        let (index, field) = self.locate(name)?;
        check_shape(field, &FieldValue::List(Vec::new()))?;
        let value = self.coerce_scalar(field, &raw.into())?;
        match &mut self.values[index] {
            Some(FieldValue::List(values)) => values.push(value),
            slot => *slot = Some(FieldValue::List(vec![value])),
        }
        Ok(())
    }

    /// Inserts one key into a parameter map field.
    ///
    /// # Errors
    /// Returns `NodeError::DuplicateParameter` if the key is already present.
    pub fn insert_parameter(
        &mut self,
        name: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), NodeError> {
        let (index, field) = self.locate(name)?;
        check_shape(field, &FieldValue::Parameters(ParameterMap::new()))?;
        let slot = &mut self.values[index];
        if !matches!(slot, Some(FieldValue::Parameters(_))) {
            *slot = Some(FieldValue::Parameters(ParameterMap::new()));
        }
        if let Some(FieldValue::Parameters(map)) = slot {
            map.insert(key, value)
                .map_err(|key| NodeError::DuplicateParameter {
                    field: name.to_string(),
                    key,
                })?;
        }
        Ok(())
    }

    /// Replaces a parameter map field.
    ///
    /// # Errors
    /// Returns `NodeError` if the field is not a parameter map.
    pub fn set_parameters(&mut self, name: &str, parameters: ParameterMap) -> Result<(), NodeError> {
        self.put(name, FieldValue::Parameters(parameters))
    }

    /// Clears a field, returning its previous content.
    ///
    /// # Errors
    /// Returns `NodeError::UnknownField` if the field does not exist.
    pub fn clear(&mut self, name: &str) -> Result<Option<FieldValue>, NodeError> {
        let (index, _) = self.locate(name)?;
        Ok(self.values[index].take())
    }

    /// Returns a field's content; `None` if absent, unknown or an empty
    /// collection.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema.position(name).and_then(|i| self.slot(i))
    }

    /// Returns a field's content mutably. A collection emptied through this
    /// reference reads as absent afterwards.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.schema
            .position(name)
            .and_then(|i| self.values[i].as_mut())
            .filter(|value| !value.is_empty_collection())
    }

    /// Returns true if the field holds a value.
    #[must_use]
    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns a scalar value.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(FieldValue::as_scalar)
    }

    /// Returns a numeric scalar as a float.
    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(Value::as_f64)
    }

    /// Returns an integer scalar.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(Value::as_i64)
    }

    /// Returns a boolean scalar.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(Value::as_bool)
    }

    /// Returns a text scalar.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    /// Returns a complex scalar.
    #[must_use]
    pub fn complex(&self, name: &str) -> Option<Complex64> {
        self.value(name).and_then(Value::as_complex)
    }

    /// Returns a date/time scalar.
    #[must_use]
    pub fn datetime(&self, name: &str) -> Option<NaiveDateTime> {
        self.value(name).and_then(Value::as_datetime)
    }

    /// Returns a nested record.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&Node> {
        match self.get(name) {
            Some(FieldValue::Record(node)) => Some(node.as_ref()),
            _ => None,
        }
    }

    /// Returns a nested record mutably.
    pub fn record_mut(&mut self, name: &str) -> Option<&mut Node> {
        match self.get_mut(name) {
            Some(FieldValue::Record(node)) => Some(node.as_mut()),
            _ => None,
        }
    }

    /// Returns repeated records; empty if absent.
    #[must_use]
    pub fn records(&self, name: &str) -> &[Node] {
        match self.get(name) {
            Some(FieldValue::Records(nodes)) => nodes,
            _ => &[],
        }
    }

    /// Returns repeated primitive values; empty if absent.
    #[must_use]
    pub fn list(&self, name: &str) -> &[Value] {
        match self.get(name) {
            Some(FieldValue::List(values)) => values,
            _ => &[],
        }
    }

    /// Returns a numeric array.
    #[must_use]
    pub fn array(&self, name: &str) -> Option<&ArrayValue> {
        match self.get(name) {
            Some(FieldValue::Array(array)) => Some(array),
            _ => None,
        }
    }

    /// Returns a parameter map.
    #[must_use]
    pub fn parameters(&self, name: &str) -> Option<&ParameterMap> {
        match self.get(name) {
            Some(FieldValue::Parameters(map)) => Some(map),
            _ => None,
        }
    }

    /// Iterates over present fields in declaration order.
    pub fn present(&self) -> impl Iterator<Item = (&FieldDescriptor, &FieldValue)> {
        self.schema
            .fields()
            .iter()
            .enumerate()
            .filter_map(|(i, field)| self.slot(i).map(|v| (field, v)))
    }

    /// Mutable access to field slots in declaration order.
    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = (&FieldDescriptor, &mut Option<FieldValue>)> {
        self.schema.fields().iter().zip(self.values.iter_mut())
    }

    /// Resolves a dotted path through nested records, e.g. `TxFrequencyProc.MinProc`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&FieldValue> {
        match path.split_once('.') {
            Some((head, rest)) => self.record(head)?.lookup(rest),
            None => self.get(path),
        }
    }

    /// Assigns a dotted path, creating absent intermediate records.
    ///
    /// # Errors
    /// Returns `NodeError` if a path segment is unknown or not a nested
    /// record, or the final assignment fails.
    pub fn set_path(&mut self, path: &str, raw: impl Into<RawValue>) -> Result<(), NodeError> {
        let Some((head, rest)) = path.split_once('.') else {
            return self.set(path, raw);
        };
        if self.record(head).is_none() {
            let (_, field) = self.locate(head)?;
            let FieldKind::Record(schema) = field.kind() else {
                return Err(NodeError::unsupported(head, "path segment is not a record"));
            };
            let child = Node::with_strictness(Arc::clone(schema), self.strictness);
            self.set_record(head, child)?;
        }
        match self.record_mut(head) {
            Some(child) => child.set_path(rest, raw),
            None => Err(NodeError::unsupported(head, "path segment is not a record")),
        }
    }

    /// Validates this node and every nested node.
    #[must_use]
    pub fn validate(&self) -> Vec<Violation> {
        validate(self)
    }

    /// Returns true if validation reports no violations.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Runs a named derivation hook of this node's record type.
    ///
    /// # Errors
    /// Returns `NodeError::UnknownHook` if no such hook is registered, or the
    /// hook's own error.
    pub fn derive(&mut self, hook: &str, input: &DerivationInput<'_>) -> Result<(), NodeError> {
        let hook = self
            .schema
            .hook(hook)
            .cloned()
            .ok_or_else(|| NodeError::UnknownHook {
                record: self.schema.name().to_string(),
                hook: hook.to_string(),
            })?;
        hook.apply(self, input)
    }
}

fn check_record(field: &FieldDescriptor, node: &Node) -> Result<(), NodeError> {
    match field.kind() {
        FieldKind::Record(schema) if schema.same_record(node.schema()) => Ok(()),
        FieldKind::Record(schema) => Err(NodeError::SchemaMismatch {
            field: field.name().to_string(),
            expected: schema.name().to_string(),
            found: node.name().to_string(),
        }),
        FieldKind::Primitive(_) => Err(NodeError::unsupported(
            field.name(),
            "primitive field cannot hold a record",
        )),
    }
}

fn check_values(field: &FieldDescriptor, values: &[Value]) -> Result<(), NodeError> {
    let Some(kind) = field.kind().primitive() else {
        return Err(NodeError::unsupported(field.name(), "record field cannot hold values"));
    };
    for value in values {
        let found = value.kind();
        let compatible = found == kind
            || matches!(
                (kind, found),
                (
                    sarmeta_core::PrimitiveKind::EnumString,
                    sarmeta_core::PrimitiveKind::String
                )
            );
        if !compatible {
            return Err(NodeError::Coercion {
                field: field.name().to_string(),
                source: sarmeta_core::CoercionError::mismatch(kind, found.name()),
            });
        }
    }
    Ok(())
}

fn check_shape(field: &FieldDescriptor, value: &FieldValue) -> Result<(), NodeError> {
    let mismatch = || {
        NodeError::unsupported(
            field.name(),
            format!(
                "{} does not suit collection mode {:?}",
                value.shape(),
                field.collection_mode()
            ),
        )
    };
    match (field.kind(), field.collection_mode(), value) {
        (FieldKind::Primitive(_), CollectionMode::Scalar, FieldValue::Scalar(v)) => {
            check_values(field, std::slice::from_ref(v))
        }
        (
            FieldKind::Primitive(_),
            CollectionMode::ArrayOfScalars { columns },
            FieldValue::Array(array),
        ) => {
            if array.columns() != *columns {
                return Err(NodeError::ShapeMismatch {
                    field: field.name().to_string(),
                    columns: *columns,
                    found: array.columns(),
                });
            }
            check_values(field, array.values())
        }
        (FieldKind::Primitive(_), CollectionMode::RepeatedChild(_), FieldValue::List(values)) => {
            check_values(field, values)
        }
        (FieldKind::Primitive(_), CollectionMode::ParameterMap(_), FieldValue::Parameters(_)) => {
            Ok(())
        }
        (FieldKind::Record(_), CollectionMode::RepeatedChild(_), FieldValue::Records(nodes)) => {
            nodes.iter().try_for_each(|node| check_record(field, node))
        }
        (FieldKind::Record(_), CollectionMode::Scalar, FieldValue::Record(node)) => {
            check_record(field, node)
        }
        _ => Err(mismatch()),
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.schema.same_record(&other.schema)
            && self.values.len() == other.values.len()
            && (0..self.values.len()).all(|i| self.slot(i) == other.slot(i))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.schema.name())?;
        f.debug_map()
            .entries(self.present().map(|(field, value)| (field.name(), value)))
            .finish()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (field, value) in self.present() {
            map.serialize_entry(field.name(), value)?;
        }
        map.end()
    }
}

impl Serialize for ArrayValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.columns == 1 {
            return self.values.serialize(serializer);
        }
        let mut seq = serializer.serialize_seq(Some(self.rows()))?;
        for row in self.iter_rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(value) => value.serialize(serializer),
            Self::Array(array) => array.serialize(serializer),
            Self::List(values) => values.serialize(serializer),
            Self::Record(node) => node.serialize(serializer),
            Self::Records(nodes) => nodes.serialize(serializer),
            Self::Parameters(map) => map.serialize(serializer),
        }
    }
}

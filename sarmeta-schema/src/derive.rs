//! Derivation hooks.
//!
//! A record schema may register named hooks that fill or adjust fields from
//! context the record itself does not hold: a sibling record or a reference
//! frequency.

use crate::error::NodeError;
use crate::node::{FieldValue, Node};
use sarmeta_core::{RawValue, Value};

/// Context handed to a derivation hook.
#[derive(Debug, Clone, Copy)]
pub enum DerivationInput<'a> {
    /// A sibling record to copy defaults from.
    Sibling(&'a Node),
    /// A reference frequency offset, in Hz.
    ReferenceOffset(f64),
}

/// A named derivation procedure registered on a record schema.
pub trait DerivationHook: Send + Sync {
    /// Hook name used for lookup.
    fn name(&self) -> &str;

    /// Applies the hook to `node`.
    ///
    /// # Errors
    /// Returns `NodeError` if the input is of the wrong kind or an assignment
    /// fails.
    fn apply(&self, node: &mut Node, input: &DerivationInput<'_>) -> Result<(), NodeError>;
}

/// Copies values from a sibling record into absent fields.
///
/// Each mapping pairs a dotted target path with a dotted source path in the
/// sibling. Nothing happens unless every source value is present, and
/// present targets are never overwritten, so applying twice is a no-op.
#[derive(Debug, Clone)]
pub struct DefaultFromSibling {
    name: String,
    mappings: Vec<(String, String)>,
}

impl DefaultFromSibling {
    /// Creates the hook.
    pub fn new<I, T, S>(name: impl Into<String>, mappings: I) -> Self
    where
        I: IntoIterator<Item = (T, S)>,
        T: Into<String>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            mappings: mappings
                .into_iter()
                .map(|(t, s)| (t.into(), s.into()))
                .collect(),
        }
    }
}

impl DerivationHook for DefaultFromSibling {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, node: &mut Node, input: &DerivationInput<'_>) -> Result<(), NodeError> {
        let DerivationInput::Sibling(sibling) = input else {
            return Err(NodeError::DerivationInput {
                hook: self.name.clone(),
                expected: "a sibling record",
            });
        };

        let mut sources = Vec::with_capacity(self.mappings.len());
        for (_, source) in &self.mappings {
            match sibling.lookup(source).and_then(FieldValue::as_scalar) {
                Some(value) => sources.push(value.clone()),
                None => {
                    tracing::debug!(
                        "{}: sibling {} lacks {}, nothing derived",
                        self.name,
                        sibling.name(),
                        source
                    );
                    return Ok(());
                }
            }
        }

        for ((target, _), value) in self.mappings.iter().zip(sources) {
            if node.lookup(target).is_none() {
                node.set_path(target, RawValue::from(value))?;
            }
        }
        Ok(())
    }
}

/// Adds a reference offset to every frequency-relative field, recursively.
///
/// Absent fields stay absent.
#[derive(Debug, Clone)]
pub struct ReferenceShift {
    name: String,
}

impl ReferenceShift {
    /// Creates the hook.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

fn shift_value(value: &mut Value, offset: f64) {
    if let Value::Float(v) = value {
        *v += offset;
    }
}

fn shift_node(node: &mut Node, offset: f64) {
    for (field, slot) in node.slots_mut() {
        let Some(content) = slot else {
            continue;
        };
        match content {
            FieldValue::Scalar(value) if field.is_frequency_relative() => {
                shift_value(value, offset);
            }
            FieldValue::List(values) if field.is_frequency_relative() => {
                values.iter_mut().for_each(|v| shift_value(v, offset));
            }
            FieldValue::Array(array) if field.is_frequency_relative() => {
                array
                    .values_mut()
                    .iter_mut()
                    .for_each(|v| shift_value(v, offset));
            }
            FieldValue::Record(child) => shift_node(child, offset),
            FieldValue::Records(children) => {
                children.iter_mut().for_each(|c| shift_node(c, offset));
            }
            _ => {}
        }
    }
}

impl DerivationHook for ReferenceShift {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, node: &mut Node, input: &DerivationInput<'_>) -> Result<(), NodeError> {
        let DerivationInput::ReferenceOffset(offset) = input else {
            return Err(NodeError::DerivationInput {
                hook: self.name.clone(),
                expected: "a reference offset",
            });
        };
        shift_node(node, *offset);
        Ok(())
    }
}

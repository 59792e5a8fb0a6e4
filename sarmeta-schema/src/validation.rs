//! Structural and semantic validation of node graphs.
//!
//! Validation never fails: it collects every [`Violation`] it finds.
//! Required fields are checked first, then enumerated values, then the
//! record's cross-field predicates, then nested records depth-first.

use crate::descriptor::FieldDescriptor;
use crate::node::{FieldValue, Node};
use sarmeta_core::Value;
use std::cmp::Ordering;
use std::fmt;

/// A validation finding.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A required field is absent.
    MissingRequiredField {
        /// Dotted path of the field.
        path: String,
    },
    /// An enumerated field holds a value outside its set.
    EnumViolation {
        /// Dotted path of the field.
        path: String,
        /// Offending value.
        value: String,
        /// Allowed values.
        allowed: Vec<String>,
    },
    /// A cross-field predicate does not hold.
    CrossFieldViolation {
        /// Dotted path of the record.
        path: String,
        /// Rule description.
        rule: String,
        /// First field and its value.
        first: (String, Value),
        /// Second field and its value.
        second: (String, Value),
    },
}

impl Violation {
    /// Dotted path the violation refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingRequiredField { path }
            | Self::EnumViolation { path, .. }
            | Self::CrossFieldViolation { path, .. } => path,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredField { path } => {
                write!(f, "required field {path} is not populated")
            }
            Self::EnumViolation {
                path,
                value,
                allowed,
            } => write!(f, "{path} holds '{value}', expected one of {allowed:?}"),
            Self::CrossFieldViolation {
                path,
                rule,
                first,
                second,
            } => {
                let at = if path.is_empty() { "" } else { " in " };
                write!(
                    f,
                    "{rule}{at}{path}: {}={} and {}={}",
                    first.0, first.1, second.0, second.1
                )
            }
        }
    }
}

/// A cross-field constraint declared by a record schema.
pub trait Predicate: Send + Sync {
    /// Names of the fields the predicate reads.
    fn fields(&self) -> Vec<&str>;

    /// Evaluates the predicate, returning a violation when it does not hold.
    ///
    /// Predicates over absent fields hold.
    fn check(&self, node: &Node, path: &str) -> Option<Violation>;
}

/// Requires `lower <= upper` when both fields are present.
#[derive(Debug, Clone)]
pub struct OrderedFields {
    lower: String,
    upper: String,
}

impl OrderedFields {
    /// Creates the predicate.
    pub fn new(lower: impl Into<String>, upper: impl Into<String>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
        }
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::DateTime(x), Value::DateTime(y)) => Some(x.cmp(y)),
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

impl Predicate for OrderedFields {
    fn fields(&self) -> Vec<&str> {
        vec![self.lower.as_str(), self.upper.as_str()]
    }

    fn check(&self, node: &Node, path: &str) -> Option<Violation> {
        let lower = node.value(&self.lower)?;
        let upper = node.value(&self.upper)?;
        if compare(lower, upper) == Some(Ordering::Greater) {
            return Some(Violation::CrossFieldViolation {
                path: path.to_string(),
                rule: format!("{} must not exceed {}", self.lower, self.upper),
                first: (self.lower.clone(), lower.clone()),
                second: (self.upper.clone(), upper.clone()),
            });
        }
        None
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn check_enum(field: &FieldDescriptor, value: &Value, path: String, out: &mut Vec<Violation>) {
    if field.accepts_enum(value) {
        return;
    }
    let allowed = field
        .enum_values()
        .map(|v| v.values().to_vec())
        .unwrap_or_default();
    out.push(Violation::EnumViolation {
        path,
        value: value.to_string(),
        allowed,
    });
}

fn validate_into(node: &Node, path: &str, out: &mut Vec<Violation>) {
    for field in node.schema().fields() {
        if field.is_required() && !node.is_present(field.name()) {
            out.push(Violation::MissingRequiredField {
                path: join(path, field.name()),
            });
        }
    }

    for (field, value) in node.present() {
        match value {
            FieldValue::Scalar(v) => check_enum(field, v, join(path, field.name()), out),
            FieldValue::List(values) => {
                for (i, v) in values.iter().enumerate() {
                    check_enum(field, v, format!("{}[{i}]", join(path, field.name())), out);
                }
            }
            _ => {}
        }
    }

    for predicate in node.schema().predicates() {
        if let Some(violation) = predicate.check(node, path) {
            out.push(violation);
        }
    }

    for (field, value) in node.present() {
        match value {
            FieldValue::Record(child) => validate_into(child, &join(path, field.name()), out),
            FieldValue::Records(children) => {
                for (i, child) in children.iter().enumerate() {
                    let child_path = format!("{}[{i}]", join(path, field.name()));
                    validate_into(child, &child_path, out);
                }
            }
            _ => {}
        }
    }
}

/// Validates a node and everything beneath it.
///
/// Paths are relative to `node`: top-level fields appear by name, nested
/// fields as `Parent.Child`, repeated records as `Parent[i].Child`.
#[must_use]
pub fn validate(node: &Node) -> Vec<Violation> {
    let mut out = Vec::new();
    validate_into(node, "", &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CollectionMode, FieldDescriptor};
    use crate::record::RecordSchema;
    use sarmeta_core::EnumValues;
    use std::sync::Arc;

    fn inner() -> Arc<RecordSchema> {
        RecordSchema::builder("Inner")
            .field(FieldDescriptor::float("Low"))
            .field(FieldDescriptor::float("High"))
            .required(["Low"])
            .predicate(OrderedFields::new("Low", "High"))
            .build()
            .expect("Failed to build schema")
    }

    fn outer() -> Arc<RecordSchema> {
        RecordSchema::builder("Outer")
            .field(FieldDescriptor::float("Start"))
            .field(FieldDescriptor::float("End"))
            .field(FieldDescriptor::enumeration("Mode", EnumValues::new(["A", "B"])))
            .field(FieldDescriptor::record("Inner", inner()))
            .field(FieldDescriptor::record("Item", inner()))
            .required(["Start", "End"])
            .collection("Item", CollectionMode::RepeatedChild("Item".into()))
            .predicate(OrderedFields::new("Start", "End"))
            .build()
            .expect("Failed to build schema")
    }

    #[test]
    fn test_missing_required() {
        let node = Node::new(outer());
        let violations = node.validate();
        assert_eq!(
            violations,
            vec![
                Violation::MissingRequiredField {
                    path: "Start".into()
                },
                Violation::MissingRequiredField { path: "End".into() },
            ]
        );
        assert!(!node.is_valid());
    }

    #[test]
    fn test_ordering_violation_reported_once() {
        let mut node = Node::new(outer());
        node.set("Start", 5.0).expect("Failed to set");
        node.set("End", 3.0).expect("Failed to set");
        let violations = node.validate();
        assert_eq!(violations.len(), 1);
        let Violation::CrossFieldViolation { first, second, .. } = &violations[0] else {
            panic!("unexpected violation {:?}", violations[0]);
        };
        assert_eq!(first, &("Start".to_string(), Value::Float(5.0)));
        assert_eq!(second, &("End".to_string(), Value::Float(3.0)));
    }

    #[test]
    fn test_ordering_holds_when_equal() {
        let mut node = Node::new(outer());
        node.set("Start", 3.0).expect("Failed to set");
        node.set("End", 3.0).expect("Failed to set");
        assert!(node.is_valid());
    }

    #[test]
    fn test_enum_violation_lenient() {
        let mut node = Node::new(outer());
        node.set("Start", 1.0).expect("Failed to set");
        node.set("End", 2.0).expect("Failed to set");
        node.set("Mode", "C").expect("Failed to set leniently");
        let violations = node.validate();
        assert!(matches!(
            violations.as_slice(),
            [Violation::EnumViolation { path, value, .. }] if path == "Mode" && value == "C"
        ));
    }

    #[test]
    fn test_nested_paths() {
        let mut node = Node::new(outer());
        node.set("Start", 1.0).expect("Failed to set");
        node.set("End", 2.0).expect("Failed to set");
        node.set_record("Inner", Node::new(inner()))
            .expect("Failed to set record");
        let mut item = Node::new(inner());
        item.set("Low", 4.0).expect("Failed to set");
        item.set("High", 1.0).expect("Failed to set");
        node.push_record("Item", item).expect("Failed to push");
        let paths: Vec<String> = node
            .validate()
            .iter()
            .map(|v| v.path().to_string())
            .collect();
        assert_eq!(paths, vec!["Inner.Low".to_string(), "Item[0]".to_string()]);
    }

    #[test]
    fn test_display() {
        let violation = Violation::MissingRequiredField {
            path: "A.B".into(),
        };
        assert_eq!(violation.to_string(), "required field A.B is not populated");
    }
}

//! # sarmeta Schema
//!
//! Record schemas and the object graph built from them.
//!
//! This crate provides:
//! - [`FieldDescriptor`] and [`RecordSchema`], the declarative record tables
//! - [`Node`], a record instance with typed, coerced field slots
//! - Validation producing [`Violation`]s, with cross-field [`Predicate`]s
//! - Named [`DerivationHook`]s filling fields from sibling records
//! - [`BinaryLayout`], the fixed-width wire layout of extension records

pub mod derive;
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod node;
pub mod params;
pub mod record;
pub mod validation;

pub use derive::{DefaultFromSibling, DerivationHook, DerivationInput, ReferenceShift};
pub use descriptor::{CollectionMode, FieldDescriptor, FieldKind};
pub use error::{NodeError, SchemaError};
pub use layout::{BinaryField, BinaryLayout, BinaryLayoutBuilder, FieldEncoding};
pub use node::{ArrayValue, FieldValue, Node, Strictness};
pub use params::ParameterMap;
pub use record::{RecordSchema, RecordSchemaBuilder};
pub use validation::{OrderedFields, Predicate, Violation, validate};

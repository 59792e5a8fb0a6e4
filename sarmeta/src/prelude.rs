//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use sarmeta::prelude::*;
//! ```

// Core types
pub use sarmeta_core::{
    CoercionError, Complex64, EnumValues, IntegerRange, NumericFormat, PrimitiveKind, RawValue,
    Value,
};

// Schema types
pub use sarmeta_schema::{
    ArrayValue, BinaryLayout, CollectionMode, DerivationHook, DerivationInput, FieldDescriptor,
    FieldValue, Node, NodeError, ParameterMap, Predicate, RecordSchema, SchemaError, Strictness,
    Violation,
};

// XML codec
pub use sarmeta_xml::{Decoded, Diagnostic, XmlCodec, XmlError, XmlOptions};

// Fixed-width codec
pub use sarmeta_tre::{
    DecodedExtension, EncodedRecord, TreError, TreExtension, TreOptions, TreRegistry,
    decode_record, encode_record, parse_extensions,
};

// Record definitions
pub use sarmeta_records::{SICD_NAMESPACE, SIDD_NAMESPACE};

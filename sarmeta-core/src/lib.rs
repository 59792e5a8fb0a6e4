//! # sarmeta Core
//!
//! Primitive values and the type-coercion layer shared by every sarmeta codec.
//!
//! This crate provides:
//! - [`PrimitiveKind`] and the coerced [`Value`] representation
//! - [`RawValue`], the sum type of every accepted input shape, and [`coerce`]
//! - Numeric output formatting driven by format specifiers such as `0.16G`
//! - Fixed-width byte cursors used by the binary record codec
//! - Error types for coercion and buffer operations

pub mod buffer;
pub mod error;
pub mod format;
pub mod types;
pub mod value;

pub use buffer::{FixedWidthReader, FixedWidthWriter, Justify};
pub use error::{CoercionError, Error, Result};
pub use format::{
    DATETIME_FORMAT, FormatType, NumericFormat, format_component, format_float, format_value,
};
pub use types::{EnumValues, IntegerRange, PrimitiveKind};
pub use value::{RawValue, Value, coerce, parse_datetime};

/// Complex number type used for complex-valued fields.
pub type Complex64 = num_complex::Complex64;

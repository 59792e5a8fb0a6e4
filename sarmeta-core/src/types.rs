//! Primitive kind definitions and per-field constraints.
//!
//! This module maps the primitive kinds a metadata field may declare onto the
//! constraints the coercion layer enforces for them.

use crate::error::CoercionError;

/// Primitive kind of a metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Signed integer.
    Integer,
    /// Double precision float.
    Float,
    /// Boolean.
    Boolean,
    /// Complex number with real and imaginary components.
    Complex,
    /// Date/time, normalized to UTC with microsecond resolution.
    DateTime,
    /// Free text.
    String,
    /// Text restricted to an enumerated value set.
    EnumString,
}

impl PrimitiveKind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Complex => "complex",
            Self::DateTime => "datetime",
            Self::String => "string",
            Self::EnumString => "enum string",
        }
    }

    /// Returns true for integer and float kinds.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Returns true for string and enumerated string kinds.
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::EnumString)
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive integer range a field may opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerRange {
    /// Inclusive lower bound.
    pub min: i64,
    /// Inclusive upper bound.
    pub max: i64,
}

impl IntegerRange {
    /// Creates a new range.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Range of an unsigned 8-bit value.
    pub const U8: Self = Self::new(0, u8::MAX as i64);

    /// Range of an unsigned 16-bit value.
    pub const U16: Self = Self::new(0, u16::MAX as i64);

    /// Checks that `value` lies within the range.
    ///
    /// # Errors
    /// Returns `CoercionError::OutOfRange` when the value is outside.
    pub fn check(&self, value: i64) -> Result<i64, CoercionError> {
        if value < self.min || value > self.max {
            return Err(CoercionError::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }
}

/// Enumerated value set of an [`PrimitiveKind::EnumString`] field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValues {
    values: Vec<String>,
    case_sensitive: bool,
}

impl EnumValues {
    /// Creates a case-sensitive value set.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            case_sensitive: true,
        }
    }

    /// Makes membership checks ignore ASCII case.
    ///
    /// Matching values are stored with the spelling declared in the set.
    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Returns the declared values.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns true if no values are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if membership checks respect case.
    #[must_use]
    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Looks up the canonical spelling of `value`.
    #[must_use]
    pub fn find(&self, value: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| {
                if self.case_sensitive {
                    v.as_str() == value
                } else {
                    v.eq_ignore_ascii_case(value)
                }
            })
            .map(String::as_str)
    }

    /// Returns true if `value` belongs to the set.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.find(value).is_some()
    }

    /// Checks membership and returns the canonical spelling.
    ///
    /// # Errors
    /// Returns `CoercionError::EnumViolation` if `value` is not a member.
    pub fn check(&self, value: &str) -> Result<String, CoercionError> {
        self.find(value)
            .map(str::to_string)
            .ok_or_else(|| CoercionError::EnumViolation {
                value: value.to_string(),
                allowed: self.values.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(PrimitiveKind::Float.name(), "float");
        assert_eq!(PrimitiveKind::EnumString.to_string(), "enum string");
        assert!(PrimitiveKind::Integer.is_numeric());
        assert!(!PrimitiveKind::Complex.is_numeric());
        assert!(PrimitiveKind::EnumString.is_textual());
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(IntegerRange::U8.check(255), Ok(255));
        assert!(matches!(
            IntegerRange::U8.check(256),
            Err(CoercionError::OutOfRange { max: 255, .. })
        ));
        assert!(IntegerRange::U16.check(-1).is_err());
    }

    #[test]
    fn test_enum_values_case_sensitive() {
        let values = EnumValues::new(["PFA", "RMA"]);
        assert!(values.contains("PFA"));
        assert!(!values.contains("pfa"));
        assert!(values.check("OTHER").is_err());
    }

    #[test]
    fn test_enum_values_case_insensitive() {
        let values = EnumValues::new(["NO", "GLOBAL", "SV"]).case_insensitive();
        assert_eq!(values.check("global").expect("Failed to match"), "GLOBAL");
        assert!(!values.is_case_sensitive());
    }
}

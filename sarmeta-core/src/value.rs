//! Coerced values and the type-coercion layer.
//!
//! [`RawValue`] enumerates every input shape a field assignment accepts.
//! [`coerce`] turns a raw value into a [`Value`] of the requested
//! [`PrimitiveKind`] or fails with a [`CoercionError`]. Coercion is pure.

use crate::Complex64;
use crate::error::CoercionError;
use crate::format::{DATETIME_FORMAT, format_value};
use crate::types::PrimitiveKind;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde::{Serialize, Serializer};

/// A coerced, typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Complex value.
    Complex(Complex64),
    /// UTC timestamp, truncated to microseconds.
    DateTime(NaiveDateTime),
    /// Text value (plain or enumerated).
    Str(String),
}

impl Value {
    /// Returns the primitive kind this value was coerced to.
    ///
    /// Text values report [`PrimitiveKind::String`] even when they belong to
    /// an enumerated field.
    #[must_use]
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Int(_) => PrimitiveKind::Integer,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Bool(_) => PrimitiveKind::Boolean,
            Self::Complex(_) => PrimitiveKind::Complex,
            Self::DateTime(_) => PrimitiveKind::DateTime,
            Self::Str(_) => PrimitiveKind::String,
        }
    }

    /// Returns the value as `f64` for integer and float values.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer value.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the complex value.
    #[must_use]
    pub const fn as_complex(&self) -> Option<Complex64> {
        match self {
            Self::Complex(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the timestamp.
    #[must_use]
    pub const fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_value(self, None))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Complex(c) => (c.re, c.im).serialize(serializer),
            Self::DateTime(dt) => serializer.collect_str(&dt.format(DATETIME_FORMAT)),
            Self::Str(s) => serializer.serialize_str(s),
        }
    }
}

/// Raw input accepted by a field assignment.
///
/// Every shape a caller may hand to a setter is listed explicitly; which ones
/// a given kind accepts is decided by [`coerce`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Text, parsed according to the target kind.
    Text(String),
    /// Complex number.
    Complex(Complex64),
    /// Pair of reals, read as `(real, imaginary)` by complex fields.
    Pair(f64, f64),
    /// Calendar date, taken as midnight UTC.
    Date(NaiveDate),
    /// Naive date/time, taken as UTC.
    DateTime(NaiveDateTime),
    /// Timezone-aware UTC timestamp.
    UtcDateTime(DateTime<Utc>),
    /// Sequence of raw values.
    List(Vec<RawValue>),
}

impl RawValue {
    /// Returns a short description of the input shape.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::UInt(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Text(_) => "text",
            Self::Complex(_) => "complex",
            Self::Pair(..) => "pair",
            Self::Date(_) => "date",
            Self::DateTime(_) | Self::UtcDateTime(_) => "datetime",
            Self::List(_) => "list",
        }
    }
}

impl From<&Value> for RawValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Int(v) => Self::Int(*v),
            Value::Float(v) => Self::Float(*v),
            Value::Bool(v) => Self::Bool(*v),
            Value::Complex(v) => Self::Complex(*v),
            Value::DateTime(v) => Self::DateTime(*v),
            Value::Str(v) => Self::Text(v.clone()),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

macro_rules! raw_from {
    ($variant:ident, $conv:ty => $($t:ty),+) => {
        $(
            impl From<$t> for RawValue {
                fn from(value: $t) -> Self {
                    Self::$variant(<$conv>::from(value))
                }
            }
        )+
    };
}

raw_from!(Int, i64 => i8, i16, i32, i64, u8, u16, u32);
raw_from!(Float, f64 => f32, f64);

impl From<u64> for RawValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<usize> for RawValue {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for RawValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Complex64> for RawValue {
    fn from(value: Complex64) -> Self {
        Self::Complex(value)
    }
}

impl From<(f64, f64)> for RawValue {
    fn from((re, im): (f64, f64)) -> Self {
        Self::Pair(re, im)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::UtcDateTime(value)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue> + Copy, const N: usize> From<[T; N]> for RawValue {
    fn from(value: [T; N]) -> Self {
        Self::List(value.iter().map(|v| (*v).into()).collect())
    }
}

/// Coerces a raw input into a value of the given kind.
///
/// Enumerated strings are coerced like plain strings here; set membership is
/// checked by the field descriptor that owns the value set.
///
/// # Errors
/// Returns `CoercionError` if the input shape is not accepted or its text
/// cannot be parsed.
pub fn coerce(kind: PrimitiveKind, raw: &RawValue) -> Result<Value, CoercionError> {
    match kind {
        PrimitiveKind::Integer => coerce_integer(raw).map(Value::Int),
        PrimitiveKind::Float => coerce_float(raw).map(Value::Float),
        PrimitiveKind::Boolean => coerce_bool(raw).map(Value::Bool),
        PrimitiveKind::Complex => coerce_complex(raw).map(Value::Complex),
        PrimitiveKind::DateTime => coerce_datetime(raw).map(Value::DateTime),
        PrimitiveKind::String | PrimitiveKind::EnumString => coerce_string(kind, raw).map(Value::Str),
    }
}

fn coerce_integer(raw: &RawValue) -> Result<i64, CoercionError> {
    let kind = PrimitiveKind::Integer;
    match raw {
        RawValue::Int(v) => Ok(*v),
        RawValue::UInt(v) => i64::try_from(*v).map_err(|_| out_of_i64(1.0)),
        // truncates toward zero
        RawValue::Float(v) if v.is_finite() => float_to_integer(*v),
        RawValue::Bool(v) => Ok(i64::from(*v)),
        RawValue::Text(text) => {
            let trimmed = text.trim();
            if let Ok(v) = trimmed.parse::<i64>() {
                return Ok(v);
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() && f.fract() == 0.0 => float_to_integer(f),
                _ => Err(CoercionError::invalid_text(kind, text.as_str())),
            }
        }
        other => Err(CoercionError::mismatch(kind, other.shape())),
    }
}

/// Converts a finite float to an integer, truncating toward zero.
fn float_to_integer(v: f64) -> Result<i64, CoercionError> {
    // 2^63, the first float above the i64 range
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let truncated = v.trunc();
    if (-LIMIT..LIMIT).contains(&truncated) {
        Ok(truncated as i64)
    } else {
        Err(out_of_i64(v))
    }
}

/// Out-of-range error for a value beyond `i64`, reported at the bound it
/// exceeds.
fn out_of_i64(sign: f64) -> CoercionError {
    CoercionError::OutOfRange {
        value: if sign < 0.0 { i64::MIN } else { i64::MAX },
        min: i64::MIN,
        max: i64::MAX,
    }
}

fn coerce_float(raw: &RawValue) -> Result<f64, CoercionError> {
    let kind = PrimitiveKind::Float;
    match raw {
        RawValue::Int(v) => Ok(*v as f64),
        RawValue::UInt(v) => Ok(*v as f64),
        RawValue::Float(v) => Ok(*v),
        RawValue::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| CoercionError::invalid_text(kind, text.as_str())),
        other => Err(CoercionError::mismatch(kind, other.shape())),
    }
}

fn coerce_bool(raw: &RawValue) -> Result<bool, CoercionError> {
    let kind = PrimitiveKind::Boolean;
    match raw {
        RawValue::Bool(v) => Ok(*v),
        RawValue::Int(0) | RawValue::UInt(0) => Ok(false),
        RawValue::Int(1) | RawValue::UInt(1) => Ok(true),
        RawValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(CoercionError::invalid_text(kind, text.as_str())),
        },
        RawValue::Int(v) => Err(CoercionError::invalid_text(kind, v.to_string())),
        RawValue::UInt(v) => Err(CoercionError::invalid_text(kind, v.to_string())),
        other => Err(CoercionError::mismatch(kind, other.shape())),
    }
}

fn coerce_complex(raw: &RawValue) -> Result<Complex64, CoercionError> {
    let kind = PrimitiveKind::Complex;
    match raw {
        RawValue::Complex(c) => Ok(*c),
        RawValue::Pair(re, im) => Ok(Complex64::new(*re, *im)),
        RawValue::Int(_) | RawValue::UInt(_) | RawValue::Float(_) => {
            Ok(Complex64::new(coerce_float(raw)?, 0.0))
        }
        RawValue::List(items) if items.len() == 2 => Ok(Complex64::new(
            coerce_float(&items[0])?,
            coerce_float(&items[1])?,
        )),
        RawValue::Text(text) => parse_complex(text)
            .ok_or_else(|| CoercionError::invalid_text(kind, text.as_str())),
        other => Err(CoercionError::mismatch(kind, other.shape())),
    }
}

/// Parses `re,im`, `a+bj`, `a+bi` or a bare real.
fn parse_complex(text: &str) -> Option<Complex64> {
    let trimmed = text.trim();
    if let Some((re, im)) = trimmed.split_once(',') {
        return Some(Complex64::new(
            re.trim().parse().ok()?,
            im.trim().parse().ok()?,
        ));
    }
    trimmed.replace('j', "i").parse::<Complex64>().ok()
}

fn coerce_datetime(raw: &RawValue) -> Result<NaiveDateTime, CoercionError> {
    let kind = PrimitiveKind::DateTime;
    let value = match raw {
        RawValue::DateTime(dt) => *dt,
        RawValue::UtcDateTime(dt) => dt.naive_utc(),
        RawValue::Date(d) => d
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| CoercionError::mismatch(kind, "date"))?,
        RawValue::Text(text) => {
            parse_datetime(text).ok_or_else(|| CoercionError::invalid_text(kind, text.as_str()))?
        }
        other => return Err(CoercionError::mismatch(kind, other.shape())),
    };
    Ok(value.trunc_subsecs(6))
}

/// Parses an ISO-8601 date or date/time, normalizing offsets to UTC.
#[must_use]
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn coerce_string(kind: PrimitiveKind, raw: &RawValue) -> Result<String, CoercionError> {
    match raw {
        RawValue::Text(text) => Ok(text.clone()),
        RawValue::Int(v) => Ok(v.to_string()),
        RawValue::UInt(v) => Ok(v.to_string()),
        RawValue::Float(v) => Ok(format_value(&Value::Float(*v), None)),
        RawValue::Bool(v) => Ok(v.to_string()),
        other => Err(CoercionError::mismatch(kind, other.shape())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_coerce_integer_shapes() {
        assert_eq!(coerce(PrimitiveKind::Integer, &5i32.into()), Ok(Value::Int(5)));
        assert_eq!(coerce(PrimitiveKind::Integer, &" 42 ".into()), Ok(Value::Int(42)));
        assert_eq!(coerce(PrimitiveKind::Integer, &"7.0".into()), Ok(Value::Int(7)));
        assert_eq!(coerce(PrimitiveKind::Integer, &2.9f64.into()), Ok(Value::Int(2)));
        assert!(matches!(
            coerce(PrimitiveKind::Integer, &"seven".into()),
            Err(CoercionError::InvalidText { .. })
        ));
        assert!(matches!(
            coerce(PrimitiveKind::Integer, &RawValue::Pair(1.0, 2.0)),
            Err(CoercionError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_coerce_integer_bounds() {
        let out_of_range = |raw: RawValue| {
            matches!(
                coerce(PrimitiveKind::Integer, &raw),
                Err(CoercionError::OutOfRange { .. })
            )
        };
        assert!(out_of_range("1e30".into()));
        assert!(out_of_range((-1e30).into()));
        assert!(out_of_range(9.223_372_036_854_775_808e18.into()));
        assert!(out_of_range(u64::MAX.into()));
        assert!(coerce(PrimitiveKind::Integer, &f64::NAN.into()).is_err());
        assert!(coerce(PrimitiveKind::Integer, &f64::INFINITY.into()).is_err());
        assert!(matches!(
            coerce(PrimitiveKind::Integer, &"inf".into()),
            Err(CoercionError::InvalidText { .. })
        ));
        assert_eq!(
            coerce(PrimitiveKind::Integer, &(-9.223_372_036_854_775_808e18).into()),
            Ok(Value::Int(i64::MIN))
        );
        assert_eq!(
            coerce(PrimitiveKind::Integer, &"-2.5e3".into()),
            Ok(Value::Int(-2500))
        );
    }

    #[test]
    fn test_coerce_float_shapes() {
        assert_eq!(coerce(PrimitiveKind::Float, &3i64.into()), Ok(Value::Float(3.0)));
        assert_eq!(
            coerce(PrimitiveKind::Float, &"9.6e9".into()),
            Ok(Value::Float(9.6e9))
        );
        assert!(coerce(PrimitiveKind::Float, &true.into()).is_err());
    }

    #[test]
    fn test_coerce_bool_shapes() {
        assert_eq!(coerce(PrimitiveKind::Boolean, &"TRUE".into()), Ok(Value::Bool(true)));
        assert_eq!(coerce(PrimitiveKind::Boolean, &"false".into()), Ok(Value::Bool(false)));
        assert_eq!(coerce(PrimitiveKind::Boolean, &1i32.into()), Ok(Value::Bool(true)));
        assert_eq!(coerce(PrimitiveKind::Boolean, &"0".into()), Ok(Value::Bool(false)));
        assert!(coerce(PrimitiveKind::Boolean, &2i32.into()).is_err());
        assert!(coerce(PrimitiveKind::Boolean, &"yes".into()).is_err());
    }

    #[test]
    fn test_coerce_complex_shapes() {
        let expected = Value::Complex(Complex64::new(1.5, -2.0));
        assert_eq!(coerce(PrimitiveKind::Complex, &(1.5, -2.0).into()), Ok(expected.clone()));
        assert_eq!(coerce(PrimitiveKind::Complex, &vec![1.5, -2.0].into()), Ok(expected.clone()));
        assert_eq!(coerce(PrimitiveKind::Complex, &"1.5-2j".into()), Ok(expected.clone()));
        assert_eq!(coerce(PrimitiveKind::Complex, &"1.5, -2".into()), Ok(expected));
        assert_eq!(
            coerce(PrimitiveKind::Complex, &4.0f64.into()),
            Ok(Value::Complex(Complex64::new(4.0, 0.0)))
        );
        assert!(coerce(PrimitiveKind::Complex, &vec![1.0, 2.0, 3.0].into()).is_err());
    }

    #[test]
    fn test_coerce_datetime_shapes() {
        let value = coerce(PrimitiveKind::DateTime, &"2021-03-04T05:06:07.123456789Z".into())
            .expect("Failed to coerce datetime");
        let dt = value.as_datetime().expect("Failed to get datetime");
        assert_eq!(dt.year(), 2021);
        assert_eq!(dt.nanosecond(), 123_456_000);

        let offset = coerce(PrimitiveKind::DateTime, &"2021-03-04T07:06:07+02:00".into())
            .expect("Failed to coerce offset datetime");
        assert_eq!(offset.as_datetime().map(|d| d.hour()), Some(5));

        let date = NaiveDate::from_ymd_opt(2020, 1, 2).expect("Failed to build date");
        let from_date = coerce(PrimitiveKind::DateTime, &date.into()).expect("Failed to coerce date");
        assert_eq!(from_date.as_datetime().map(|d| d.date()), Some(date));

        let utc = Utc.with_ymd_and_hms(2019, 5, 6, 7, 8, 9).single().expect("Failed to build utc");
        assert!(coerce(PrimitiveKind::DateTime, &utc.into()).is_ok());
        assert!(coerce(PrimitiveKind::DateTime, &"not a date".into()).is_err());
    }

    #[test]
    fn test_coerce_string_shapes() {
        assert_eq!(
            coerce(PrimitiveKind::String, &12i32.into()),
            Ok(Value::Str("12".to_string()))
        );
        assert!(coerce(PrimitiveKind::String, &vec!["a", "b"].into()).is_err());
    }

    #[test]
    fn test_value_serialize() {
        let json = serde_json::to_string(&Value::Complex(Complex64::new(1.0, 2.0)))
            .expect("Failed to serialize");
        assert_eq!(json, "[1.0,2.0]");
    }
}

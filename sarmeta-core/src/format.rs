//! Numeric output formatting.
//!
//! Record tables declare output formats with short specifiers such as
//! `0.16G`. The same specifier is applied regardless of the target codec.

use crate::error::{Error, Result};
use crate::value::Value;

/// Output format for date/time values.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Presentation type of a numeric format specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// General format, uppercase exponent (`G`).
    GeneralUpper,
    /// General format, lowercase exponent (`g`).
    GeneralLower,
    /// Scientific notation, uppercase exponent (`E`).
    ExponentUpper,
    /// Scientific notation, lowercase exponent (`e`).
    ExponentLower,
    /// Fixed point (`F` or `f`).
    Fixed,
    /// Decimal integer (`d`).
    Decimal,
}

/// Parsed numeric format specifier: `[0][width][.precision]type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericFormat {
    /// Pad with zeros rather than spaces when `width` applies.
    pub zero_pad: bool,
    /// Minimum output width.
    pub width: Option<usize>,
    /// Precision (significant digits for general, decimals otherwise).
    pub precision: Option<usize>,
    /// Presentation type.
    pub format_type: FormatType,
}

impl NumericFormat {
    /// Full precision general format used by most float fields.
    pub const GENERAL_16: Self = Self {
        zero_pad: true,
        width: None,
        precision: Some(16),
        format_type: FormatType::GeneralUpper,
    };

    /// Parses a specifier such as `0.16G`, `.3f` or `08d`.
    ///
    /// # Errors
    /// Returns `Error::InvalidFormat` if the specifier is malformed.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = || Error::InvalidFormat {
            spec: spec.to_string(),
        };
        let mut rest = spec.trim();

        let type_char = rest.chars().last().ok_or_else(invalid)?;
        let format_type = match type_char {
            'G' => FormatType::GeneralUpper,
            'g' => FormatType::GeneralLower,
            'E' => FormatType::ExponentUpper,
            'e' => FormatType::ExponentLower,
            'F' | 'f' => FormatType::Fixed,
            'd' => FormatType::Decimal,
            _ => return Err(invalid()),
        };
        rest = &rest[..rest.len() - 1];

        let zero_pad = rest.starts_with('0');
        if zero_pad {
            rest = &rest[1..];
        }

        let (width_part, precision_part) = match rest.split_once('.') {
            Some((w, p)) => (w, Some(p)),
            None => (rest, None),
        };
        let width = if width_part.is_empty() {
            None
        } else {
            Some(width_part.parse().map_err(|_| invalid())?)
        };
        let precision = match precision_part {
            Some(p) => Some(p.parse().map_err(|_| invalid())?),
            None => None,
        };
        if precision.is_some() && format_type == FormatType::Decimal {
            return Err(invalid());
        }

        Ok(Self {
            zero_pad,
            width,
            precision,
            format_type,
        })
    }

    /// Formats a float with this specifier.
    #[must_use]
    pub fn format_f64(&self, value: f64) -> String {
        let body = match self.format_type {
            FormatType::GeneralUpper => general(value, self.precision.unwrap_or(6), true),
            FormatType::GeneralLower => general(value, self.precision.unwrap_or(6), false),
            FormatType::ExponentUpper => exponent(value, self.precision.unwrap_or(6), true),
            FormatType::ExponentLower => exponent(value, self.precision.unwrap_or(6), false),
            FormatType::Fixed => format!("{:.*}", self.precision.unwrap_or(6), value),
            FormatType::Decimal => format!("{}", value.round() as i64),
        };
        self.pad(body)
    }

    /// Formats an integer with this specifier.
    #[must_use]
    pub fn format_i64(&self, value: i64) -> String {
        match self.format_type {
            FormatType::Decimal => self.pad(value.to_string()),
            _ => self.format_f64(value as f64),
        }
    }

    fn pad(&self, body: String) -> String {
        let Some(width) = self.width else {
            return body;
        };
        if body.len() >= width {
            return body;
        }
        let fill = width - body.len();
        if self.zero_pad {
            let (sign, digits) = match body.strip_prefix('-') {
                Some(d) => ("-", d),
                None => ("", body.as_str()),
            };
            format!("{sign}{}{digits}", "0".repeat(fill))
        } else {
            format!("{}{body}", " ".repeat(fill))
        }
    }
}

impl std::str::FromStr for NumericFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn non_finite(value: f64, upper: bool) -> String {
    let text = if value.is_nan() {
        "nan"
    } else if value.is_sign_negative() {
        "-inf"
    } else {
        "inf"
    };
    if upper {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}

/// Splits Rust's `{:e}` output into mantissa and decimal exponent.
fn split_exponent(text: &str) -> (&str, i32) {
    match text.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (text, 0),
    }
}

fn strip_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn render_exponent(mantissa: &str, exp: i32, upper: bool) -> String {
    let marker = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{marker}{sign}{:02}", exp.unsigned_abs())
}

fn exponent(value: f64, precision: usize, upper: bool) -> String {
    if !value.is_finite() {
        return non_finite(value, upper);
    }
    let text = format!("{:.*e}", precision, value);
    let (mantissa, exp) = split_exponent(&text);
    render_exponent(mantissa, exp, upper)
}

fn general(value: f64, precision: usize, upper: bool) -> String {
    if !value.is_finite() {
        return non_finite(value, upper);
    }
    let precision = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = split_exponent(&sci);
    if exp >= -4 && exp < precision as i32 {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{:.*}", decimals, value)).to_string()
    } else {
        render_exponent(strip_zeros(mantissa), exp, upper)
    }
}

/// Formats a float using the shortest text that parses back to the same value.
#[must_use]
pub fn format_float(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_finite() && (magnitude == 0.0 || (1e-5..1e16).contains(&magnitude)) {
        format!("{value}")
    } else {
        format!("{value:E}")
    }
}

/// Formats a value as text, applying `format` to numeric values when given.
///
/// Complex values render as `re+imj`; codecs that keep the components apart
/// format each component with [`format_component`].
#[must_use]
pub fn format_value(value: &Value, format: Option<&NumericFormat>) -> String {
    match value {
        Value::Int(v) => match format {
            Some(f) if f.format_type == FormatType::Decimal => f.format_i64(*v),
            _ => v.to_string(),
        },
        Value::Float(v) => format_component(*v, format),
        Value::Bool(v) => v.to_string(),
        Value::Complex(c) => {
            let im = format_component(c.im, format);
            if im.starts_with('-') {
                format!("{}{im}j", format_component(c.re, format))
            } else {
                format!("{}+{im}j", format_component(c.re, format))
            }
        }
        Value::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
        Value::Str(s) => s.clone(),
    }
}

/// Formats one float component with the optional specifier.
#[must_use]
pub fn format_component(value: f64, format: Option<&NumericFormat>) -> String {
    match format {
        Some(f) => f.format_f64(value),
        None => format_float(value),
    }
}

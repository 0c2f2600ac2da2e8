//! Value conversion
//!
//! Two entry points share one dispatch on the *target* type's kind:
//! [`Converter::convert_str`] parses text, and [`Converter::convert`]
//! coerces any value, delegating text to the former.
//!
//! Numeric coercion follows the usual narrowing rules: integral sources
//! truncate to the target width, floating sources go through a saturating
//! conversion to `int` (or `long`) first.

use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use uuid::Uuid;

use reflekt_types::{names, ConversionError, ReflectError, ReflectResult, TypeKind};

use crate::classify::kind_of_type;
use crate::dates::{date_from_millis, CanonicalDates, DateCodec};
use crate::ty::TypeRef;
use crate::value::{EnumValue, Value};

// ============================================================================
// Numeric coercion
// ============================================================================

/// Numeric payload of a value, integral or floating
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    /// byte, short, int or long
    Integral(i64),
    /// float or double
    Floating(f64),
}

impl Numeric {
    /// Numeric payload of a value; `None` for non-numeric values
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Byte(n) => Some(Numeric::Integral(i64::from(*n))),
            Value::Short(n) => Some(Numeric::Integral(i64::from(*n))),
            Value::Int(n) => Some(Numeric::Integral(i64::from(*n))),
            Value::Long(n) => Some(Numeric::Integral(*n)),
            Value::Float(n) => Some(Numeric::Floating(f64::from(*n))),
            Value::Double(n) => Some(Numeric::Floating(*n)),
            _ => None,
        }
    }

    /// Narrow to `byte`
    pub fn to_i8(self) -> i8 {
        match self {
            Numeric::Integral(n) => n as i8,
            Numeric::Floating(d) => (d as i32) as i8,
        }
    }

    /// Narrow to `short`
    pub fn to_i16(self) -> i16 {
        match self {
            Numeric::Integral(n) => n as i16,
            Numeric::Floating(d) => (d as i32) as i16,
        }
    }

    /// Narrow to `int`
    pub fn to_i32(self) -> i32 {
        match self {
            Numeric::Integral(n) => n as i32,
            Numeric::Floating(d) => d as i32,
        }
    }

    /// Narrow to `long`
    pub fn to_i64(self) -> i64 {
        match self {
            Numeric::Integral(n) => n,
            Numeric::Floating(d) => d as i64,
        }
    }

    /// Convert to `float`
    pub fn to_f32(self) -> f32 {
        match self {
            Numeric::Integral(n) => n as f32,
            Numeric::Floating(d) => d as f32,
        }
    }

    /// Convert to `double`
    pub fn to_f64(self) -> f64 {
        match self {
            Numeric::Integral(n) => n as f64,
            Numeric::Floating(d) => d,
        }
    }

    /// Narrow to a 16-bit code unit; `None` for surrogate halves
    pub fn to_char(self) -> Option<char> {
        char::from_u32(u32::from(self.to_i32() as u16))
    }
}

// ============================================================================
// Converter
// ============================================================================

/// Converts text and values to requested types
#[derive(Debug, Clone)]
pub struct Converter {
    dates: Arc<dyn DateCodec>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Arc::new(CanonicalDates::default()))
    }
}

impl Converter {
    /// Converter using the given date codec
    pub fn new(dates: Arc<dyn DateCodec>) -> Self {
        Self { dates }
    }

    /// Date codec in use
    pub fn dates(&self) -> &dyn DateCodec {
        self.dates.as_ref()
    }

    /// Parse text as a value of `target`.
    ///
    /// `lang.Object` returns the text itself; enumerations match constant
    /// names case-insensitively.
    pub fn convert_str(&self, text: &str, target: &TypeRef) -> ReflectResult<Value> {
        if target.name() == names::OBJECT {
            return Ok(Value::str(text));
        }

        if target.is_enum() {
            return enum_constant(text, target);
        }

        let kind = kind_of_type(target);
        match kind {
            TypeKind::Null => Err(not_a_target()),

            TypeKind::Boolean | TypeKind::BooleanBoxed => parse_bool(text).map(Value::Bool),

            TypeKind::Byte | TypeKind::ByteBoxed => parse_integral(text, kind).map(Value::Byte),
            TypeKind::Short | TypeKind::ShortBoxed => parse_integral(text, kind).map(Value::Short),
            TypeKind::Int | TypeKind::IntBoxed => parse_integral(text, kind).map(Value::Int),
            TypeKind::Long | TypeKind::LongBoxed => parse_integral(text, kind).map(Value::Long),
            TypeKind::Float | TypeKind::FloatBoxed => parse_floating(text, kind).map(Value::Float),
            TypeKind::Double | TypeKind::DoubleBoxed => parse_floating(text, kind).map(Value::Double),

            TypeKind::Char | TypeKind::CharBoxed => text.chars().next().map(Value::Char).ok_or_else(|| {
                malformed(text, kind, "empty string has no first character")
            }),

            TypeKind::String => Ok(Value::str(text)),

            TypeKind::Date => self.dates.parse(text).map(Value::date),

            TypeKind::Uuid => Uuid::parse_str(text)
                .map(Value::Uuid)
                .map_err(|e| malformed(text, kind, &e.to_string())),

            TypeKind::Object => Err(ConversionError::NoStringConversion {
                target: target.name().to_string(),
            }
            .into()),
        }
    }

    /// Coerce any value to `target`.
    ///
    /// `Null` stays `Null`; a value already of the target type is returned
    /// unchanged. Conversion between structured types is not supported.
    pub fn convert(&self, value: &Value, target: &TypeRef) -> ReflectResult<Value> {
        let Some(source) = value.runtime_type() else {
            return Ok(Value::Null);
        };

        if target.is_assignable_from(&source) || target.name() == names::OBJECT {
            return Ok(value.clone());
        }

        if let Value::Str(text) = value {
            return self.convert_str(text, target);
        }

        let kind = kind_of_type(target);
        let numeric = Numeric::of(value);

        match kind {
            TypeKind::Null => Err(not_a_target()),

            TypeKind::Boolean | TypeKind::BooleanBoxed => match value {
                Value::Bool(b) => Ok(Value::Bool(*b)),
                _ => Err(incompatible(value, kind)),
            },

            TypeKind::Byte | TypeKind::ByteBoxed => numeric
                .map(|n| Value::Byte(n.to_i8()))
                .ok_or_else(|| incompatible(value, kind)),
            TypeKind::Short | TypeKind::ShortBoxed => numeric
                .map(|n| Value::Short(n.to_i16()))
                .ok_or_else(|| incompatible(value, kind)),
            TypeKind::Int | TypeKind::IntBoxed => numeric
                .map(|n| Value::Int(n.to_i32()))
                .ok_or_else(|| incompatible(value, kind)),
            TypeKind::Long | TypeKind::LongBoxed => numeric
                .map(|n| Value::Long(n.to_i64()))
                .ok_or_else(|| incompatible(value, kind)),
            TypeKind::Float | TypeKind::FloatBoxed => numeric
                .map(|n| Value::Float(n.to_f32()))
                .ok_or_else(|| incompatible(value, kind)),
            TypeKind::Double | TypeKind::DoubleBoxed => numeric
                .map(|n| Value::Double(n.to_f64()))
                .ok_or_else(|| incompatible(value, kind)),

            TypeKind::Char | TypeKind::CharBoxed => numeric
                .and_then(Numeric::to_char)
                .map(Value::Char)
                .ok_or_else(|| incompatible(value, kind)),

            TypeKind::String => Ok(Value::Str(self.format(value))),

            TypeKind::Date => match (value, numeric) {
                (Value::Date(d), _) => Ok(Value::date(*d)),
                (_, Some(n)) => date_from_millis(n.to_i64())
                    .map(Value::date)
                    .ok_or_else(|| incompatible(value, kind)),
                _ => Err(incompatible(value, kind)),
            },

            TypeKind::Uuid => Err(incompatible(value, kind)),

            TypeKind::Object => Err(ConversionError::Unsupported {
                target: target.name().to_string(),
            }
            .into()),
        }
    }

    fn format(&self, value: &Value) -> String {
        match value {
            Value::Date(d) => self.dates.format(d),
            Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Value::Chars(chars) => chars.iter().collect(),
            other => other.to_string(),
        }
    }
}

static DEFAULT_CONVERTER: LazyLock<Converter> = LazyLock::new(Converter::default);

/// [`Converter::convert_str`] with the default date codec
pub fn convert_str(text: &str, target: &TypeRef) -> ReflectResult<Value> {
    DEFAULT_CONVERTER.convert_str(text, target)
}

/// [`Converter::convert`] with the default date codec
pub fn convert(value: &Value, target: &TypeRef) -> ReflectResult<Value> {
    DEFAULT_CONVERTER.convert(value, target)
}

// ============================================================================
// Helpers
// ============================================================================

fn enum_constant(text: &str, target: &TypeRef) -> ReflectResult<Value> {
    let wanted = text.to_lowercase();
    target
        .enum_constants()
        .iter()
        .find(|c| c.to_lowercase() == wanted)
        .and_then(|c| EnumValue::new(target, c))
        .map(Value::Enum)
        .ok_or_else(|| {
            ConversionError::NoEnumConstant {
                type_name: target.name().to_string(),
                value: text.to_string(),
            }
            .into()
        })
}

fn parse_bool(text: &str) -> ReflectResult<bool> {
    const TRUE: [&str; 4] = ["y", "t", "yes", "true"];
    const FALSE: [&str; 4] = ["n", "f", "no", "false"];

    if TRUE.iter().any(|t| t.eq_ignore_ascii_case(text)) {
        Ok(true)
    } else if FALSE.iter().any(|t| t.eq_ignore_ascii_case(text)) {
        Ok(false)
    } else {
        Err(ConversionError::InvalidBoolean {
            value: text.to_string(),
        }
        .into())
    }
}

fn parse_integral<T>(text: &str, kind: TypeKind) -> ReflectResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.parse::<T>()
        .map_err(|e| malformed(text, kind, &e.to_string()))
}

// Surrounding whitespace and a trailing `f`/`d` type suffix are accepted.
fn parse_floating<T>(text: &str, kind: TypeKind) -> ReflectResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let trimmed = text.trim();
    trimmed
        .parse::<T>()
        .or_else(|e| {
            trimmed
                .strip_suffix(['f', 'F', 'd', 'D'])
                .ok_or(e)
                .and_then(|bare| bare.parse::<T>())
        })
        .map_err(|e| malformed(text, kind, &e.to_string()))
}

fn malformed(text: &str, kind: TypeKind, reason: &str) -> ReflectError {
    ConversionError::MalformedLiteral {
        value: text.to_string(),
        target: kind.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

fn incompatible(value: &Value, kind: TypeKind) -> ReflectError {
    ConversionError::Incompatible {
        value: value.to_string(),
        target: kind.to_string(),
    }
    .into()
}

fn not_a_target() -> ReflectError {
    ReflectError::not_expected("the null kind is not a conversion target")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::builtins;

    #[test]
    fn test_numeric_narrowing() {
        assert_eq!(Numeric::Integral(300).to_i8(), 44);
        assert_eq!(Numeric::Integral(-129).to_i8(), 127);
        assert_eq!(Numeric::Floating(3.99).to_i32(), 3);
        assert_eq!(Numeric::Floating(-3.99).to_i32(), -3);
        assert_eq!(Numeric::Floating(1e20).to_i32(), i32::MAX);
        assert_eq!(Numeric::Floating(f64::NAN).to_i64(), 0);
        assert_eq!(Numeric::Floating(300.7).to_i8(), 44);
        assert_eq!(Numeric::Integral(65).to_char(), Some('A'));
        assert_eq!(Numeric::Integral(0xD800).to_char(), None);
    }

    #[test]
    fn test_floating_suffixes() {
        assert_eq!(parse_floating::<f32>("1.5f", TypeKind::Float).unwrap(), 1.5);
        assert_eq!(parse_floating::<f64>(" 2.25D ", TypeKind::Double).unwrap(), 2.25);
        assert!(parse_floating::<f64>("2.25x", TypeKind::Double).is_err());
        assert!(parse_floating::<f64>("f", TypeKind::Double).is_err());
    }

    #[test]
    fn test_integral_is_strict() {
        assert_eq!(parse_integral::<i32>("+42", TypeKind::Int).unwrap(), 42);
        assert!(parse_integral::<i32>(" 42", TypeKind::Int).is_err());
        assert!(parse_integral::<i8>("128", TypeKind::Byte).is_err());
    }

    #[test]
    fn test_bool_tokens() {
        for t in ["y", "T", "Yes", "TRUE"] {
            assert_eq!(parse_bool(t).unwrap(), true, "{}", t);
        }
        for t in ["n", "F", "No", "false"] {
            assert_eq!(parse_bool(t).unwrap(), false, "{}", t);
        }
        for t in ["", "1", "0", "on", "yess"] {
            assert!(parse_bool(t).is_err(), "{}", t);
        }
    }

    #[test]
    fn test_uuid_from_non_text_fails() {
        let b = builtins();
        let err = convert(&Value::Int(1), &b.uuid).unwrap_err();
        assert!(matches!(
            err,
            ReflectError::Conversion(ConversionError::Incompatible { .. })
        ));
    }
}

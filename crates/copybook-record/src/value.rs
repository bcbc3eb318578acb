//! The runtime value produced by field parsing.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::CoerceError;

/// A typed value on its way from a sliced field into an entity property.
///
/// `Null` means the field was semantically absent (all spaces, all
/// zeros, empty after collapsing), as opposed to malformed.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent field.
    Null,
    /// Text.
    Str(String),
    /// 64-bit signed integer.
    Int(i64),
    /// Exact decimal.
    Decimal(Decimal),
    /// Boolean.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Point in time with offset; `now`-sourced fields carry the job
    /// timestamp here.
    Timestamp(DateTime<FixedOffset>),
}

impl Value {
    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::Bool(_) => "boolean",
            Self::Date(_) => "date",
            Self::Timestamp(_) => "timestamp",
        }
    }

    /// Whether the value is the absent marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn coerce_err(&self, target: &'static str) -> CoerceError {
        CoerceError {
            kind: self.kind(),
            value: self.to_string(),
            target,
        }
    }

    /// JSON projection used by record sinks.
    ///
    /// Decimals render as strings to keep money amounts exact, matching
    /// `rust_decimal`'s own serde default.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::Int(n) => serde_json::Value::Number((*n).into()),
            Self::Decimal(d) => serde_json::Value::String(d.to_string()),
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            Self::Timestamp(t) => serde_json::Value::String(t.to_rfc3339()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

/// Conversion from a [`Value`] into a concrete property type.
///
/// `Null` converts to the type's zero-equivalent; wrap the property in
/// `Option` to keep absence observable. All other conversions are
/// locale-invariant and fail with a [`CoerceError`] rather than losing
/// information silently.
pub trait FromValue: Sized {
    /// Destination type name for diagnostics.
    fn target_name() -> &'static str;

    /// The zero-equivalent written when a `Null` lands on a
    /// non-optional property.
    fn null_value() -> Self;

    /// Convert, consuming the value.
    fn from_value(value: Value) -> Result<Self, CoerceError>;
}

impl<T: FromValue> FromValue for Option<T> {
    fn target_name() -> &'static str {
        T::target_name()
    }

    fn null_value() -> Self {
        None
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl FromValue for String {
    fn target_name() -> &'static str {
        "string"
    }

    fn null_value() -> Self {
        String::new()
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        Ok(match value {
            Value::Null => Self::null_value(),
            Value::Str(s) => s,
            other => other.to_string(),
        })
    }
}

impl FromValue for i64 {
    fn target_name() -> &'static str {
        "integer"
    }

    fn null_value() -> Self {
        0
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match &value {
            Value::Null => Ok(0),
            Value::Int(n) => Ok(*n),
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::Decimal(d) if d.fract().is_zero() => d
                .trunc()
                .to_i64()
                .ok_or_else(|| value.coerce_err(Self::target_name())),
            Value::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| value.coerce_err(Self::target_name())),
            _ => Err(value.coerce_err(Self::target_name())),
        }
    }
}

impl FromValue for i32 {
    fn target_name() -> &'static str {
        "integer"
    }

    fn null_value() -> Self {
        0
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        let wide = i64::from_value(value.clone())?;
        wide.try_into()
            .map_err(|_| value.coerce_err(Self::target_name()))
    }
}

impl FromValue for f64 {
    fn target_name() -> &'static str {
        "float"
    }

    fn null_value() -> Self {
        0.0
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match &value {
            Value::Null => Ok(0.0),
            Value::Int(n) => Ok(*n as f64),
            Value::Decimal(d) => d
                .to_f64()
                .ok_or_else(|| value.coerce_err(Self::target_name())),
            Value::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| value.coerce_err(Self::target_name())),
            _ => Err(value.coerce_err(Self::target_name())),
        }
    }
}

impl FromValue for Decimal {
    fn target_name() -> &'static str {
        "decimal"
    }

    fn null_value() -> Self {
        Decimal::ZERO
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match &value {
            Value::Null => Ok(Decimal::ZERO),
            Value::Decimal(d) => Ok(*d),
            Value::Int(n) => Ok(Decimal::from(*n)),
            Value::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| value.coerce_err(Self::target_name())),
            _ => Err(value.coerce_err(Self::target_name())),
        }
    }
}

impl FromValue for bool {
    fn target_name() -> &'static str {
        "boolean"
    }

    fn null_value() -> Self {
        false
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match &value {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(*b),
            Value::Int(n) => Ok(*n != 0),
            Value::Str(s) => match s.trim() {
                t if t.eq_ignore_ascii_case("true") || t == "1" => Ok(true),
                t if t.eq_ignore_ascii_case("false") || t == "0" => Ok(false),
                _ => Err(value.coerce_err(Self::target_name())),
            },
            _ => Err(value.coerce_err(Self::target_name())),
        }
    }
}

impl FromValue for NaiveDate {
    fn target_name() -> &'static str {
        "date"
    }

    fn null_value() -> Self {
        NaiveDate::default()
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match &value {
            Value::Null => Ok(Self::null_value()),
            Value::Date(d) => Ok(*d),
            Value::Timestamp(t) => Ok(t.date_naive()),
            Value::Str(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| value.coerce_err(Self::target_name())),
            _ => Err(value.coerce_err(Self::target_name())),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn target_name() -> &'static str {
        "timestamp"
    }

    fn null_value() -> Self {
        DateTime::<Utc>::UNIX_EPOCH
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match &value {
            Value::Null => Ok(Self::null_value()),
            Value::Timestamp(t) => Ok(t.with_timezone(&Utc)),
            Value::Date(d) => Ok(d.and_time(NaiveTime::MIN).and_utc()),
            Value::Str(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| value.coerce_err(Self::target_name())),
            _ => Err(value.coerce_err(Self::target_name())),
        }
    }
}

impl FromValue for DateTime<FixedOffset> {
    fn target_name() -> &'static str {
        "timestamp"
    }

    fn null_value() -> Self {
        DateTime::<Utc>::UNIX_EPOCH.fixed_offset()
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match &value {
            Value::Null => Ok(Self::null_value()),
            Value::Timestamp(t) => Ok(*t),
            Value::Date(d) => Ok(d.and_time(NaiveTime::MIN).and_utc().fixed_offset()),
            Value::Str(s) => DateTime::parse_from_rfc3339(s.trim())
                .map_err(|_| value.coerce_err(Self::target_name())),
            _ => Err(value.coerce_err(Self::target_name())),
        }
    }
}

/// Projection of a property back into a [`Value`], used by getters
/// (count-field reads) and diagnostics.
pub trait ToValue {
    /// Render the property as a runtime value.
    fn to_value(&self) -> Value;
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ToValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl ToValue for i32 {
    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Decimal::from_f64_retain(*self)
            .map(Value::Decimal)
            .unwrap_or(Value::Null)
    }
}

impl ToValue for Decimal {
    fn to_value(&self) -> Value {
        Value::Decimal(*self)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for NaiveDate {
    fn to_value(&self) -> Value {
        Value::Date(*self)
    }
}

impl ToValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::Timestamp(self.fixed_offset())
    }
}

impl ToValue for DateTime<FixedOffset> {
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_null_into_option_is_none() {
        let v: Option<i64> = FromValue::from_value(Value::Null).unwrap();
        assert_eq!(v, None);
    }

    #[test]
    fn test_null_into_plain_is_zero_equivalent() {
        assert_eq!(i64::from_value(Value::Null).unwrap(), 0);
        assert_eq!(Decimal::from_value(Value::Null).unwrap(), Decimal::ZERO);
        assert_eq!(String::from_value(Value::Null).unwrap(), "");
        assert!(!bool::from_value(Value::Null).unwrap());
    }

    #[test]
    fn test_string_to_int() {
        assert_eq!(i64::from_value(Value::Str(" 42 ".into())).unwrap(), 42);
        assert!(i64::from_value(Value::Str("4x2".into())).is_err());
    }

    #[test]
    fn test_integral_decimal_to_int() {
        let d = Decimal::from_str("120.00").unwrap();
        assert_eq!(i64::from_value(Value::Decimal(d)).unwrap(), 120);
        let frac = Decimal::from_str("120.50").unwrap();
        assert!(i64::from_value(Value::Decimal(frac)).is_err());
    }

    #[test]
    fn test_int_to_decimal() {
        assert_eq!(
            Decimal::from_value(Value::Int(7)).unwrap(),
            Decimal::from(7)
        );
    }

    #[test]
    fn test_i32_range_check() {
        assert!(i32::from_value(Value::Int(i64::from(i32::MAX) + 1)).is_err());
        assert_eq!(i32::from_value(Value::Int(-5)).unwrap(), -5);
    }

    #[test]
    fn test_date_conversions() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(NaiveDate::from_value(Value::Date(d)).unwrap(), d);
        assert_eq!(
            NaiveDate::from_value(Value::Str("2024-01-31".into())).unwrap(),
            d
        );
        let ts = DateTime::<Utc>::from_value(Value::Date(d)).unwrap();
        assert_eq!(ts.date_naive(), d);
    }

    #[test]
    fn test_coerce_error_carries_context() {
        let err = NaiveDate::from_value(Value::Bool(true)).unwrap_err();
        assert_eq!(err.kind, "boolean");
        assert_eq!(err.target, "date");
    }

    #[test]
    fn test_to_value_roundtrip() {
        assert_eq!(Some(9_i64).to_value(), Value::Int(9));
        assert_eq!(Option::<i64>::None.to_value(), Value::Null);
        assert_eq!("x".to_string().to_value(), Value::Str("x".into()));
    }

    #[test]
    fn test_display_of_null_is_empty() {
        assert_eq!(Value::Null.to_string(), "");
    }
}

//! Input value shapes accepted by the conversion engine
//!
//! Supported shapes:
//! - null, bool, int (i64), float (f64), string, bytes
//! - calendar date, time of day, instant, offset date-time,
//!   local (offset-less) date-time
//! - fixed-point decimal
//! - array (ordered sequence), record (field-name mapping)

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::collections::HashMap;

/// A dynamically-typed input value drawn from a field-name mapping.
///
/// One variant per accepted runtime shape. Converters match on these
/// variants; a shape with no rule for the target type is reported as an
/// unsupported source shape, never reinterpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    /// Absent or explicitly null
    Null,
    /// Boolean
    Bool(bool),
    /// Integer numeric
    Int(i64),
    /// Floating numeric
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw byte sequence
    Bytes(Vec<u8>),
    /// Calendar date without time component
    Date(NaiveDate),
    /// Time of day without date component
    Time(NaiveTime),
    /// Instant in time, UTC
    Instant(DateTime<Utc>),
    /// Instant in time carrying a UTC offset
    OffsetDateTime(DateTime<FixedOffset>),
    /// Offset-less date-time, not anchored to any zone
    LocalDateTime(NaiveDateTime),
    /// Arbitrary-precision fixed-point decimal
    Decimal(BigDecimal),
    /// Ordered sequence of values
    Array(Vec<InputValue>),
    /// Nested field-name mapping
    Record(HashMap<String, InputValue>),
}

impl InputValue {
    /// Returns the shape name for error messages
    pub fn shape_name(&self) -> &'static str {
        match self {
            InputValue::Null => "null",
            InputValue::Bool(_) => "bool",
            InputValue::Int(_) => "int",
            InputValue::Float(_) => "float",
            InputValue::String(_) => "string",
            InputValue::Bytes(_) => "bytes",
            InputValue::Date(_) => "date",
            InputValue::Time(_) => "time",
            InputValue::Instant(_) => "instant",
            InputValue::OffsetDateTime(_) => "offset date-time",
            InputValue::LocalDateTime(_) => "local date-time",
            InputValue::Decimal(_) => "decimal",
            InputValue::Array(_) => "array",
            InputValue::Record(_) => "record",
        }
    }

    /// Whether the value is absent/null
    pub fn is_null(&self) -> bool {
        matches!(self, InputValue::Null)
    }

    /// Canonical text form of a scalar value, if it has one.
    ///
    /// Containers, bytes, and null have no canonical text form and
    /// return `None`. Date-time shapes render in ISO-8601/RFC 3339.
    pub fn canonical_string(&self) -> Option<String> {
        match self {
            InputValue::Bool(b) => Some(b.to_string()),
            InputValue::Int(i) => Some(i.to_string()),
            InputValue::Float(f) => Some(f.to_string()),
            InputValue::String(s) => Some(s.clone()),
            InputValue::Date(d) => Some(d.to_string()),
            InputValue::Time(t) => Some(t.to_string()),
            InputValue::Instant(dt) => Some(dt.to_rfc3339()),
            InputValue::OffsetDateTime(dt) => Some(dt.to_rfc3339()),
            InputValue::LocalDateTime(dt) => {
                Some(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            InputValue::Decimal(d) => Some(d.to_string()),
            InputValue::Null
            | InputValue::Bytes(_)
            | InputValue::Array(_)
            | InputValue::Record(_) => None,
        }
    }

    /// Maps a decoded JSON value into the input model.
    ///
    /// Integral numbers become [`InputValue::Int`]; everything else
    /// numeric becomes [`InputValue::Float`] (including u64 values
    /// beyond the i64 range). Objects become records and arrays become
    /// sequences, recursively. Date, time, decimal, and byte shapes
    /// cannot be expressed in JSON; they arrive as strings and are
    /// parsed by the converter for the target field.
    pub fn from_json(value: serde_json::Value) -> InputValue {
        match value {
            serde_json::Value::Null => InputValue::Null,
            serde_json::Value::Bool(b) => InputValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    InputValue::Int(i)
                } else {
                    InputValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => InputValue::String(s),
            serde_json::Value::Array(items) => {
                InputValue::Array(items.into_iter().map(InputValue::from_json).collect())
            }
            serde_json::Value::Object(map) => InputValue::Record(
                map.into_iter()
                    .map(|(k, v)| (k, InputValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for InputValue {
    fn from(value: serde_json::Value) -> Self {
        InputValue::from_json(value)
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        InputValue::Bool(value)
    }
}

impl From<i32> for InputValue {
    fn from(value: i32) -> Self {
        InputValue::Int(i64::from(value))
    }
}

impl From<i64> for InputValue {
    fn from(value: i64) -> Self {
        InputValue::Int(value)
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Float(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::String(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::String(value)
    }
}

impl From<Vec<u8>> for InputValue {
    fn from(value: Vec<u8>) -> Self {
        InputValue::Bytes(value)
    }
}

impl From<NaiveDate> for InputValue {
    fn from(value: NaiveDate) -> Self {
        InputValue::Date(value)
    }
}

impl From<NaiveTime> for InputValue {
    fn from(value: NaiveTime) -> Self {
        InputValue::Time(value)
    }
}

impl From<DateTime<Utc>> for InputValue {
    fn from(value: DateTime<Utc>) -> Self {
        InputValue::Instant(value)
    }
}

impl From<DateTime<FixedOffset>> for InputValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        InputValue::OffsetDateTime(value)
    }
}

impl From<NaiveDateTime> for InputValue {
    fn from(value: NaiveDateTime) -> Self {
        InputValue::LocalDateTime(value)
    }
}

impl From<BigDecimal> for InputValue {
    fn from(value: BigDecimal) -> Self {
        InputValue::Decimal(value)
    }
}

impl From<Vec<InputValue>> for InputValue {
    fn from(value: Vec<InputValue>) -> Self {
        InputValue::Array(value)
    }
}

impl From<HashMap<String, InputValue>> for InputValue {
    fn from(value: HashMap<String, InputValue>) -> Self {
        InputValue::Record(value)
    }
}

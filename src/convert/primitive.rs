//! Primitive converters
//!
//! Each scalar converter accepts its native shape or a parseable string
//! form. Out-of-range values and malformed strings are parse failures;
//! shapes with no rule are unsupported. Integer targets never accept
//! floats; float targets accept integers (widening).

use apache_avro::types::Value;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::errors::{CoercionError, ConvertResult};
use crate::value::InputValue;

/// string: any scalar with a canonical text form
pub(crate) fn to_string_value(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw.canonical_string() {
        Some(s) => Ok(Value::String(s)),
        None => Err(CoercionError::unsupported(path, "string", raw)),
    }
}

/// int: 32-bit signed integer
pub(crate) fn to_int(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::Int(i) => i32::try_from(*i).map(Value::Int).map_err(|_| {
            CoercionError::parse_failure(
                path,
                "int",
                i.to_string(),
                "out of range for a 32-bit integer",
            )
        }),
        InputValue::String(s) => s.parse::<i32>().map(Value::Int).map_err(|e| {
            CoercionError::parse_failure(path, "int", s.clone(), e.to_string())
        }),
        other => Err(CoercionError::unsupported(path, "int", other)),
    }
}

/// long: 64-bit signed integer
pub(crate) fn to_long(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::Int(i) => Ok(Value::Long(*i)),
        InputValue::String(s) => s.parse::<i64>().map(Value::Long).map_err(|e| {
            CoercionError::parse_failure(path, "long", s.clone(), e.to_string())
        }),
        other => Err(CoercionError::unsupported(path, "long", other)),
    }
}

/// float: 32-bit floating point
pub(crate) fn to_float(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::Float(f) => Ok(Value::Float(*f as f32)),
        InputValue::Int(i) => Ok(Value::Float(*i as f32)),
        InputValue::String(s) => s.parse::<f32>().map(Value::Float).map_err(|e| {
            CoercionError::parse_failure(path, "float", s.clone(), e.to_string())
        }),
        other => Err(CoercionError::unsupported(path, "float", other)),
    }
}

/// double: 64-bit floating point
pub(crate) fn to_double(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::Float(f) => Ok(Value::Double(*f)),
        InputValue::Int(i) => Ok(Value::Double(*i as f64)),
        InputValue::String(s) => s.parse::<f64>().map(Value::Double).map_err(|e| {
            CoercionError::parse_failure(path, "double", s.clone(), e.to_string())
        }),
        other => Err(CoercionError::unsupported(path, "double", other)),
    }
}

/// boolean: native bool or the strings "true"/"false"
pub(crate) fn to_boolean(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::Bool(b) => Ok(Value::Boolean(*b)),
        InputValue::String(s) => s.parse::<bool>().map(Value::Boolean).map_err(|e| {
            CoercionError::parse_failure(path, "boolean", s.clone(), e.to_string())
        }),
        other => Err(CoercionError::unsupported(path, "boolean", other)),
    }
}

/// bytes: raw bytes, or base64-decoded from a string
pub(crate) fn to_bytes(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::Bytes(b) => Ok(Value::Bytes(b.clone())),
        InputValue::String(s) => STANDARD.decode(s).map(Value::Bytes).map_err(|e| {
            CoercionError::parse_failure(path, "bytes", s.clone(), e.to_string())
        }),
        other => Err(CoercionError::unsupported(path, "bytes", other)),
    }
}

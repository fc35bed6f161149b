//! Value coercion engine
//!
//! Walks a record schema's declared fields in order, resolves each
//! field's effective type, and converts the raw input value into the
//! exact representation the schema's binary encoding requires. The
//! engine does not mutate documents and holds no state between calls;
//! conversion is deterministic.
//!
//! Failure is fail-fast: the first field that cannot be coerced aborts
//! the whole call. A partially-typed record is not a meaningful
//! artifact to the downstream encoder.

use std::collections::HashMap;

use apache_avro::schema::RecordSchema;
use apache_avro::types::Value;
use apache_avro::Schema;
use tracing::{debug, trace};

use super::builder::RecordBuilder;
use super::config::{ConverterConfig, MissingValuePolicy};
use super::errors::{CoercionError, ConvertResult};
use super::{logical, primitive};
use crate::schema::{logical_type_of, resolve_union, schema_kind_name, SchemaError};
use crate::value::InputValue;

/// Schema-directed value coercion engine.
///
/// Stateless across calls: a `Converter` and the schemas it reads may
/// be shared across any number of concurrent conversions. Each call
/// builds its own output record.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    /// Creates a converter with the default (strict) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a converter with the given configuration.
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Converts a field-name/value mapping into a typed record.
    ///
    /// Fields are processed in the schema's declared order and appear
    /// exactly once in the output. Input keys not declared by the
    /// schema are ignored. The result is a `Value::Record` directly
    /// encodable by `apache_avro::to_avro_datum` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns a [`CoercionError`] identifying the field path, the
    /// expected type, and the actual input shape of the first field
    /// that cannot be coerced.
    pub fn convert(
        &self,
        schema: &Schema,
        input: &HashMap<String, InputValue>,
    ) -> ConvertResult<Value> {
        let Schema::Record(record) = schema else {
            return Err(SchemaError::UnsupportedSchema {
                path: "$root".into(),
                kind: schema_kind_name(schema),
            }
            .into());
        };
        trace!(fields = record.fields.len(), "converting record");
        self.convert_record(record, input, "")
    }

    fn convert_record(
        &self,
        record: &RecordSchema,
        input: &HashMap<String, InputValue>,
        prefix: &str,
    ) -> ConvertResult<Value> {
        let mut builder = RecordBuilder::new(record.fields.len());
        for field in &record.fields {
            let field_path = make_path(prefix, &field.name);
            let raw = input.get(&field.name).unwrap_or(&InputValue::Null);
            let value = self.convert_field(raw, &field.schema, &field_path)?;
            builder.push(&field.name, value);
        }
        Ok(builder.freeze())
    }

    /// Converts one declared field, resolving nullability first.
    fn convert_field(
        &self,
        raw: &InputValue,
        declared: &Schema,
        path: &str,
    ) -> ConvertResult<Value> {
        match declared {
            Schema::Union(union) => {
                let resolved = resolve_union(union, path)?;
                match (raw.is_null(), resolved.null_index) {
                    (true, Some(null_index)) => {
                        Ok(Value::Union(null_index, Box::new(Value::Null)))
                    }
                    (true, None) => self.missing_value(declared, path),
                    (false, _) => {
                        let inner = self.convert_value(raw, resolved.variant, path)?;
                        Ok(Value::Union(resolved.variant_index, Box::new(inner)))
                    }
                }
            }
            _ if raw.is_null() => self.missing_value(declared, path),
            _ => self.convert_value(raw, declared, path),
        }
    }

    /// Missing or null value on a non-nullable declared type.
    fn missing_value(&self, declared: &Schema, path: &str) -> ConvertResult<Value> {
        match self.config.missing_values {
            MissingValuePolicy::Reject => Err(CoercionError::MissingValue {
                path: path.to_string(),
                expected: schema_kind_name(declared).to_string(),
            }),
            MissingValuePolicy::WriteNull => {
                debug!(field = path, "writing null into non-nullable field");
                Ok(Value::Null)
            }
        }
    }

    /// Converts a value against a concrete (non-union) schema.
    fn convert_value(
        &self,
        raw: &InputValue,
        schema: &Schema,
        path: &str,
    ) -> ConvertResult<Value> {
        if let Some(logical) = logical_type_of(schema) {
            return logical::convert_logical(raw, logical, self.config.rescale, path);
        }

        match schema {
            Schema::String => primitive::to_string_value(raw, path),
            Schema::Int => primitive::to_int(raw, path),
            Schema::Long => primitive::to_long(raw, path),
            Schema::Float => primitive::to_float(raw, path),
            Schema::Double => primitive::to_double(raw, path),
            Schema::Boolean => primitive::to_boolean(raw, path),
            Schema::Bytes => primitive::to_bytes(raw, path),
            Schema::Array(array) => self.convert_array(raw, &array.items, path),
            Schema::Record(record) => match raw {
                InputValue::Record(fields) => self.convert_record(record, fields, path),
                other => Err(CoercionError::NestedRecordShapeMismatch {
                    path: path.to_string(),
                    actual: other.shape_name(),
                }),
            },
            // Avro forbids unions directly inside unions, but an array's
            // item schema may itself be a union.
            Schema::Union(union) => {
                let resolved = resolve_union(union, path)?;
                self.convert_value(raw, resolved.variant, path)
            }
            other => Err(SchemaError::UnsupportedSchema {
                path: path.to_string(),
                kind: schema_kind_name(other),
            }
            .into()),
        }
    }

    fn convert_array(
        &self,
        raw: &InputValue,
        items: &Schema,
        path: &str,
    ) -> ConvertResult<Value> {
        let InputValue::Array(elements) = raw else {
            return Err(CoercionError::unsupported(path, "array", raw));
        };

        let mut converted = Vec::with_capacity(elements.len());
        for (i, element) in elements.iter().enumerate() {
            let element_path = format!("{path}[{i}]");
            converted.push(self.convert_field(element, items, &element_path)?);
        }
        Ok(Value::Array(converted))
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(json: &str) -> Schema {
        Schema::parse_str(json).unwrap()
    }

    fn input_map(value: serde_json::Value) -> HashMap<String, InputValue> {
        match InputValue::from_json(value) {
            InputValue::Record(fields) => fields,
            other => panic!("expected object, got {other:?}"),
        }
    }

    fn user_schema() -> Schema {
        parse(
            r#"{
                "type": "record",
                "name": "User",
                "fields": [
                    {"name": "id", "type": "long"},
                    {"name": "name", "type": "string"},
                    {"name": "email", "type": ["null", "string"]},
                    {"name": "active", "type": "boolean"}
                ]
            }"#,
        )
    }

    #[test]
    fn test_flat_record_converts_in_schema_order() {
        let converter = Converter::new();
        let input = input_map(json!({
            "active": true,
            "name": "Alice",
            "id": 7
        }));

        let Value::Record(fields) = converter.convert(&user_schema(), &input).unwrap()
        else {
            panic!("expected record");
        };

        let names: Vec<&str> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "email", "active"]);
        assert_eq!(fields[0].1, Value::Long(7));
        assert_eq!(fields[1].1, Value::String("Alice".into()));
        assert_eq!(fields[3].1, Value::Boolean(true));
    }

    #[test]
    fn test_nullable_field_absent_becomes_union_null() {
        let converter = Converter::new();
        let input = input_map(json!({"id": 1, "name": "a", "active": false}));

        let Value::Record(fields) = converter.convert(&user_schema(), &input).unwrap()
        else {
            panic!("expected record");
        };
        assert_eq!(fields[2].1, Value::Union(0, Box::new(Value::Null)));
    }

    #[test]
    fn test_nullable_field_present_wrapped_at_variant_index() {
        let converter = Converter::new();
        let input = input_map(json!({
            "id": 1,
            "name": "a",
            "email": "a@example.com",
            "active": false
        }));

        let Value::Record(fields) = converter.convert(&user_schema(), &input).unwrap()
        else {
            panic!("expected record");
        };
        assert_eq!(
            fields[2].1,
            Value::Union(1, Box::new(Value::String("a@example.com".into())))
        );
    }

    #[test]
    fn test_missing_non_nullable_field_rejected_by_default() {
        let converter = Converter::new();
        let input = input_map(json!({"id": 1, "active": true}));

        let err = converter.convert(&user_schema(), &input).unwrap_err();
        assert_eq!(err.code(), "MISSING_VALUE");
        assert_eq!(err.path(), "name");
    }

    #[test]
    fn test_missing_non_nullable_field_written_null_under_policy() {
        let converter = Converter::with_config(ConverterConfig {
            missing_values: MissingValuePolicy::WriteNull,
            ..ConverterConfig::default()
        });
        let input = input_map(json!({"id": 1, "active": true}));

        let Value::Record(fields) = converter.convert(&user_schema(), &input).unwrap()
        else {
            panic!("expected record");
        };
        assert_eq!(fields[1].1, Value::Null);
    }

    #[test]
    fn test_undeclared_input_keys_ignored() {
        let converter = Converter::new();
        let input = input_map(json!({
            "id": 1,
            "name": "a",
            "active": true,
            "undeclared": "whatever"
        }));

        let Value::Record(fields) = converter.convert(&user_schema(), &input).unwrap()
        else {
            panic!("expected record");
        };
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn test_nested_record_and_dotted_error_path() {
        let schema = parse(
            r#"{
                "type": "record",
                "name": "Order",
                "fields": [
                    {"name": "address", "type": {
                        "type": "record",
                        "name": "Address",
                        "fields": [
                            {"name": "city", "type": "string"},
                            {"name": "zip", "type": "int"}
                        ]
                    }}
                ]
            }"#,
        );
        let converter = Converter::new();

        let input = input_map(json!({"address": {"city": "NYC", "zip": "10001"}}));
        let Value::Record(fields) = converter.convert(&schema, &input).unwrap() else {
            panic!("expected record");
        };
        assert_eq!(
            fields[0].1,
            Value::Record(vec![
                ("city".into(), Value::String("NYC".into())),
                ("zip".into(), Value::Int(10_001)),
            ])
        );

        let input = input_map(json!({"address": {"city": "NYC", "zip": true}}));
        let err = converter.convert(&schema, &input).unwrap_err();
        assert_eq!(err.path(), "address.zip");
    }

    #[test]
    fn test_record_field_requires_mapping() {
        let schema = parse(
            r#"{
                "type": "record",
                "name": "Order",
                "fields": [
                    {"name": "address", "type": {
                        "type": "record",
                        "name": "Address",
                        "fields": [{"name": "city", "type": "string"}]
                    }}
                ]
            }"#,
        );
        let converter = Converter::new();
        let input = input_map(json!({"address": "not a map"}));

        let err = converter.convert(&schema, &input).unwrap_err();
        assert_eq!(err.code(), "NESTED_RECORD_SHAPE_MISMATCH");
        assert_eq!(err.path(), "address");
    }

    #[test]
    fn test_array_elements_converted_with_indexed_paths() {
        let schema = parse(
            r#"{
                "type": "record",
                "name": "Post",
                "fields": [
                    {"name": "scores", "type": {"type": "array", "items": "long"}}
                ]
            }"#,
        );
        let converter = Converter::new();

        let input = input_map(json!({"scores": [1, "2", 3]}));
        let Value::Record(fields) = converter.convert(&schema, &input).unwrap() else {
            panic!("expected record");
        };
        assert_eq!(
            fields[0].1,
            Value::Array(vec![Value::Long(1), Value::Long(2), Value::Long(3)])
        );

        let input = input_map(json!({"scores": [1, true, 3]}));
        let err = converter.convert(&schema, &input).unwrap_err();
        assert_eq!(err.path(), "scores[1]");
    }

    #[test]
    fn test_array_field_requires_sequence() {
        let schema = parse(
            r#"{
                "type": "record",
                "name": "Post",
                "fields": [
                    {"name": "scores", "type": {"type": "array", "items": "long"}}
                ]
            }"#,
        );
        let converter = Converter::new();
        let input = input_map(json!({"scores": 7}));

        let err = converter.convert(&schema, &input).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_SOURCE_SHAPE");
    }

    #[test]
    fn test_ambiguous_union_surfaces_before_conversion() {
        let schema = parse(
            r#"{
                "type": "record",
                "name": "Event",
                "fields": [
                    {"name": "payload", "type": ["null", "string", "long"]}
                ]
            }"#,
        );
        let converter = Converter::new();
        let input = input_map(json!({"payload": "x"}));

        let err = converter.convert(&schema, &input).unwrap_err();
        assert_eq!(err.code(), "AMBIGUOUS_UNION");
        assert_eq!(err.path(), "payload");
    }

    #[test]
    fn test_unsupported_schema_kind_rejected() {
        let schema = parse(
            r#"{
                "type": "record",
                "name": "Event",
                "fields": [
                    {"name": "attrs", "type": {"type": "map", "values": "string"}}
                ]
            }"#,
        );
        let converter = Converter::new();
        let input = input_map(json!({"attrs": {"k": "v"}}));

        let err = converter.convert(&schema, &input).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_SCHEMA");
        assert_eq!(err.path(), "attrs");
    }

    #[test]
    fn test_top_level_schema_must_be_record() {
        let converter = Converter::new();
        let err = converter
            .convert(&parse(r#""long""#), &HashMap::new())
            .unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_SCHEMA");
        assert_eq!(err.path(), "$root");
    }
}

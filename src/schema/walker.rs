//! Declared-type resolution
//!
//! Unwraps nullability and classifies logical-type annotations so the
//! conversion engine can dispatch on a closed set of tags instead of
//! re-inspecting raw [`Schema`] values at every call site.

use apache_avro::schema::UnionSchema;
use apache_avro::Schema;

use super::errors::{SchemaError, SchemaResult};

/// Logical-type annotation attached to an effective schema.
///
/// Closed enumeration: adding a new supported logical type extends this
/// enum and the conversion dispatch is checked exhaustively by the
/// compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    /// Day count since the Unix epoch, stored as int
    Date,
    /// Milliseconds since midnight, stored as int
    TimeMillis,
    /// Microseconds since midnight, stored as long
    TimeMicros,
    /// Epoch milliseconds, stored as long
    TimestampMillis,
    /// Epoch microseconds, stored as long
    TimestampMicros,
    /// Epoch milliseconds of an offset-less date-time anchored to UTC
    LocalTimestampMillis,
    /// Epoch microseconds of an offset-less date-time anchored to UTC
    LocalTimestampMicros,
    /// Fixed-point decimal, stored as the unscaled integer's bytes
    Decimal {
        /// Maximum number of decimal digits
        precision: usize,
        /// Number of fractional digits
        scale: usize,
    },
    /// Canonical UUID, stored as string
    Uuid,
}

impl LogicalType {
    /// Returns the Avro name of the logical type for error messages
    pub fn name(&self) -> &'static str {
        match self {
            LogicalType::Date => "date",
            LogicalType::TimeMillis => "time-millis",
            LogicalType::TimeMicros => "time-micros",
            LogicalType::TimestampMillis => "timestamp-millis",
            LogicalType::TimestampMicros => "timestamp-micros",
            LogicalType::LocalTimestampMillis => "local-timestamp-millis",
            LogicalType::LocalTimestampMicros => "local-timestamp-micros",
            LogicalType::Decimal { .. } => "decimal",
            LogicalType::Uuid => "uuid",
        }
    }
}

/// A nullable union reduced to its parts.
///
/// Variant indexes are preserved so the converted value can be wrapped
/// in the `Value::Union` position the downstream encoder expects.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedUnion<'a> {
    /// Index of the null branch, if the union has one
    pub null_index: Option<u32>,
    /// Index of the single concrete branch
    pub variant_index: u32,
    /// The single concrete branch
    pub variant: &'a Schema,
}

/// Resolves a declared schema to its effective (non-null) schema.
///
/// A union of null plus exactly one concrete branch resolves to that
/// branch. Any other union shape is an error. Non-union schemas resolve
/// to themselves.
pub fn effective_schema<'a>(declared: &'a Schema, path: &str) -> SchemaResult<&'a Schema> {
    match declared {
        Schema::Union(union) => Ok(resolve_union(union, path)?.variant),
        other => Ok(other),
    }
}

/// Reduces a union to its null branch and single concrete branch.
pub(crate) fn resolve_union<'a>(
    union: &'a UnionSchema,
    path: &str,
) -> SchemaResult<ResolvedUnion<'a>> {
    let mut null_index = None;
    let mut concrete = None;
    let mut non_null = 0;

    for (idx, variant) in union.variants().iter().enumerate() {
        if matches!(variant, Schema::Null) {
            null_index = Some(idx as u32);
        } else {
            non_null += 1;
            concrete = Some((idx as u32, variant));
        }
    }

    match concrete {
        Some((variant_index, variant)) if non_null == 1 => Ok(ResolvedUnion {
            null_index,
            variant_index,
            variant,
        }),
        _ => Err(SchemaError::AmbiguousUnion {
            path: path.to_string(),
            non_null,
        }),
    }
}

/// Returns the logical-type tag of an effective schema, if any.
///
/// `apache-avro` folds logical-type attributes into dedicated schema
/// variants at parse time, so classification is a plain match. Scale
/// and precision for decimals come from the schema's own declared
/// metadata, never from loose props.
pub fn logical_type_of(schema: &Schema) -> Option<LogicalType> {
    match schema {
        Schema::Date => Some(LogicalType::Date),
        Schema::TimeMillis => Some(LogicalType::TimeMillis),
        Schema::TimeMicros => Some(LogicalType::TimeMicros),
        Schema::TimestampMillis => Some(LogicalType::TimestampMillis),
        Schema::TimestampMicros => Some(LogicalType::TimestampMicros),
        Schema::LocalTimestampMillis => Some(LogicalType::LocalTimestampMillis),
        Schema::LocalTimestampMicros => Some(LogicalType::LocalTimestampMicros),
        Schema::Decimal(inner) => Some(LogicalType::Decimal {
            precision: inner.precision,
            scale: inner.scale,
        }),
        Schema::Uuid => Some(LogicalType::Uuid),
        _ => None,
    }
}

/// Returns the Avro name of a schema's kind for error messages.
pub fn schema_kind_name(schema: &Schema) -> &'static str {
    match schema {
        Schema::Null => "null",
        Schema::Boolean => "boolean",
        Schema::Int => "int",
        Schema::Long => "long",
        Schema::Float => "float",
        Schema::Double => "double",
        Schema::Bytes => "bytes",
        Schema::String => "string",
        Schema::Array(_) => "array",
        Schema::Map(_) => "map",
        Schema::Union(_) => "union",
        Schema::Record(_) => "record",
        Schema::Enum(_) => "enum",
        Schema::Fixed(_) => "fixed",
        Schema::Decimal(_) => "decimal",
        Schema::BigDecimal => "big-decimal",
        Schema::Uuid => "uuid",
        Schema::Date => "date",
        Schema::TimeMillis => "time-millis",
        Schema::TimeMicros => "time-micros",
        Schema::TimestampMillis => "timestamp-millis",
        Schema::TimestampMicros => "timestamp-micros",
        Schema::TimestampNanos => "timestamp-nanos",
        Schema::LocalTimestampMillis => "local-timestamp-millis",
        Schema::LocalTimestampMicros => "local-timestamp-micros",
        Schema::LocalTimestampNanos => "local-timestamp-nanos",
        Schema::Duration => "duration",
        _ => "named-reference",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Schema {
        Schema::parse_str(json).unwrap()
    }

    #[test]
    fn test_non_union_resolves_to_itself() {
        let schema = parse(r#""long""#);
        let effective = effective_schema(&schema, "n").unwrap();
        assert!(matches!(effective, Schema::Long));
    }

    #[test]
    fn test_nullable_union_resolves_to_concrete_branch() {
        let schema = parse(r#"["null", "string"]"#);
        let effective = effective_schema(&schema, "name").unwrap();
        assert!(matches!(effective, Schema::String));
    }

    #[test]
    fn test_union_variant_indexes_preserved() {
        let schema = parse(r#"["null", "int"]"#);
        let Schema::Union(ref union) = schema else {
            panic!("expected union");
        };
        let resolved = resolve_union(union, "n").unwrap();
        assert_eq!(resolved.null_index, Some(0));
        assert_eq!(resolved.variant_index, 1);

        let schema = parse(r#"["int", "null"]"#);
        let Schema::Union(ref union) = schema else {
            panic!("expected union");
        };
        let resolved = resolve_union(union, "n").unwrap();
        assert_eq!(resolved.null_index, Some(1));
        assert_eq!(resolved.variant_index, 0);
    }

    #[test]
    fn test_multi_branch_union_is_ambiguous() {
        let schema = parse(r#"["null", "string", "int"]"#);
        let err = effective_schema(&schema, "payload").unwrap_err();
        assert_eq!(
            err,
            SchemaError::AmbiguousUnion {
                path: "payload".into(),
                non_null: 2,
            }
        );
    }

    #[test]
    fn test_null_only_union_is_ambiguous() {
        let schema = parse(r#"["null"]"#);
        let err = effective_schema(&schema, "payload").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::AmbiguousUnion { non_null: 0, .. }
        ));
    }

    #[test]
    fn test_logical_type_of_date() {
        let schema = parse(r#"{"type": "int", "logicalType": "date"}"#);
        assert_eq!(logical_type_of(&schema), Some(LogicalType::Date));
    }

    #[test]
    fn test_logical_type_of_timestamps() {
        let schema = parse(r#"{"type": "long", "logicalType": "timestamp-millis"}"#);
        assert_eq!(logical_type_of(&schema), Some(LogicalType::TimestampMillis));

        let schema = parse(r#"{"type": "long", "logicalType": "timestamp-micros"}"#);
        assert_eq!(logical_type_of(&schema), Some(LogicalType::TimestampMicros));

        let schema = parse(r#"{"type": "long", "logicalType": "local-timestamp-micros"}"#);
        assert_eq!(
            logical_type_of(&schema),
            Some(LogicalType::LocalTimestampMicros)
        );
    }

    #[test]
    fn test_logical_type_of_decimal_carries_declared_metadata() {
        let schema = parse(
            r#"{"type": "bytes", "logicalType": "decimal", "precision": 10, "scale": 2}"#,
        );
        assert_eq!(
            logical_type_of(&schema),
            Some(LogicalType::Decimal {
                precision: 10,
                scale: 2,
            })
        );
    }

    #[test]
    fn test_logical_type_of_uuid() {
        let schema = parse(r#"{"type": "string", "logicalType": "uuid"}"#);
        assert_eq!(logical_type_of(&schema), Some(LogicalType::Uuid));
    }

    #[test]
    fn test_plain_primitives_have_no_logical_type() {
        assert_eq!(logical_type_of(&parse(r#""int""#)), None);
        assert_eq!(logical_type_of(&parse(r#""string""#)), None);
        assert_eq!(logical_type_of(&parse(r#""bytes""#)), None);
    }

    #[test]
    fn test_logical_type_names() {
        assert_eq!(LogicalType::Date.name(), "date");
        assert_eq!(LogicalType::TimeMicros.name(), "time-micros");
        assert_eq!(
            LogicalType::Decimal {
                precision: 4,
                scale: 1,
            }
            .name(),
            "decimal"
        );
        assert_eq!(LogicalType::Uuid.name(), "uuid");
    }

    #[test]
    fn test_schema_kind_names() {
        assert_eq!(schema_kind_name(&parse(r#""boolean""#)), "boolean");
        assert_eq!(
            schema_kind_name(&parse(r#"{"type": "map", "values": "long"}"#)),
            "map"
        );
        assert_eq!(
            schema_kind_name(&parse(
                r#"{"type": "fixed", "name": "digest", "size": 16}"#
            )),
            "fixed"
        );
    }
}

//! recast - strict, schema-directed coercion of loosely-typed values
//! into Avro records
//!
//! The crate sits between upstream ingestion (decoded JSON, application
//! objects) and the Avro binary encoder: callers hand it an
//! [`apache_avro::Schema`] and a field-name/value map, and receive a
//! fully typed [`apache_avro::types::Value`] record ready for
//! `apache_avro::to_avro_datum`.

pub mod convert;
pub mod schema;
pub mod value;

pub use convert::{CoercionError, ConvertResult, Converter, ConverterConfig};
pub use schema::{LogicalType, SchemaError};
pub use value::InputValue;

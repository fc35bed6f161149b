//! Schema walking subsystem for recast
//!
//! Declared field types arrive as [`apache_avro::Schema`] values loaded by an
//! external schema-management component. Before any value is coerced, the
//! walker answers two questions about a declared type: what is its *effective*
//! (non-null) schema after unwrapping a nullable union, and does the effective
//! schema carry a logical-type annotation.
//!
//! # Design Principles
//!
//! - Pure functions of the schema; no state, no side effects
//! - Safe to call concurrently from any number of conversions
//! - Ambiguous unions abort before any conversion work
//! - Unsupported schema kinds fail explicitly, never best-effort

mod errors;
mod walker;

pub use errors::{SchemaError, SchemaResult};
pub use walker::{effective_schema, logical_type_of, schema_kind_name, LogicalType};

pub(crate) use walker::resolve_union;

//! Schema walking errors
//!
//! Raised while resolving a declared schema, before any value conversion
//! work happens for the field. Every error carries the dotted/indexed
//! path of the field whose declared type could not be resolved.

use thiserror::Error;

/// Result type for schema walking operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while resolving a declared schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Union cannot be reduced to one nullable concrete type
    #[error(
        "field '{path}': union must contain exactly one non-null branch, found {non_null}"
    )]
    AmbiguousUnion {
        /// Dotted/indexed path of the offending field
        path: String,
        /// Number of non-null branches in the union
        non_null: usize,
    },

    /// Schema kind has no conversion rule
    #[error("field '{path}': schema kind '{kind}' has no conversion rule")]
    UnsupportedSchema {
        /// Dotted/indexed path of the offending field
        path: String,
        /// Avro name of the unsupported schema kind
        kind: &'static str,
    },
}

impl SchemaError {
    /// Stable error code for API responses and logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::AmbiguousUnion { .. } => "AMBIGUOUS_UNION",
            Self::UnsupportedSchema { .. } => "UNSUPPORTED_SCHEMA",
        }
    }

    /// Path of the field whose declared type could not be resolved
    pub fn path(&self) -> &str {
        match self {
            Self::AmbiguousUnion { path, .. } => path,
            Self::UnsupportedSchema { path, .. } => path,
        }
    }
}

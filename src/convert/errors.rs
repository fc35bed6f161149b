//! Conversion errors
//!
//! A single malformed field aborts the whole record conversion: errors
//! propagate up through the record/array recursion without local
//! recovery. Every variant carries the dotted/indexed field path
//! (`order.lines[2].price`), the expected type, and a description of
//! the actual input, sufficient to pinpoint the offending value without
//! re-running with tracing.

use thiserror::Error;

use crate::schema::SchemaError;
use crate::value::InputValue;

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, CoercionError>;

/// Errors raised while coercing input values to schema types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// Input shape has no conversion rule for the target type
    #[error("field '{path}': no conversion from {actual} to {expected}")]
    UnsupportedSourceShape {
        /// Dotted/indexed path of the offending field
        path: String,
        /// Target type the schema declares
        expected: String,
        /// Runtime shape of the input value
        actual: &'static str,
    },

    /// String-to-typed-value parse failed
    #[error("field '{path}': cannot parse {input:?} as {expected}: {reason}")]
    ParseFailure {
        /// Dotted/indexed path of the offending field
        path: String,
        /// Target type the schema declares
        expected: String,
        /// The input text that failed to parse
        input: String,
        /// Parser's reason
        reason: String,
    },

    /// Decimal rescale to the declared scale would lose precision
    #[error("field '{path}': rescaling {value} to scale {scale} would lose precision")]
    RescaleLoss {
        /// Dotted/indexed path of the offending field
        path: String,
        /// The decimal value as written
        value: String,
        /// Scale declared by the schema
        scale: usize,
    },

    /// Record-typed field's input is not a field mapping
    #[error("field '{path}': nested record requires a field mapping, got {actual}")]
    NestedRecordShapeMismatch {
        /// Dotted/indexed path of the offending field
        path: String,
        /// Runtime shape of the input value
        actual: &'static str,
    },

    /// Non-nullable field has no value
    #[error("field '{path}': missing value for non-nullable {expected}")]
    MissingValue {
        /// Dotted/indexed path of the offending field
        path: String,
        /// Target type the schema declares
        expected: String,
    },

    /// Declared schema could not be resolved
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl CoercionError {
    /// Input shape has no rule for the target type
    pub(crate) fn unsupported(
        path: &str,
        expected: impl Into<String>,
        actual: &InputValue,
    ) -> Self {
        Self::UnsupportedSourceShape {
            path: path.to_string(),
            expected: expected.into(),
            actual: actual.shape_name(),
        }
    }

    /// String-to-typed-value parse failed
    pub(crate) fn parse_failure(
        path: &str,
        expected: impl Into<String>,
        input: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ParseFailure {
            path: path.to_string(),
            expected: expected.into(),
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code for API responses and logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedSourceShape { .. } => "UNSUPPORTED_SOURCE_SHAPE",
            Self::ParseFailure { .. } => "PARSE_FAILURE",
            Self::RescaleLoss { .. } => "RESCALE_LOSS",
            Self::NestedRecordShapeMismatch { .. } => "NESTED_RECORD_SHAPE_MISMATCH",
            Self::MissingValue { .. } => "MISSING_VALUE",
            Self::Schema(inner) => inner.code(),
        }
    }

    /// Path of the field whose value failed to convert
    pub fn path(&self) -> &str {
        match self {
            Self::UnsupportedSourceShape { path, .. } => path,
            Self::ParseFailure { path, .. } => path,
            Self::RescaleLoss { path, .. } => path,
            Self::NestedRecordShapeMismatch { path, .. } => path,
            Self::MissingValue { path, .. } => path,
            Self::Schema(inner) => inner.path(),
        }
    }
}

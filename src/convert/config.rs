//! Converter configuration
//!
//! Two conversion behaviors are policy rather than fixed semantics:
//! what to do when a non-nullable field has no value, and what to do
//! when a decimal must be rescaled with precision loss. Both default to
//! rejection; the permissive alternatives exist for callers migrating
//! from producers that relied on the looser behavior.

use serde::{Deserialize, Serialize};

/// Strategy for a missing or null value on a non-nullable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingValuePolicy {
    /// Fail the conversion (default).
    #[default]
    Reject,
    /// Write null and let the downstream encoder be the authority.
    WriteNull,
}

impl MissingValuePolicy {
    /// Parse from a config option value.
    pub fn from_option_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reject" => Some(Self::Reject),
            "write-null" => Some(Self::WriteNull),
            _ => None,
        }
    }
}

/// Strategy for rescaling a decimal to the schema's declared scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RescalePolicy {
    /// Fail if the rescale is not exact (default).
    #[default]
    Reject,
    /// Round half-up to the declared scale.
    Round,
}

impl RescalePolicy {
    /// Parse from a config option value.
    pub fn from_option_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reject" => Some(Self::Reject),
            "round" => Some(Self::Round),
            _ => None,
        }
    }
}

/// Converter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// How to handle missing values on non-nullable fields.
    pub missing_values: MissingValuePolicy,

    /// How to handle inexact decimal rescales.
    pub rescale: RescalePolicy,
}

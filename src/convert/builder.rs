//! Record builder
//!
//! Conversion populates output fields one at a time in schema order. The
//! builder owns the slots while the record is partial; only `freeze`
//! produces a `Value::Record`, so a half-built record cannot escape on
//! an early error path (the builder is dropped with the call frame).

use apache_avro::types::Value;

/// Mutable build target for one record conversion.
pub(crate) struct RecordBuilder {
    expected: usize,
    fields: Vec<(String, Value)>,
}

impl RecordBuilder {
    /// Creates a builder for a record with `expected` declared fields.
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            fields: Vec::with_capacity(expected),
        }
    }

    /// Appends the next field slot in schema order.
    pub fn push(&mut self, name: &str, value: Value) {
        self.fields.push((name.to_string(), value));
    }

    /// Freezes the builder into an immutable record value.
    ///
    /// Callers must have pushed every declared field; the field loop in
    /// the coercer guarantees this by construction.
    pub fn freeze(self) -> Value {
        debug_assert_eq!(self.fields.len(), self.expected);
        Value::Record(self.fields)
    }
}

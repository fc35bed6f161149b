//! Input value model for recast
//!
//! Upstream producers hand the engine loosely-typed data: decoded JSON,
//! application objects, native date-time values. The engine accepts them
//! through [`InputValue`], a closed sum type over every runtime shape a
//! conversion rule exists for, so "unsupported shape" is an enumerable
//! match arm rather than a runtime class-check cascade.

mod types;

pub use types::InputValue;

//! Configuration schema engine
//!
//! Validates a raw configuration document against a composed schema and
//! produces a normalized copy: defaults filled in, scalars coerced
//! (durations, temperatures, boolean tokens, enum tokens), identifiers
//! declared, and expression strings syntax-checked. The input document is
//! never mutated.
//!
//! Validation accumulates: every problem in a node is collected before the
//! node is rejected, so one compilation attempt reports as much as possible.

mod coerce;
mod error;
mod schema;
mod value;

pub use error::{SchemaError, SchemaResult, ValidationErrors};
pub use schema::{KeyRequirement, Schema, ValidationContext, Validator};
pub use value::ConfigValue;

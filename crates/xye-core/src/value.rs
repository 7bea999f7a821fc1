//! Literal and deferred parameter values carried by instructions

use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal scalar bound to an action parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for ConstValue {
    fn from(v: bool) -> Self {
        ConstValue::Bool(v)
    }
}

impl From<i64> for ConstValue {
    fn from(v: i64) -> Self {
        ConstValue::Int(v)
    }
}

impl From<f64> for ConstValue {
    fn from(v: f64) -> Self {
        ConstValue::Float(v)
    }
}

impl From<String> for ConstValue {
    fn from(v: String) -> Self {
        ConstValue::Str(v)
    }
}

impl From<&str> for ConstValue {
    fn from(v: &str) -> Self {
        ConstValue::Str(v.to_string())
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Bool(v) => write!(f, "{}", v),
            ConstValue::Int(v) => write!(f, "{}", v),
            ConstValue::Float(v) => write!(f, "{}", v),
            ConstValue::Str(v) => f.write_str(v),
        }
    }
}

/// The value bound to an emitted action parameter
///
/// Either a literal fixed at compile time, or a deferred expression the
/// consumer evaluates in its own execution context when the action fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    Literal(ConstValue),
    Deferred { expression: String },
}

impl ParamValue {
    /// Whether this value requires evaluation at the consumer's runtime
    pub fn is_deferred(&self) -> bool {
        matches!(self, ParamValue::Deferred { .. })
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Literal(v) => write!(f, "{}", v),
            ParamValue::Deferred { expression } => write!(f, "deferred({})", expression),
        }
    }
}

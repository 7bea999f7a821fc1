//! The configuration document tree

use crate::error::{SchemaError, SchemaResult};
use indexmap::IndexMap;
use std::time::Duration;
use xye_core::KeyPath;

/// One value in a configuration document
///
/// Raw documents contain only the YAML-shaped variants (`Null`, `Bool`,
/// `Int`, `Float`, `Str`, `List`, `Map`). `Duration` and `Expr` appear only
/// in normalized output, produced by the duration and templatable
/// validators.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Duration(Duration),
    Expr(String),
    List(Vec<ConfigValue>),
    Map(IndexMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Parse a YAML document into a configuration tree
    ///
    /// Mapping keys must be strings; YAML tags are not part of the document
    /// format.
    pub fn from_yaml_str(input: &str) -> SchemaResult<Self> {
        let parsed: serde_yaml::Value = serde_yaml::from_str(input)?;
        Self::from_yaml(&parsed, &KeyPath::root())
    }

    fn from_yaml(value: &serde_yaml::Value, path: &KeyPath) -> SchemaResult<Self> {
        match value {
            serde_yaml::Value::Null => Ok(ConfigValue::Null),
            serde_yaml::Value::Bool(b) => Ok(ConfigValue::Bool(*b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(ConfigValue::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(ConfigValue::Float(f))
                } else {
                    Err(SchemaError::InvalidValue {
                        path: path.clone(),
                        message: format!("unrepresentable number '{}'", n),
                    })
                }
            }
            serde_yaml::Value::String(s) => Ok(ConfigValue::Str(s.clone())),
            serde_yaml::Value::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for (i, item) in seq.iter().enumerate() {
                    items.push(Self::from_yaml(item, &path.index(i))?);
                }
                Ok(ConfigValue::List(items))
            }
            serde_yaml::Value::Mapping(map) => {
                let mut out = IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    let key = key.as_str().ok_or_else(|| SchemaError::InvalidValue {
                        path: path.clone(),
                        message: "mapping keys must be strings".to_string(),
                    })?;
                    out.insert(key.to_string(), Self::from_yaml(item, &path.key(key))?);
                }
                Ok(ConfigValue::Map(out))
            }
            serde_yaml::Value::Tagged(tagged) => Err(SchemaError::InvalidValue {
                path: path.clone(),
                message: format!("unsupported YAML tag '{}'", tagged.tag),
            }),
        }
    }

    /// A short name for the value's shape, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Int(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::Str(_) => "string",
            ConfigValue::Duration(_) => "duration",
            ConfigValue::Expr(_) => "expression",
            ConfigValue::List(_) => "list",
            ConfigValue::Map(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            ConfigValue::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, ConfigValue>> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Consume the value, yielding the mapping if it is one
    pub fn into_map(self) -> Option<IndexMap<String, ConfigValue>> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Int(v)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Str(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        let doc = ConfigValue::from_yaml_str("period: 1s\nbeeper: true\ncount: 3\nstep: 0.5").unwrap();
        let map = doc.as_map().unwrap();
        assert_eq!(map["period"], ConfigValue::Str("1s".to_string()));
        assert_eq!(map["beeper"], ConfigValue::Bool(true));
        assert_eq!(map["count"], ConfigValue::Int(3));
        assert_eq!(map["step"], ConfigValue::Float(0.5));
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let doc = ConfigValue::from_yaml_str("b: 1\na: 2\nc: 3").unwrap();
        let keys: Vec<&String> = doc.as_map().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_parse_nested() {
        let doc = ConfigValue::from_yaml_str(
            "supported_modes:\n  - COOL\n  - HEAT\nvisual:\n  min_temperature: 17",
        )
        .unwrap();
        let map = doc.as_map().unwrap();
        assert_eq!(map["supported_modes"].as_list().unwrap().len(), 2);
        assert!(map["visual"].as_map().is_some());
    }

    #[test]
    fn test_parse_rejects_non_string_keys() {
        let err = ConfigValue::from_yaml_str("1: value").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { .. }));
    }

    #[test]
    fn test_parse_rejects_tags() {
        let err = ConfigValue::from_yaml_str("key: !custom value").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { .. }));
    }

    #[test]
    fn test_parse_rejects_bad_yaml() {
        let err = ConfigValue::from_yaml_str("key: [unclosed").unwrap_err();
        assert!(matches!(err, SchemaError::Yaml { .. }));
    }

    #[test]
    fn test_as_float_widens_int() {
        assert_eq!(ConfigValue::Int(24).as_float(), Some(24.0));
        assert_eq!(ConfigValue::Float(24.5).as_float(), Some(24.5));
        assert_eq!(ConfigValue::Str("24".to_string()).as_float(), None);
    }

    #[test]
    fn test_null_document() {
        let doc = ConfigValue::from_yaml_str("").unwrap();
        assert!(doc.is_null());
    }
}

//! Validated identifiers and entity kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for invalid identifiers
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier cannot be empty")]
    Empty,

    #[error("identifier must start with a lowercase letter or underscore")]
    InvalidStart,

    #[error("identifier contains invalid characters (must be lowercase alphanumeric with underscores)")]
    InvalidChars,
}

/// A validated configuration identifier (e.g., "air_conditioner_1")
///
/// Identifiers name declared entities and are referenced from elsewhere in
/// the same document. They follow the C identifier shape, lowercase only:
/// a letter or underscore followed by letters, digits, or underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Create a new Identifier, validating its shape
    pub fn new(name: impl Into<String>) -> Result<Self, IdentifierError> {
        let name = name.into();

        let mut chars = name.chars();
        match chars.next() {
            None => return Err(IdentifierError::Empty),
            Some(c) if c.is_ascii_lowercase() || c == '_' => {}
            Some(_) => return Err(IdentifierError::InvalidStart),
        }
        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(IdentifierError::InvalidChars);
        }

        Ok(Self(name))
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> String {
        id.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of a declared entity
///
/// References resolve against a declared kind; a reference naming an
/// existing identifier of the wrong kind is a kind mismatch, not a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Device,
    Sensor,
    SerialBus,
    Transmitter,
    Action,
}

impl EntityKind {
    /// The lowercase name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Device => "device",
            EntityKind::Sensor => "sensor",
            EntityKind::SerialBus => "serial_bus",
            EntityKind::Transmitter => "transmitter",
            EntityKind::Action => "action",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved reference: an identifier together with its declared kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle {
    id: Identifier,
    kind: EntityKind,
}

impl EntityHandle {
    /// Create a handle for a declared entity
    pub fn new(id: Identifier, kind: EntityKind) -> Self {
        Self { id, kind }
    }

    /// The entity's identifier
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// The entity's declared kind
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Consume the handle, returning the identifier
    pub fn into_id(self) -> Identifier {
        self.id
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifier() {
        let id = Identifier::new("air_conditioner_1").unwrap();
        assert_eq!(id.as_str(), "air_conditioner_1");
        assert_eq!(id.to_string(), "air_conditioner_1");
    }

    #[test]
    fn test_leading_underscore_allowed() {
        assert!(Identifier::new("_internal").is_ok());
    }

    #[test]
    fn test_empty() {
        assert_eq!(Identifier::new("").unwrap_err(), IdentifierError::Empty);
    }

    #[test]
    fn test_invalid_start() {
        assert_eq!(
            Identifier::new("1abc").unwrap_err(),
            IdentifierError::InvalidStart
        );
        assert_eq!(
            Identifier::new("Upper").unwrap_err(),
            IdentifierError::InvalidStart
        );
    }

    #[test]
    fn test_invalid_chars() {
        assert_eq!(
            Identifier::new("with-dash").unwrap_err(),
            IdentifierError::InvalidChars
        );
        assert_eq!(
            Identifier::new("with space").unwrap_err(),
            IdentifierError::InvalidChars
        );
        assert_eq!(
            Identifier::new("caseSensitive").unwrap_err(),
            IdentifierError::InvalidChars
        );
    }

    #[test]
    fn test_parse() {
        let id: Identifier = "uart_bus".parse().unwrap();
        assert_eq!(id.as_str(), "uart_bus");
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = Identifier::new("outdoor_temperature_1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"outdoor_temperature_1\"");

        let parsed: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        assert!(serde_json::from_str::<Identifier>("\"Not Valid\"").is_err());
    }

    #[test]
    fn test_entity_kind_display() {
        assert_eq!(EntityKind::Device.to_string(), "device");
        assert_eq!(EntityKind::SerialBus.to_string(), "serial_bus");
    }

    #[test]
    fn test_entity_handle() {
        let handle = EntityHandle::new(
            Identifier::new("ac_unit").unwrap(),
            EntityKind::Device,
        );
        assert_eq!(handle.to_string(), "device 'ac_unit'");
        assert_eq!(handle.into_id().as_str(), "ac_unit");
    }
}

//! Validation error types

use std::fmt;
use thiserror::Error;
use xye_core::KeyPath;
use xye_registry::RegistryError;
use xye_template::TemplateError;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A single validation failure, located by its key path
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{path}: missing required key")]
    MissingKey { path: KeyPath },

    #[error("{path}: unknown key")]
    UnknownKey { path: KeyPath },

    #[error("{path}: key requires the '{component}' component to be loaded")]
    UnsupportedKey { path: KeyPath, component: String },

    #[error("{path}: invalid value '{value}'; legal values are {allowed:?}")]
    InvalidEnumValue {
        path: KeyPath,
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("{path}: {message}")]
    InvalidValue { path: KeyPath, message: String },

    #[error("{path}: {source}")]
    Identifier {
        path: KeyPath,
        #[source]
        source: RegistryError,
    },

    #[error("{path}: {source}")]
    Expression {
        path: KeyPath,
        #[source]
        source: TemplateError,
    },

    #[error("failed to parse configuration: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
}

impl SchemaError {
    /// The document location this error points at, if it has one
    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            SchemaError::MissingKey { path }
            | SchemaError::UnknownKey { path }
            | SchemaError::UnsupportedKey { path, .. }
            | SchemaError::InvalidEnumValue { path, .. }
            | SchemaError::InvalidValue { path, .. }
            | SchemaError::Identifier { path, .. }
            | SchemaError::Expression { path, .. } => Some(path),
            SchemaError::Yaml { .. } => None,
        }
    }
}

/// Every validation failure found in one node, reported together
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<SchemaError>,
}

impl ValidationErrors {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one error
    pub fn push(&mut self, error: SchemaError) {
        self.errors.push(error);
    }

    /// Absorb another collection, keeping order
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Whether anything was collected
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of collected errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the collected errors in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.errors.iter()
    }

    /// Consume the collection
    pub fn into_vec(self) -> Vec<SchemaError> {
        self.errors
    }
}

impl From<SchemaError> for ValidationErrors {
    fn from(error: SchemaError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

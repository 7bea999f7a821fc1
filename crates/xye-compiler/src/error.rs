//! Compilation diagnostics

use std::fmt;
use thiserror::Error;
use xye_actions::ActionError;
use xye_core::KeyPath;
use xye_registry::RegistryError;
use xye_schema::{SchemaError, ValidationErrors};

/// Result type for whole-compilation operations
pub type CompileResult<T> = Result<T, Diagnostics>;

/// One problem found during compilation
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Action(ActionError),

    #[error("{path}: {source}")]
    Registry {
        path: KeyPath,
        #[source]
        source: RegistryError,
    },
}

/// Everything that went wrong in one compilation attempt
///
/// A phase inspects as much of the document as it can and reports all of
/// its findings at once instead of stopping at the first problem.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<CompileError>,
}

impl Diagnostics {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one error
    pub fn push(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    /// Add an action error, flattening nested validation failures
    pub fn push_action(&mut self, error: ActionError) {
        match error {
            ActionError::Schema(errors) => {
                for error in errors.into_vec() {
                    self.errors.push(CompileError::Schema(error));
                }
            }
            other => self.errors.push(CompileError::Action(other)),
        }
    }

    /// Lift a validation failure into compilation diagnostics
    pub fn from_validation(errors: ValidationErrors) -> Self {
        Self {
            errors: errors.into_vec().into_iter().map(CompileError::Schema).collect(),
        }
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
    pub fn iter(&self) -> impl Iterator<Item = &CompileError> {
        self.errors.iter()
    }

    /// Consume the collection
    pub fn into_vec(self) -> Vec<CompileError> {
        self.errors
    }
}

impl From<CompileError> for Diagnostics {
    fn from(error: CompileError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "compilation failed with {} error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

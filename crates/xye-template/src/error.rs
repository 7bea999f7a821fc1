//! Error types for expression handling

use thiserror::Error;

/// Result type for expression operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while checking or resolving expressions
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Invalid expression syntax
    #[error("invalid expression syntax: {message}")]
    Syntax { message: String },

    /// Failed to render an expression
    #[error("failed to render expression: {message}")]
    Render { message: String },

    /// Undefined variable in an expression
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    /// The rendered output did not parse as the requested type
    #[error("expected expression to produce {expected}, got '{output}'")]
    ParseOutput {
        expected: &'static str,
        output: String,
    },
}

impl From<minijinja::Error> for TemplateError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::SyntaxError => TemplateError::Syntax {
                message: err.to_string(),
            },
            minijinja::ErrorKind::UndefinedError => TemplateError::UndefinedVariable {
                name: err.to_string(),
            },
            _ => TemplateError::Render {
                message: err.to_string(),
            },
        }
    }
}

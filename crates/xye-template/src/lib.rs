//! Deferred expression values
//!
//! Some configuration values cannot be fixed at compile time: an action
//! parameter may depend on state that only exists when the action actually
//! fires. Such values are written as expression strings (`{{ ... }}`) in the
//! document. Validation syntax-checks them; resolution happens later against
//! an [`ExecutionContext`] supplied by whoever fires the action.
//!
//! # Example
//!
//! ```
//! use xye_template::{ExecutionContext, Expression, Templatable};
//!
//! let value: Templatable<f64> =
//!     Templatable::Deferred(Expression::parse("{{ target_temp + 0.5 }}")?);
//! let ctx = ExecutionContext::new().with_var("target_temp", 24.0.into());
//! assert_eq!(value.resolve(&ctx)?, 24.5);
//! # Ok::<(), xye_template::TemplateError>(())
//! ```

mod error;

pub use error::{TemplateError, TemplateResult};

use indexmap::IndexMap;
use minijinja::{Environment, UndefinedBehavior};
use tracing::debug;

/// Whether a raw string is an expression rather than a literal
///
/// The marker convention is shared with the document format: a string
/// containing `{{` or `{%` is treated as expression source.
pub fn is_expression(raw: &str) -> bool {
    raw.contains("{{") || raw.contains("{%")
}

/// A syntax-checked expression
///
/// Construction compiles the source once to reject malformed expressions at
/// validation time; rendering recompiles in a fresh environment because the
/// environment is not retained between compile time and resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    source: String,
}

impl Expression {
    /// Syntax-check and wrap expression source
    pub fn parse(source: impl Into<String>) -> TemplateResult<Self> {
        let source = source.into();
        let env = Environment::new();
        env.template_from_str(&source)?;
        Ok(Self { source })
    }

    /// The raw expression source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the expression against an execution context
    ///
    /// Undefined variables are errors, not empty output; a deferred value
    /// must never silently resolve to nothing.
    pub fn render(&self, ctx: &ExecutionContext) -> TemplateResult<String> {
        debug!(expression = %self.source, "rendering expression");

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        let tmpl = env.template_from_str(&self.source)?;
        let output = tmpl.render(ctx.variables())?;
        Ok(output)
    }
}

/// Variables available while resolving deferred values
///
/// Supplied by the action's caller at firing time; resolution is pure with
/// respect to the context.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    variables: IndexMap<String, serde_json::Value>,
}

impl ExecutionContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable to the context
    pub fn with_var(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.variables.insert(key.into(), value);
        self
    }

    /// The context's variables
    pub fn variables(&self) -> &IndexMap<String, serde_json::Value> {
        &self.variables
    }
}

/// Types an expression's rendered output can be parsed into
pub trait FromRendered: Sized {
    /// Human-readable type name used in diagnostics
    const TYPE_NAME: &'static str;

    /// Parse the rendered output, returning None on mismatch
    fn from_rendered(rendered: &str) -> Option<Self>;
}

impl FromRendered for bool {
    const TYPE_NAME: &'static str = "a boolean";

    fn from_rendered(rendered: &str) -> Option<Self> {
        let token = rendered.trim();
        if ["true", "yes", "on", "1"]
            .iter()
            .any(|t| token.eq_ignore_ascii_case(t))
        {
            return Some(true);
        }
        if ["false", "no", "off", "0"]
            .iter()
            .any(|t| token.eq_ignore_ascii_case(t))
        {
            return Some(false);
        }
        None
    }
}

impl FromRendered for f64 {
    const TYPE_NAME: &'static str = "a number";

    fn from_rendered(rendered: &str) -> Option<Self> {
        rendered.trim().parse().ok()
    }
}

impl FromRendered for i64 {
    const TYPE_NAME: &'static str = "an integer";

    fn from_rendered(rendered: &str) -> Option<Self> {
        let token = rendered.trim();
        if let Ok(v) = token.parse::<i64>() {
            return Some(v);
        }
        // Jinja arithmetic may print whole numbers with a fraction part
        match token.parse::<f64>() {
            Ok(v) if v.fract() == 0.0 => Some(v as i64),
            _ => None,
        }
    }
}

impl FromRendered for String {
    const TYPE_NAME: &'static str = "a string";

    fn from_rendered(rendered: &str) -> Option<Self> {
        Some(rendered.to_string())
    }
}

/// A value that is either fixed or resolved later in an execution context
///
/// Resolution is pure: resolving the same value in the same context always
/// produces the same result, and a literal never consults the context.
/// Callers resolve a value at most once per action firing.
#[derive(Debug, Clone, PartialEq)]
pub enum Templatable<T> {
    /// A concrete value fixed at compile time
    Literal(T),
    /// An expression evaluated when the action fires
    Deferred(Expression),
}

impl<T> Templatable<T> {
    /// Whether resolution requires an execution context
    pub fn is_deferred(&self) -> bool {
        matches!(self, Templatable::Deferred(_))
    }
}

impl<T: FromRendered + Clone> Templatable<T> {
    /// Resolve to a concrete value
    pub fn resolve(&self, ctx: &ExecutionContext) -> TemplateResult<T> {
        match self {
            Templatable::Literal(value) => Ok(value.clone()),
            Templatable::Deferred(expression) => {
                let output = expression.render(ctx)?;
                T::from_rendered(&output).ok_or(TemplateError::ParseOutput {
                    expected: T::TYPE_NAME,
                    output,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_expression() {
        assert!(is_expression("{{ target_temp }}"));
        assert!(is_expression("{% if on %}1{% endif %}"));
        assert!(!is_expression("24.5"));
        assert!(!is_expression("plain text"));
    }

    #[test]
    fn test_parse_rejects_bad_syntax() {
        let err = Expression::parse("{{ unclosed").unwrap_err();
        assert!(matches!(err, TemplateError::Syntax { .. }));
    }

    #[test]
    fn test_render_with_context() {
        let expr = Expression::parse("{{ temp + 1 }}").unwrap();
        let ctx = ExecutionContext::new().with_var("temp", json!(20));
        assert_eq!(expr.render(&ctx).unwrap(), "21");
    }

    #[test]
    fn test_undefined_variable_is_an_error() {
        let expr = Expression::parse("{{ missing }}").unwrap();
        let err = expr.render(&ExecutionContext::new()).unwrap_err();
        assert!(matches!(err, TemplateError::UndefinedVariable { .. }));
    }

    #[test]
    fn test_literal_resolves_without_context() {
        let value = Templatable::Literal(24.5);
        assert_eq!(value.resolve(&ExecutionContext::new()).unwrap(), 24.5);
        assert!(!value.is_deferred());
    }

    #[test]
    fn test_deferred_resolves_to_float() {
        let value: Templatable<f64> =
            Templatable::Deferred(Expression::parse("{{ target_temp }}").unwrap());
        let ctx = ExecutionContext::new().with_var("target_temp", json!(24.5));
        assert_eq!(value.resolve(&ctx).unwrap(), 24.5);
        assert!(value.is_deferred());
    }

    #[test]
    fn test_deferred_resolves_to_bool() {
        let value: Templatable<bool> =
            Templatable::Deferred(Expression::parse("{{ silent and night }}").unwrap());
        let ctx = ExecutionContext::new()
            .with_var("silent", json!(true))
            .with_var("night", json!(true));
        assert!(value.resolve(&ctx).unwrap());
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let value: Templatable<i64> =
            Templatable::Deferred(Expression::parse("{{ n * 2 }}").unwrap());
        let ctx = ExecutionContext::new().with_var("n", json!(21));
        assert_eq!(value.resolve(&ctx).unwrap(), 42);
        assert_eq!(value.resolve(&ctx).unwrap(), 42);
    }

    #[test]
    fn test_output_type_mismatch() {
        let value: Templatable<f64> =
            Templatable::Deferred(Expression::parse("{{ name }}").unwrap());
        let ctx = ExecutionContext::new().with_var("name", json!("bedroom"));
        let err = value.resolve(&ctx).unwrap_err();
        assert!(matches!(err, TemplateError::ParseOutput { expected, .. } if expected == "a number"));
    }

    #[test]
    fn test_bool_tokens() {
        assert_eq!(bool::from_rendered(" True "), Some(true));
        assert_eq!(bool::from_rendered("off"), Some(false));
        assert_eq!(bool::from_rendered("1"), Some(true));
        assert_eq!(bool::from_rendered("maybe"), None);
    }

    #[test]
    fn test_integer_from_whole_float() {
        assert_eq!(i64::from_rendered("42.0"), Some(42));
        assert_eq!(i64::from_rendered("42.5"), None);
    }
}

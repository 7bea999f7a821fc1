//! Action registration and two-phase action compilation
//!
//! Components register named actions up front: a parameter schema plus a
//! builder that turns validated parameters into instructions. Invocations
//! found in a document are [`prepare`]d during validation (parameters
//! checked, an action identifier allocated) and [`resolve`]d during
//! generation, once every declaration in the run is known.
//!
//! Registration makes every parameter templatable unless its validator is
//! wrapped in [`Validator::Fixed`], and grafts an optional `device_id`
//! parameter onto the schema so any invocation can retarget another device.
//!
//! [`prepare`]: ActionRegistry::prepare
//! [`resolve`]: PendingAction::resolve

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};
use xye_core::{
    ConstValue, EntityHandle, EntityKind, Identifier, IdentifierError, Instruction, KeyPath,
    ParamValue,
};
use xye_registry::{EntityRegistry, RegistryError};
use xye_schema::{ConfigValue, Schema, ValidationContext, ValidationErrors, Validator};
use xye_template::{Expression, Templatable};

/// Parameter naming the device an invocation targets
pub const CONF_DEVICE_ID: &str = "device_id";

/// Result type for action operations
pub type ActionResult<T> = Result<T, ActionError>;

/// Errors raised while registering, preparing, or resolving actions
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action '{name}' is already registered")]
    DuplicateActionName { name: String },

    #[error("{path}: unknown action '{name}'")]
    UnknownAction { path: KeyPath, name: String },

    #[error(transparent)]
    Schema(#[from] ValidationErrors),

    #[error("{path}: {source}")]
    Registry {
        path: KeyPath,
        #[source]
        source: RegistryError,
    },

    #[error("{path}: parameter '{parameter}' {message}")]
    InvalidParameter {
        path: KeyPath,
        parameter: String,
        message: String,
    },

    #[error("action name '{name}' is not a valid identifier")]
    InvalidName {
        name: String,
        #[source]
        source: IdentifierError,
    },
}

/// Builds the parameter-binding instructions for one invocation
pub type ActionBuilder =
    Arc<dyn Fn(&BuildArgs<'_>) -> ActionResult<Vec<Instruction>> + Send + Sync>;

struct RegisteredAction {
    name: String,
    schema: Schema,
    builder: ActionBuilder,
}

/// All actions registered for a compilation run
///
/// Action names are unique. The registry is cheap to share and safe to use
/// from several validation tasks at once.
#[derive(Default)]
pub struct ActionRegistry {
    actions: DashMap<String, Arc<RegisteredAction>>,
}

impl ActionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under a unique name
    ///
    /// The parameter schema is templatized and extended with the implicit
    /// optional `device_id` key before it is stored.
    pub fn register(
        &self,
        name: &str,
        params: Schema,
        builder: impl Fn(&BuildArgs<'_>) -> ActionResult<Vec<Instruction>> + Send + Sync + 'static,
    ) -> ActionResult<()> {
        Identifier::new(name).map_err(|source| ActionError::InvalidName {
            name: name.to_string(),
            source,
        })?;

        let schema = params.templatized().extend(
            Schema::new().optional(CONF_DEVICE_ID, Validator::Reference(EntityKind::Device)),
        );
        match self.actions.entry(name.to_string()) {
            Entry::Occupied(_) => Err(ActionError::DuplicateActionName {
                name: name.to_string(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(RegisteredAction {
                    name: name.to_string(),
                    schema,
                    builder: Arc::new(builder),
                }));
                debug!(action = %name, "registered action");
                Ok(())
            }
        }
    }

    /// Whether an action is registered under this name
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Validate one invocation and stage it for the generation phase
    ///
    /// Parameters are checked against the action's schema and the action's
    /// own identifier is allocated here, during validation, so instruction
    /// output stays deterministic. The target device defaults to the
    /// enclosing device unless the invocation names a `device_id`.
    pub fn prepare(
        &self,
        name: &str,
        body: &ConfigValue,
        path: &KeyPath,
        default_target: &Identifier,
        ctx: &ValidationContext<'_>,
    ) -> ActionResult<PendingAction> {
        let action = match self.actions.get(name) {
            Some(entry) => entry.value().clone(),
            None => {
                return Err(ActionError::UnknownAction {
                    path: path.clone(),
                    name: name.to_string(),
                })
            }
        };

        let normalized = action.schema.validate(body, path, ctx)?;
        let mut params = match normalized {
            ConfigValue::Map(map) => map,
            // validate() only ever yields a mapping on success
            other => {
                return Err(ActionError::InvalidParameter {
                    path: path.clone(),
                    parameter: "<body>".to_string(),
                    message: format!("expected a mapping, got {}", other.type_name()),
                })
            }
        };

        let target = match params.shift_remove(CONF_DEVICE_ID) {
            Some(value) => {
                let raw = value.as_str().unwrap_or_default();
                Identifier::new(raw).map_err(|source| ActionError::Registry {
                    path: path.key(CONF_DEVICE_ID),
                    source: RegistryError::from(source),
                })?
            }
            None => default_target.clone(),
        };

        let id = ctx
            .registry()
            .generate(name, EntityKind::Action)
            .map_err(|source| ActionError::Registry {
                path: path.clone(),
                source,
            })?;
        trace!(action = %name, id = %id, target = %target, "prepared action");

        Ok(PendingAction {
            id,
            action,
            params,
            target,
            path: path.clone(),
        })
    }
}

/// A validated invocation waiting for the generation phase
pub struct PendingAction {
    id: Identifier,
    action: Arc<RegisteredAction>,
    params: IndexMap<String, ConfigValue>,
    target: Identifier,
    path: KeyPath,
}

impl std::fmt::Debug for PendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingAction")
            .field("id", &self.id)
            .field("action", &self.action.name)
            .field("params", &self.params)
            .field("target", &self.target)
            .field("path", &self.path)
            .finish()
    }
}

impl PendingAction {
    /// The identifier allocated for this invocation
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// The registered action name
    pub fn name(&self) -> &str {
        &self.action.name
    }

    /// The device this invocation targets
    pub fn target(&self) -> &Identifier {
        &self.target
    }

    /// Where the invocation appears in the document
    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    /// Resolve the target device and build the invocation's instructions
    ///
    /// The declaring instruction always comes first; whatever the builder
    /// returns follows it in the builder's own order.
    pub async fn resolve(self, registry: &EntityRegistry) -> ActionResult<ActionInvocation> {
        let device = registry
            .resolve(&self.target, EntityKind::Device)
            .await
            .map_err(|source| ActionError::Registry {
                path: self.path.key(CONF_DEVICE_ID),
                source,
            })?;

        let args = BuildArgs {
            id: &self.id,
            name: &self.action.name,
            target: &device,
            params: &self.params,
            path: &self.path,
        };
        let mut instructions = vec![Instruction::DeclareAction {
            id: self.id.clone(),
            action: self.action.name.clone(),
            device: device.id().clone(),
        }];
        instructions.extend((self.action.builder)(&args)?);
        debug!(
            action = %self.action.name,
            id = %self.id,
            device = %device.id(),
            instructions = instructions.len(),
            "resolved action"
        );

        Ok(ActionInvocation {
            id: self.id,
            name: self.action.name.clone(),
            device,
            instructions,
        })
    }
}

/// A fully resolved invocation, ready to emit
#[derive(Debug, Clone, PartialEq)]
pub struct ActionInvocation {
    id: Identifier,
    name: String,
    device: EntityHandle,
    instructions: Vec<Instruction>,
}

impl ActionInvocation {
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved target device
    pub fn device(&self) -> &EntityHandle {
        &self.device
    }

    /// Consume the invocation, yielding its instructions in order
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

/// What a builder sees for one invocation
pub struct BuildArgs<'a> {
    id: &'a Identifier,
    name: &'a str,
    target: &'a EntityHandle,
    params: &'a IndexMap<String, ConfigValue>,
    path: &'a KeyPath,
}

impl<'a> BuildArgs<'a> {
    /// The invocation's allocated identifier
    pub fn id(&self) -> &Identifier {
        self.id
    }

    /// The registered action name
    pub fn name(&self) -> &str {
        self.name
    }

    /// The resolved target device
    pub fn target(&self) -> &EntityHandle {
        self.target
    }

    /// A validated parameter, if the invocation supplied it
    pub fn param(&self, parameter: &str) -> Option<&ConfigValue> {
        self.params.get(parameter)
    }

    /// A boolean parameter, literal or deferred
    pub fn templatable_bool(&self, parameter: &str) -> ActionResult<Templatable<bool>> {
        self.templatable(parameter, "a boolean", |value| {
            value.as_bool().map(Templatable::Literal)
        })
    }

    /// A numeric parameter, literal or deferred
    pub fn templatable_f64(&self, parameter: &str) -> ActionResult<Templatable<f64>> {
        self.templatable(parameter, "a number", |value| {
            value.as_float().map(Templatable::Literal)
        })
    }

    /// An integer parameter, literal or deferred
    pub fn templatable_i64(&self, parameter: &str) -> ActionResult<Templatable<i64>> {
        self.templatable(parameter, "an integer", |value| {
            value.as_int().map(Templatable::Literal)
        })
    }

    /// A string parameter, literal or deferred
    pub fn templatable_str(&self, parameter: &str) -> ActionResult<Templatable<String>> {
        self.templatable(parameter, "a string", |value| {
            value
                .as_str()
                .map(|s| Templatable::Literal(s.to_string()))
        })
    }

    /// Bind a boolean parameter onto the action
    pub fn bind_bool(&self, parameter: &str) -> ActionResult<Instruction> {
        Ok(self.bind(parameter, self.templatable_bool(parameter)?))
    }

    /// Bind a numeric parameter onto the action
    pub fn bind_f64(&self, parameter: &str) -> ActionResult<Instruction> {
        Ok(self.bind(parameter, self.templatable_f64(parameter)?))
    }

    /// Bind an integer parameter onto the action
    pub fn bind_i64(&self, parameter: &str) -> ActionResult<Instruction> {
        Ok(self.bind(parameter, self.templatable_i64(parameter)?))
    }

    /// Bind a string parameter onto the action
    pub fn bind_str(&self, parameter: &str) -> ActionResult<Instruction> {
        Ok(self.bind(parameter, self.templatable_str(parameter)?))
    }

    fn templatable<T>(
        &self,
        parameter: &str,
        expected: &str,
        literal: impl FnOnce(&ConfigValue) -> Option<Templatable<T>>,
    ) -> ActionResult<Templatable<T>> {
        let value = self
            .param(parameter)
            .ok_or_else(|| self.parameter_error(parameter, "was not supplied".to_string()))?;
        if let ConfigValue::Expr(source) = value {
            let expression = Expression::parse(source.as_str())
                .map_err(|err| self.parameter_error(parameter, err.to_string()))?;
            return Ok(Templatable::Deferred(expression));
        }
        literal(value).ok_or_else(|| {
            self.parameter_error(
                parameter,
                format!("expected {}, got {}", expected, value.type_name()),
            )
        })
    }

    fn bind<T: Into<ConstValue>>(&self, parameter: &str, value: Templatable<T>) -> Instruction {
        let value = match value {
            Templatable::Literal(v) => ParamValue::Literal(v.into()),
            Templatable::Deferred(expression) => ParamValue::Deferred {
                expression: expression.source().to_string(),
            },
        };
        Instruction::SetActionParameter {
            id: self.id.clone(),
            parameter: parameter.to_string(),
            value,
        }
    }

    fn parameter_error(&self, parameter: &str, message: String) -> ActionError {
        ActionError::InvalidParameter {
            path: self.path.key(parameter),
            parameter: parameter.to_string(),
            message,
        }
    }
}

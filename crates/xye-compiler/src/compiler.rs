//! The two-phase compilation driver

use crate::actions::register_builtin_actions;
use crate::error::{CompileError, CompileResult, Diagnostics};
use crate::model::*;
use crate::sink::Plan;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use xye_actions::{ActionError, ActionRegistry, PendingAction};
use xye_core::{
    ClimateMode, ClimatePreset, CustomFanMode, CustomPreset, EntityKind, Identifier, Instruction,
    KeyPath, SensorOptions, SensorSlot, SwingMode,
};
use xye_registry::{EntityRegistry, RegistryError};
use xye_schema::{ConfigValue, SchemaError, ValidationContext, ValidationErrors};

/// Compiles device configuration documents into instruction plans
///
/// Compilation runs in two phases. [`validate`] checks the document
/// against the composed schema, declares every identifier it defines, and
/// stages action invocations; it never resolves a reference. [`generate`]
/// resolves references against the sealed registry and emits instructions
/// in the canonical order. [`compile`] runs both phases over a private
/// registry for the common single-document case.
///
/// [`validate`]: Compiler::validate
/// [`generate`]: Compiler::generate
/// [`compile`]: Compiler::compile
pub struct Compiler {
    actions: Arc<ActionRegistry>,
    components: HashSet<String>,
}

impl Compiler {
    /// Create a compiler with the built-in actions and default components
    pub fn new() -> Self {
        let actions = ActionRegistry::new();
        register_builtin_actions(&actions).expect("builtin action names are distinct");
        Self {
            actions: Arc::new(actions),
            components: default_components(),
        }
    }

    /// Mark an additional component as loaded for this run
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.components.insert(component.into());
        self
    }

    /// The action registry, for registering component-supplied actions
    pub fn action_registry(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Phase one: check the document and declare what it defines
    ///
    /// Collects every validation failure in the document before giving up;
    /// a malformed top level is the one fatal case, since nothing below it
    /// can be trusted.
    pub fn validate(
        &self,
        document: &ConfigValue,
        registry: &EntityRegistry,
    ) -> CompileResult<ValidatedConfig> {
        let root = KeyPath::root();
        let ctx = ValidationContext::new(registry, &self.components);

        let config = device_schema()
            .validate(document, &root, &ctx)
            .map_err(Diagnostics::from_validation)?
            .into_map()
            .expect("a validated device block is a mapping");
        let device = config
            .get(CONF_ID)
            .and_then(ConfigValue::as_str)
            .map(Identifier::new)
            .and_then(Result::ok)
            .expect("a validated device block carries its id");

        let mut diagnostics = Diagnostics::new();
        let mut pending = Vec::new();
        if let Some(items) = config.get(CONF_AUTOMATIONS).and_then(ConfigValue::as_list) {
            let automations = root.key(CONF_AUTOMATIONS);
            for (i, entry) in items.iter().enumerate() {
                match self.prepare_invocation(entry, &automations.index(i), &device, &ctx) {
                    Ok(action) => pending.push(action),
                    Err(err) => diagnostics.push_action(err),
                }
            }
        }

        if !diagnostics.is_empty() {
            return Err(diagnostics);
        }
        debug!(device = %device, actions = pending.len(), "validated configuration");

        Ok(ValidatedConfig {
            device,
            config,
            actions: pending,
        })
    }

    /// Stage one automation entry: a bare action name or `{name: params}`
    fn prepare_invocation(
        &self,
        entry: &ConfigValue,
        path: &KeyPath,
        device: &Identifier,
        ctx: &ValidationContext<'_>,
    ) -> Result<PendingAction, ActionError> {
        match entry {
            ConfigValue::Str(name) => self
                .actions
                .prepare(name, &ConfigValue::Null, path, device, ctx),
            ConfigValue::Map(map) => match map.first() {
                Some((name, body)) if map.len() == 1 => self
                    .actions
                    .prepare(name, body, &path.key(name.as_str()), device, ctx),
                _ => Err(invalid_invocation(
                    path,
                    "expected a single-key mapping naming one action".to_string(),
                )),
            },
            other => Err(invalid_invocation(
                path,
                format!(
                    "expected an action name or a single-key mapping, got {}",
                    other.type_name()
                ),
            )),
        }
    }

    /// Phase two: resolve references and emit the instruction plan
    ///
    /// Device identity comes first, then core settings, the optional
    /// transmitter link, capability lists, sensors in slot order, and
    /// finally actions in document order. Resolution failures accumulate;
    /// a plan is only produced when everything resolved.
    pub async fn generate(
        &self,
        validated: ValidatedConfig,
        registry: &EntityRegistry,
    ) -> CompileResult<Plan> {
        let ValidatedConfig {
            device,
            config,
            actions,
        } = validated;
        let mut diagnostics = Diagnostics::new();
        let mut instructions = vec![Instruction::DeclareDevice { id: device.clone() }];

        if let Some(priority) = config.get(CONF_SETUP_PRIORITY).and_then(ConfigValue::as_float) {
            instructions.push(Instruction::SetSetupPriority {
                id: device.clone(),
                priority,
            });
        }
        if let Some(bus) = resolve_link(
            &config,
            CONF_BUS_ID,
            EntityKind::SerialBus,
            registry,
            &mut diagnostics,
        )
        .await
        {
            instructions.push(Instruction::LinkSerialBus {
                id: device.clone(),
                bus,
            });
        }
        if let Some(name) = config.get(CONF_NAME).and_then(ConfigValue::as_str) {
            instructions.push(Instruction::SetDeviceName {
                id: device.clone(),
                name: name.to_string(),
            });
        }
        if let Some(visual) = config.get(CONF_VISUAL).and_then(ConfigValue::as_map) {
            instructions.push(Instruction::SetVisual {
                id: device.clone(),
                min_temperature: visual.get(CONF_MIN_TEMPERATURE).and_then(ConfigValue::as_float),
                max_temperature: visual.get(CONF_MAX_TEMPERATURE).and_then(ConfigValue::as_float),
                temperature_step: visual.get(CONF_TEMPERATURE_STEP).and_then(ConfigValue::as_float),
            });
        }

        if let Some(period) = config.get(CONF_PERIOD).and_then(ConfigValue::as_duration) {
            instructions.push(Instruction::SetPollPeriod {
                id: device.clone(),
                period,
            });
        }
        if let Some(timeout) = config.get(CONF_TIMEOUT).and_then(ConfigValue::as_duration) {
            instructions.push(Instruction::SetResponseTimeout {
                id: device.clone(),
                timeout,
            });
        }
        if let Some(enabled) = config.get(CONF_BEEPER).and_then(ConfigValue::as_bool) {
            instructions.push(Instruction::SetBeeper {
                id: device.clone(),
                enabled,
            });
        }
        if let Some(enabled) = config.get(CONF_AUTOCONF).and_then(ConfigValue::as_bool) {
            instructions.push(Instruction::SetAutoconf {
                id: device.clone(),
                enabled,
            });
        }

        if let Some(transmitter) = resolve_link(
            &config,
            CONF_TRANSMITTER_ID,
            EntityKind::Transmitter,
            registry,
            &mut diagnostics,
        )
        .await
        {
            instructions.push(Instruction::EnableFeature {
                feature: FEATURE_REMOTE_TRANSMITTER.to_string(),
            });
            instructions.push(Instruction::LinkTransmitter {
                id: device.clone(),
                transmitter,
            });
        }

        if let Some(modes) = token_list(
            &config,
            CONF_SUPPORTED_MODES,
            ClimateMode::TOKENS,
            ClimateMode::from_token,
            &mut diagnostics,
        ) {
            instructions.push(Instruction::SetSupportedModes {
                id: device.clone(),
                modes,
            });
        }
        if let Some(modes) = token_list(
            &config,
            CONF_SUPPORTED_SWING_MODES,
            SwingMode::TOKENS,
            SwingMode::from_token,
            &mut diagnostics,
        ) {
            instructions.push(Instruction::SetSupportedSwingModes {
                id: device.clone(),
                modes,
            });
        }
        if let Some(presets) = token_list(
            &config,
            CONF_SUPPORTED_PRESETS,
            ClimatePreset::TOKENS,
            ClimatePreset::from_token,
            &mut diagnostics,
        ) {
            instructions.push(Instruction::SetSupportedPresets {
                id: device.clone(),
                presets,
            });
        }
        if let Some(presets) = token_list(
            &config,
            CONF_CUSTOM_PRESETS,
            CustomPreset::TOKENS,
            CustomPreset::from_token,
            &mut diagnostics,
        ) {
            instructions.push(Instruction::SetCustomPresets {
                id: device.clone(),
                presets,
            });
        }
        if let Some(modes) = token_list(
            &config,
            CONF_CUSTOM_FAN_MODES,
            CustomFanMode::TOKENS,
            CustomFanMode::from_token,
            &mut diagnostics,
        ) {
            instructions.push(Instruction::SetCustomFanModes {
                id: device.clone(),
                modes,
            });
        }

        for slot in SensorSlot::ALL {
            if let Some(block) = config.get(slot.key()).and_then(ConfigValue::as_map) {
                let sensor = block
                    .get(CONF_ID)
                    .and_then(ConfigValue::as_str)
                    .map(Identifier::new)
                    .and_then(Result::ok)
                    .expect("a validated sensor block carries its id");
                instructions.push(Instruction::DeclareSensor {
                    id: sensor.clone(),
                    options: sensor_options(slot, block),
                });
                instructions.push(Instruction::AttachSensor {
                    id: device.clone(),
                    slot,
                    sensor,
                });
            }
        }

        for action in actions {
            match action.resolve(registry).await {
                Ok(invocation) => instructions.extend(invocation.into_instructions()),
                Err(err) => diagnostics.push_action(err),
            }
        }

        if !diagnostics.is_empty() {
            return Err(diagnostics);
        }
        debug!(
            device = %device,
            instructions = instructions.len(),
            "generated plan"
        );
        Ok(Plan::new(device, instructions))
    }

    /// Compile one standalone document end to end
    ///
    /// Validates against a fresh registry, seals it, and generates. Callers
    /// stitching several configuration units together run [`validate`] for
    /// each unit against a shared registry, seal it once, then [`generate`].
    ///
    /// [`validate`]: Compiler::validate
    /// [`generate`]: Compiler::generate
    pub async fn compile(&self, document: &ConfigValue) -> CompileResult<Plan> {
        let registry = EntityRegistry::new();
        let validated = self.validate(document, &registry)?;
        registry.seal();
        self.generate(validated, &registry).await
    }

    /// Parse a YAML document and compile it
    pub async fn compile_str(&self, input: &str) -> CompileResult<Plan> {
        let document = ConfigValue::from_yaml_str(input)
            .map_err(|err| Diagnostics::from(CompileError::Schema(err)))?;
        self.compile(&document).await
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// The outcome of the validation phase, ready for generation
pub struct ValidatedConfig {
    device: Identifier,
    config: IndexMap<String, ConfigValue>,
    actions: Vec<PendingAction>,
}

impl ValidatedConfig {
    /// The device this configuration declares
    pub fn device(&self) -> &Identifier {
        &self.device
    }

    /// The normalized configuration mapping
    pub fn config(&self) -> &IndexMap<String, ConfigValue> {
        &self.config
    }

    /// Invocations staged for the generation phase
    pub fn actions(&self) -> &[PendingAction] {
        &self.actions
    }
}

fn invalid_invocation(path: &KeyPath, message: String) -> ActionError {
    ActionError::Schema(ValidationErrors::from(SchemaError::InvalidValue {
        path: path.clone(),
        message,
    }))
}

/// Resolve an optional entity link named by `key`
///
/// Failures land in the diagnostics so generation can keep going and
/// report everything at once.
async fn resolve_link(
    config: &IndexMap<String, ConfigValue>,
    key: &str,
    kind: EntityKind,
    registry: &EntityRegistry,
    diagnostics: &mut Diagnostics,
) -> Option<Identifier> {
    let raw = config.get(key)?.as_str()?;
    let path = KeyPath::root().key(key);
    let id = match Identifier::new(raw) {
        Ok(id) => id,
        Err(source) => {
            diagnostics.push(CompileError::Registry {
                path,
                source: RegistryError::from(source),
            });
            return None;
        }
    };
    match registry.resolve(&id, kind).await {
        Ok(handle) => Some(handle.into_id()),
        Err(source) => {
            diagnostics.push(CompileError::Registry { path, source });
            None
        }
    }
}

/// Turn a validated token list back into its typed values
fn token_list<T>(
    config: &IndexMap<String, ConfigValue>,
    key: &str,
    tokens: &'static [&'static str],
    parse: impl Fn(&str) -> Option<T>,
    diagnostics: &mut Diagnostics,
) -> Option<Vec<T>> {
    let items = config.get(key)?.as_list()?;
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item.as_str().and_then(&parse) {
            Some(value) => out.push(value),
            None => diagnostics.push(CompileError::Schema(SchemaError::InvalidEnumValue {
                path: KeyPath::root().key(key).index(i),
                value: item.as_str().unwrap_or_default().to_string(),
                allowed: tokens.to_vec(),
            })),
        }
    }
    Some(out)
}

fn sensor_options(slot: SensorSlot, block: &IndexMap<String, ConfigValue>) -> SensorOptions {
    let mut options = SensorOptions::for_slot(slot);
    if let Some(name) = block.get(CONF_NAME).and_then(ConfigValue::as_str) {
        options.name = Some(name.to_string());
    }
    if let Some(unit) = block.get(CONF_UNIT_OF_MEASUREMENT).and_then(ConfigValue::as_str) {
        options.unit_of_measurement = unit.to_string();
    }
    if let Some(icon) = block.get(CONF_ICON).and_then(ConfigValue::as_str) {
        options.icon = icon.to_string();
    }
    if let Some(decimals) = block.get(CONF_ACCURACY_DECIMALS).and_then(ConfigValue::as_int) {
        options.accuracy_decimals = decimals.clamp(0, 255) as u8;
    }
    if let Some(class) = block.get(CONF_DEVICE_CLASS).and_then(ConfigValue::as_str) {
        options.device_class = class.to_string();
    }
    if let Some(class) = block.get(CONF_STATE_CLASS).and_then(ConfigValue::as_str) {
        options.state_class = class.to_string();
    }
    options
}

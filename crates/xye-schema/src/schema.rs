//! Composable key schemas and the validation engine

use crate::coerce;
use crate::error::{SchemaError, ValidationErrors};
use crate::value::ConfigValue;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::trace;
use xye_core::{EntityKind, Identifier, KeyPath};
use xye_registry::{EntityRegistry, RegistryError};
use xye_template::{is_expression, Expression};

/// How a key participates in a mapping
#[derive(Debug, Clone)]
pub enum KeyRequirement {
    /// Must be present
    Required,
    /// May be absent; absent keys produce no output
    Optional,
    /// May be absent; absent keys take this value
    Default(ConfigValue),
    /// Declares an identifier; absent keys get a generated one
    GeneratedId {
        kind: EntityKind,
        prefix: &'static str,
    },
    /// Legal only when the named component is loaded
    OnlyWith { component: &'static str },
}

/// Checks and normalizes a single value
#[derive(Debug, Clone)]
pub enum Validator {
    /// Accept anything unchanged
    Any,
    Boolean,
    Integer,
    Float,
    Text,
    Icon,
    DurationValue,
    Temperature,
    /// One of a fixed token set, matched case-insensitively and normalized
    /// to the canonical spelling
    TokenOf(&'static [&'static str]),
    /// An identifier referencing an entity of the given kind. Only the
    /// shape is checked here; the reference resolves during generation.
    Reference(EntityKind),
    /// Accept an expression string, otherwise defer to the inner validator
    Templatable(Box<Validator>),
    /// Never wrapped by [`Schema::templatized`]
    Fixed(Box<Validator>),
    /// A list whose elements all satisfy the inner validator. A bare
    /// scalar is promoted to a single-element list.
    ListOf(Box<Validator>),
    /// A nested mapping with its own schema
    Nested(Schema),
}

/// Shared state a validation pass runs against
pub struct ValidationContext<'a> {
    registry: &'a EntityRegistry,
    components: &'a HashSet<String>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(registry: &'a EntityRegistry, components: &'a HashSet<String>) -> Self {
        Self {
            registry,
            components,
        }
    }

    /// The run's entity registry
    pub fn registry(&self) -> &EntityRegistry {
        self.registry
    }

    /// Whether the named component is loaded in this run
    pub fn has_component(&self, component: &str) -> bool {
        self.components.contains(component)
    }
}

#[derive(Debug, Clone)]
struct SchemaEntry {
    requirement: KeyRequirement,
    validator: Validator,
}

/// An ordered set of key rules for one mapping
///
/// Schemas compose by [`extend`]ing one with another; the later schema wins
/// on key collisions but keys keep their first position, so composed
/// defaults stay in a stable, predictable order.
///
/// [`extend`]: Schema::extend
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: IndexMap<String, SchemaEntry>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required key
    pub fn required(mut self, key: &str, validator: Validator) -> Self {
        self.entries.insert(
            key.to_string(),
            SchemaEntry {
                requirement: KeyRequirement::Required,
                validator,
            },
        );
        self
    }

    /// Add an optional key with no default
    pub fn optional(mut self, key: &str, validator: Validator) -> Self {
        self.entries.insert(
            key.to_string(),
            SchemaEntry {
                requirement: KeyRequirement::Optional,
                validator,
            },
        );
        self
    }

    /// Add an optional key that takes a default when absent
    ///
    /// The default passes through the key's validator like any supplied
    /// value, so it lands in the output already normalized.
    pub fn optional_default(
        mut self,
        key: &str,
        default: impl Into<ConfigValue>,
        validator: Validator,
    ) -> Self {
        self.entries.insert(
            key.to_string(),
            SchemaEntry {
                requirement: KeyRequirement::Default(default.into()),
                validator,
            },
        );
        self
    }

    /// Add an identifier-declaring key
    pub fn generated_id(mut self, key: &str, kind: EntityKind, prefix: &'static str) -> Self {
        self.entries.insert(
            key.to_string(),
            SchemaEntry {
                requirement: KeyRequirement::GeneratedId { kind, prefix },
                validator: Validator::Any,
            },
        );
        self
    }

    /// Add a key that is legal only when a component is loaded
    pub fn only_with(mut self, key: &str, component: &'static str, validator: Validator) -> Self {
        self.entries.insert(
            key.to_string(),
            SchemaEntry {
                requirement: KeyRequirement::OnlyWith { component },
                validator,
            },
        );
        self
    }

    /// Overlay another schema onto this one
    pub fn extend(mut self, other: Schema) -> Self {
        for (key, entry) in other.entries {
            self.entries.insert(key, entry);
        }
        self
    }

    /// Wrap every validator so expression strings are accepted
    ///
    /// [`Validator::Reference`] keys stay literal (an entity link cannot be
    /// computed at runtime) and [`Validator::Fixed`] wrappers are stripped
    /// without wrapping their inner validator.
    pub fn templatized(mut self) -> Self {
        for entry in self.entries.values_mut() {
            let validator = std::mem::replace(&mut entry.validator, Validator::Any);
            entry.validator = match validator {
                Validator::Reference(kind) => Validator::Reference(kind),
                Validator::Templatable(inner) => Validator::Templatable(inner),
                Validator::Fixed(inner) => *inner,
                other => Validator::Templatable(Box::new(other)),
            };
        }
        self
    }

    /// Number of keys the schema knows about
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate a mapping, producing its normalized copy
    ///
    /// Output keys follow schema order regardless of document order. Every
    /// failure under this node is collected before the node is rejected. A
    /// null value validates as an empty mapping so that a bare key with all
    /// defaults is legal.
    pub fn validate(
        &self,
        value: &ConfigValue,
        path: &KeyPath,
        ctx: &ValidationContext<'_>,
    ) -> Result<ConfigValue, ValidationErrors> {
        let empty = IndexMap::new();
        let map = match value {
            ConfigValue::Null => &empty,
            ConfigValue::Map(map) => map,
            other => {
                return Err(SchemaError::InvalidValue {
                    path: path.clone(),
                    message: format!("expected a mapping, got {}", other.type_name()),
                }
                .into())
            }
        };
        trace!(path = %path, keys = map.len(), "validating mapping");

        let mut errors = ValidationErrors::new();
        let mut output = IndexMap::with_capacity(self.entries.len());

        for (key, entry) in &self.entries {
            let key_path = path.key(key.as_str());
            let supplied = map.get(key);

            let normalized = match (&entry.requirement, supplied) {
                (KeyRequirement::Required, None) => {
                    errors.push(SchemaError::MissingKey { path: key_path });
                    continue;
                }
                (KeyRequirement::Optional, None) => continue,
                (KeyRequirement::Default(default), None) => {
                    entry.validator.apply(default, &key_path, ctx)
                }
                (KeyRequirement::GeneratedId { kind, prefix }, None) => {
                    match ctx.registry().generate(prefix, *kind) {
                        Ok(id) => Ok(ConfigValue::Str(id.as_str().to_string())),
                        Err(source) => Err(SchemaError::Identifier {
                            path: key_path,
                            source,
                        }
                        .into()),
                    }
                }
                (KeyRequirement::GeneratedId { kind, .. }, Some(value)) => {
                    declare_explicit_id(value, *kind, &key_path, ctx)
                }
                (KeyRequirement::OnlyWith { component }, Some(value)) => {
                    if ctx.has_component(component) {
                        entry.validator.apply(value, &key_path, ctx)
                    } else {
                        Err(SchemaError::UnsupportedKey {
                            path: key_path,
                            component: component.to_string(),
                        }
                        .into())
                    }
                }
                (KeyRequirement::OnlyWith { .. }, None) => continue,
                (_, Some(value)) => entry.validator.apply(value, &key_path, ctx),
            };

            match normalized {
                Ok(value) => {
                    output.insert(key.clone(), value);
                }
                Err(nested) => errors.extend(nested),
            }
        }

        for key in map.keys() {
            if !self.entries.contains_key(key) {
                errors.push(SchemaError::UnknownKey {
                    path: path.key(key.as_str()),
                });
            }
        }

        if errors.is_empty() {
            Ok(ConfigValue::Map(output))
        } else {
            Err(errors)
        }
    }
}

fn declare_explicit_id(
    value: &ConfigValue,
    kind: EntityKind,
    path: &KeyPath,
    ctx: &ValidationContext<'_>,
) -> Result<ConfigValue, ValidationErrors> {
    let raw = value.as_str().ok_or_else(|| SchemaError::InvalidValue {
        path: path.clone(),
        message: format!("expected an identifier, got {}", value.type_name()),
    })?;
    let id = Identifier::new(raw)
        .map_err(RegistryError::from)
        .and_then(|id| ctx.registry().declare(id, kind))
        .map_err(|source| SchemaError::Identifier {
            path: path.clone(),
            source,
        })?;
    Ok(ConfigValue::Str(id.into_id().into()))
}

impl Validator {
    fn apply(
        &self,
        value: &ConfigValue,
        path: &KeyPath,
        ctx: &ValidationContext<'_>,
    ) -> Result<ConfigValue, ValidationErrors> {
        match self {
            Validator::Any => Ok(value.clone()),
            Validator::Boolean => coerced(path, coerce::boolean(value).map(ConfigValue::Bool)),
            Validator::Integer => coerced(path, coerce::integer(value).map(ConfigValue::Int)),
            Validator::Float => coerced(path, coerce::float(value).map(ConfigValue::Float)),
            Validator::Text => coerced(path, coerce::text(value).map(ConfigValue::Str)),
            Validator::Icon => coerced(path, coerce::icon(value).map(ConfigValue::Str)),
            Validator::DurationValue => {
                coerced(path, coerce::duration(value).map(ConfigValue::Duration))
            }
            Validator::Temperature => {
                coerced(path, coerce::temperature(value).map(ConfigValue::Float))
            }
            Validator::TokenOf(tokens) => match value.as_str() {
                Some(raw) => {
                    let token = raw.trim();
                    match tokens.iter().find(|t| token.eq_ignore_ascii_case(t)) {
                        Some(canonical) => Ok(ConfigValue::Str(canonical.to_string())),
                        None => Err(SchemaError::InvalidEnumValue {
                            path: path.clone(),
                            value: raw.to_string(),
                            allowed: tokens.to_vec(),
                        }
                        .into()),
                    }
                }
                None => Err(SchemaError::InvalidValue {
                    path: path.clone(),
                    message: format!("expected one of {:?}, got {}", tokens, value.type_name()),
                }
                .into()),
            },
            Validator::Reference(kind) => {
                let raw = value.as_str().ok_or_else(|| SchemaError::InvalidValue {
                    path: path.clone(),
                    message: format!(
                        "expected an identifier referencing a {}, got {}",
                        kind,
                        value.type_name()
                    ),
                })?;
                Identifier::new(raw).map_err(|source| SchemaError::Identifier {
                    path: path.clone(),
                    source: RegistryError::from(source),
                })?;
                Ok(ConfigValue::Str(raw.to_string()))
            }
            Validator::Templatable(inner) => match value.as_str() {
                Some(raw) if is_expression(raw) => match Expression::parse(raw) {
                    Ok(expr) => Ok(ConfigValue::Expr(expr.source().to_string())),
                    Err(source) => Err(SchemaError::Expression {
                        path: path.clone(),
                        source,
                    }
                    .into()),
                },
                _ => inner.apply(value, path, ctx),
            },
            Validator::Fixed(inner) => inner.apply(value, path, ctx),
            Validator::ListOf(inner) => match value {
                ConfigValue::Null => Ok(ConfigValue::List(Vec::new())),
                ConfigValue::List(items) => {
                    let mut errors = ValidationErrors::new();
                    let mut output = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        match inner.apply(item, &path.index(i), ctx) {
                            Ok(value) => output.push(value),
                            Err(nested) => errors.extend(nested),
                        }
                    }
                    if errors.is_empty() {
                        Ok(ConfigValue::List(output))
                    } else {
                        Err(errors)
                    }
                }
                scalar => Ok(ConfigValue::List(vec![inner.apply(scalar, path, ctx)?])),
            },
            Validator::Nested(schema) => schema.validate(value, path, ctx),
        }
    }
}

fn coerced(
    path: &KeyPath,
    result: Result<ConfigValue, String>,
) -> Result<ConfigValue, ValidationErrors> {
    result.map_err(|message| {
        SchemaError::InvalidValue {
            path: path.clone(),
            message,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn components() -> HashSet<String> {
        ["climate", "sensor", "serial_bus"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn parse(input: &str) -> ConfigValue {
        ConfigValue::from_yaml_str(input).unwrap()
    }

    fn validate(
        schema: &Schema,
        input: &str,
        registry: &EntityRegistry,
    ) -> Result<ConfigValue, ValidationErrors> {
        let components = components();
        let ctx = ValidationContext::new(registry, &components);
        schema.validate(&parse(input), &KeyPath::root(), &ctx)
    }

    #[test]
    fn test_missing_required_key() {
        let schema = Schema::new().required("temperature", Validator::Temperature);
        let registry = EntityRegistry::new();

        let errors = validate(&schema, "{}", &registry).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.iter().next().unwrap(),
            SchemaError::MissingKey { .. }
        ));
    }

    #[test]
    fn test_unknown_key_reported_with_path() {
        let schema = Schema::new().optional("name", Validator::Text);
        let registry = EntityRegistry::new();

        let errors = validate(&schema, "naem: oops", &registry).unwrap_err();
        let err = errors.into_vec().remove(0);
        assert_eq!(err.to_string(), "naem: unknown key");
    }

    #[test]
    fn test_defaults_fill_in_schema_order() {
        let schema = Schema::new()
            .optional_default("period", "1s", Validator::DurationValue)
            .optional_default("beeper", false, Validator::Boolean)
            .optional_default("autoconf", true, Validator::Boolean);
        let registry = EntityRegistry::new();

        let out = validate(&schema, "autoconf: false", &registry).unwrap();
        let map = out.as_map().unwrap();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["period", "beeper", "autoconf"]);
        assert_eq!(map["period"], ConfigValue::Duration(Duration::from_secs(1)));
        assert_eq!(map["beeper"], ConfigValue::Bool(false));
        assert_eq!(map["autoconf"], ConfigValue::Bool(false));
    }

    #[test]
    fn test_null_value_validates_as_empty_mapping() {
        let schema = Schema::new().optional_default("beeper", false, Validator::Boolean);
        let registry = EntityRegistry::new();

        let out = validate(&schema, "", &registry).unwrap();
        assert_eq!(out.as_map().unwrap()["beeper"], ConfigValue::Bool(false));
    }

    #[test]
    fn test_non_mapping_is_fatal() {
        let schema = Schema::new().optional("name", Validator::Text);
        let registry = EntityRegistry::new();

        let errors = validate(&schema, "- a\n- b", &registry).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_generated_id_when_absent() {
        let schema = Schema::new().generated_id("id", EntityKind::Device, "air_conditioner");
        let registry = EntityRegistry::new();

        let out = validate(&schema, "{}", &registry).unwrap();
        assert_eq!(
            out.as_map().unwrap()["id"],
            ConfigValue::Str("air_conditioner_1".to_string())
        );
        assert!(registry.contains(&Identifier::new("air_conditioner_1").unwrap()));
    }

    #[test]
    fn test_explicit_id_is_declared() {
        let schema = Schema::new().generated_id("id", EntityKind::Device, "air_conditioner");
        let registry = EntityRegistry::new();

        let out = validate(&schema, "id: living_room_ac", &registry).unwrap();
        assert_eq!(
            out.as_map().unwrap()["id"],
            ConfigValue::Str("living_room_ac".to_string())
        );
        assert!(registry.contains(&Identifier::new("living_room_ac").unwrap()));
    }

    #[test]
    fn test_duplicate_explicit_id() {
        let schema = Schema::new().generated_id("id", EntityKind::Device, "air_conditioner");
        let registry = EntityRegistry::new();
        registry
            .declare(Identifier::new("living_room_ac").unwrap(), EntityKind::Sensor)
            .unwrap();

        let errors = validate(&schema, "id: living_room_ac", &registry).unwrap_err();
        assert!(matches!(
            errors.iter().next().unwrap(),
            SchemaError::Identifier { .. }
        ));
    }

    #[test]
    fn test_malformed_explicit_id() {
        let schema = Schema::new().generated_id("id", EntityKind::Device, "air_conditioner");
        let registry = EntityRegistry::new();

        let errors = validate(&schema, "id: Living Room", &registry).unwrap_err();
        assert!(matches!(
            errors.iter().next().unwrap(),
            SchemaError::Identifier { .. }
        ));
    }

    #[test]
    fn test_only_with_requires_component() {
        let schema = Schema::new().only_with(
            "transmitter_id",
            "remote_transmitter",
            Validator::Reference(EntityKind::Transmitter),
        );
        let registry = EntityRegistry::new();

        let errors = validate(&schema, "transmitter_id: ir_out", &registry).unwrap_err();
        match errors.into_vec().remove(0) {
            SchemaError::UnsupportedKey { component, .. } => {
                assert_eq!(component, "remote_transmitter");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_only_with_passes_when_component_loaded() {
        let schema = Schema::new().only_with(
            "transmitter_id",
            "remote_transmitter",
            Validator::Reference(EntityKind::Transmitter),
        );
        let registry = EntityRegistry::new();
        let mut components = components();
        components.insert("remote_transmitter".to_string());
        let ctx = ValidationContext::new(&registry, &components);

        let out = schema
            .validate(&parse("transmitter_id: ir_out"), &KeyPath::root(), &ctx)
            .unwrap();
        assert_eq!(
            out.as_map().unwrap()["transmitter_id"],
            ConfigValue::Str("ir_out".to_string())
        );
    }

    #[test]
    fn test_token_matching_is_case_insensitive() {
        let schema = Schema::new().optional("mode", Validator::TokenOf(&["COOL", "HEAT"]));
        let registry = EntityRegistry::new();

        let out = validate(&schema, "mode: cool", &registry).unwrap();
        assert_eq!(
            out.as_map().unwrap()["mode"],
            ConfigValue::Str("COOL".to_string())
        );
    }

    #[test]
    fn test_unknown_token_lists_legal_values() {
        let schema = Schema::new().optional("mode", Validator::TokenOf(&["COOL", "HEAT"]));
        let registry = EntityRegistry::new();

        let errors = validate(&schema, "mode: FROSTY", &registry).unwrap_err();
        match errors.into_vec().remove(0) {
            SchemaError::InvalidEnumValue { value, allowed, .. } => {
                assert_eq!(value, "FROSTY");
                assert_eq!(allowed, vec!["COOL", "HEAT"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_list_promotes_bare_scalar() {
        let schema = Schema::new().optional(
            "supported_modes",
            Validator::ListOf(Box::new(Validator::TokenOf(&["COOL", "HEAT"]))),
        );
        let registry = EntityRegistry::new();

        let out = validate(&schema, "supported_modes: heat", &registry).unwrap();
        assert_eq!(
            out.as_map().unwrap()["supported_modes"],
            ConfigValue::List(vec![ConfigValue::Str("HEAT".to_string())])
        );
    }

    #[test]
    fn test_list_collects_every_bad_element() {
        let schema = Schema::new().optional(
            "supported_modes",
            Validator::ListOf(Box::new(Validator::TokenOf(&["COOL", "HEAT"]))),
        );
        let registry = EntityRegistry::new();

        let errors = validate(
            &schema,
            "supported_modes: [COOL, FROSTY, TOASTY]",
            &registry,
        )
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        let paths: Vec<String> = errors
            .iter()
            .map(|e| e.path().unwrap().to_string())
            .collect();
        assert_eq!(paths, ["supported_modes[1]", "supported_modes[2]"]);
    }

    #[test]
    fn test_nested_error_paths() {
        let schema = Schema::new().optional(
            "visual",
            Validator::Nested(
                Schema::new()
                    .optional("min_temperature", Validator::Temperature)
                    .optional("max_temperature", Validator::Temperature),
            ),
        );
        let registry = EntityRegistry::new();

        let errors = validate(&schema, "visual:\n  min_temperature: warm", &registry).unwrap_err();
        let err = errors.into_vec().remove(0);
        assert_eq!(err.path().unwrap().to_string(), "visual.min_temperature");
    }

    #[test]
    fn test_templatized_accepts_expressions() {
        let schema = Schema::new()
            .required("temperature", Validator::Temperature)
            .templatized();
        let registry = EntityRegistry::new();

        let out = validate(&schema, "temperature: '{{ setpoint + 1 }}'", &registry).unwrap();
        assert_eq!(
            out.as_map().unwrap()["temperature"],
            ConfigValue::Expr("{{ setpoint + 1 }}".to_string())
        );

        // Literals still pass through the inner validator.
        let out = validate(&schema, "temperature: 24.5", &registry).unwrap();
        assert_eq!(out.as_map().unwrap()["temperature"], ConfigValue::Float(24.5));
    }

    #[test]
    fn test_templatized_rejects_bad_expression_syntax() {
        let schema = Schema::new()
            .required("temperature", Validator::Temperature)
            .templatized();
        let registry = EntityRegistry::new();

        let errors = validate(&schema, "temperature: '{{ setpoint +'", &registry).unwrap_err();
        assert!(matches!(
            errors.iter().next().unwrap(),
            SchemaError::Expression { .. }
        ));
    }

    #[test]
    fn test_templatized_keeps_references_literal() {
        let schema = Schema::new()
            .optional("device_id", Validator::Reference(EntityKind::Device))
            .templatized();
        let registry = EntityRegistry::new();

        let errors = validate(&schema, "device_id: '{{ pick_one }}'", &registry).unwrap_err();
        assert!(matches!(
            errors.iter().next().unwrap(),
            SchemaError::Identifier { .. }
        ));
    }

    #[test]
    fn test_templatized_strips_fixed_wrapper() {
        let schema = Schema::new()
            .optional("beeper", Validator::Fixed(Box::new(Validator::Boolean)))
            .templatized();
        let registry = EntityRegistry::new();

        let errors = validate(&schema, "beeper: '{{ buzz }}'", &registry).unwrap_err();
        assert!(matches!(
            errors.iter().next().unwrap(),
            SchemaError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_extend_overrides_but_keeps_position() {
        let base = Schema::new()
            .optional_default("period", "1s", Validator::DurationValue)
            .optional_default("beeper", false, Validator::Boolean);
        let overlay = Schema::new()
            .optional_default("period", "5s", Validator::DurationValue)
            .optional("name", Validator::Text);
        let schema = base.extend(overlay);
        let registry = EntityRegistry::new();

        assert_eq!(schema.len(), 3);
        let out = validate(&schema, "{}", &registry).unwrap();
        let map = out.as_map().unwrap();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["period", "beeper"]);
        assert_eq!(map["period"], ConfigValue::Duration(Duration::from_secs(5)));
    }

    #[test]
    fn test_errors_accumulate_across_keys() {
        let schema = Schema::new()
            .required("temperature", Validator::Temperature)
            .optional("period", Validator::DurationValue)
            .optional("beeper", Validator::Boolean);
        let registry = EntityRegistry::new();

        let errors = validate(
            &schema,
            "period: 100\nbeeper: maybe\nbogus: 1",
            &registry,
        )
        .unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_reference_shape_checked_early() {
        let schema = Schema::new().optional("bus_id", Validator::Reference(EntityKind::SerialBus));
        let registry = EntityRegistry::new();

        // Well-formed references pass without being declared yet.
        let out = validate(&schema, "bus_id: uart_bus", &registry).unwrap();
        assert_eq!(
            out.as_map().unwrap()["bus_id"],
            ConfigValue::Str("uart_bus".to_string())
        );

        let errors = validate(&schema, "bus_id: Uart Bus", &registry).unwrap_err();
        assert!(matches!(
            errors.iter().next().unwrap(),
            SchemaError::Identifier { .. }
        ));
    }

    #[test]
    fn test_output_follows_schema_order_not_document_order() {
        let schema = Schema::new()
            .optional("a", Validator::Integer)
            .optional("b", Validator::Integer)
            .optional("c", Validator::Integer);
        let registry = EntityRegistry::new();

        let out = validate(&schema, "c: 3\na: 1\nb: 2", &registry).unwrap();
        let keys: Vec<&String> = out.as_map().unwrap().keys().collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }
}

//! Configuration keys and the composed device schema

use std::collections::HashSet;
use xye_core::{
    classes, ClimateMode, ClimatePreset, CustomFanMode, CustomPreset, EntityKind, SensorSlot,
    SwingMode,
};
use xye_schema::{Schema, Validator};

pub const CONF_ID: &str = "id";
pub const CONF_NAME: &str = "name";
pub const CONF_VISUAL: &str = "visual";
pub const CONF_MIN_TEMPERATURE: &str = "min_temperature";
pub const CONF_MAX_TEMPERATURE: &str = "max_temperature";
pub const CONF_TEMPERATURE_STEP: &str = "temperature_step";
pub const CONF_SETUP_PRIORITY: &str = "setup_priority";
pub const CONF_BUS_ID: &str = "bus_id";
pub const CONF_PERIOD: &str = "period";
pub const CONF_TIMEOUT: &str = "timeout";
pub const CONF_TRANSMITTER_ID: &str = "transmitter_id";
pub const CONF_BEEPER: &str = "beeper";
pub const CONF_AUTOCONF: &str = "autoconf";
pub const CONF_TEMPERATURE: &str = "temperature";
pub const CONF_SUPPORTED_MODES: &str = "supported_modes";
pub const CONF_SUPPORTED_SWING_MODES: &str = "supported_swing_modes";
pub const CONF_SUPPORTED_PRESETS: &str = "supported_presets";
pub const CONF_CUSTOM_PRESETS: &str = "custom_presets";
pub const CONF_CUSTOM_FAN_MODES: &str = "custom_fan_modes";
pub const CONF_AUTOMATIONS: &str = "automations";
pub const CONF_UNIT_OF_MEASUREMENT: &str = "unit_of_measurement";
pub const CONF_ICON: &str = "icon";
pub const CONF_ACCURACY_DECIMALS: &str = "accuracy_decimals";
pub const CONF_DEVICE_CLASS: &str = "device_class";
pub const CONF_STATE_CLASS: &str = "state_class";

/// Component that must be loaded before `transmitter_id` is legal
pub const COMPONENT_REMOTE_TRANSMITTER: &str = "remote_transmitter";

/// Build feature enabled when a transmitter is wired up
pub const FEATURE_REMOTE_TRANSMITTER: &str = "USE_REMOTE_TRANSMITTER";

/// Prefix for generated device identifiers
pub const DEVICE_ID_PREFIX: &str = "air_conditioner";

const STATE_CLASSES: &[&str] = &[
    classes::STATE_CLASS_MEASUREMENT,
    classes::STATE_CLASS_TOTAL,
    classes::STATE_CLASS_TOTAL_INCREASING,
];

/// Components loaded in every run
pub fn default_components() -> HashSet<String> {
    ["climate", "sensor", "serial_bus"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// The full schema for one device configuration block
///
/// Composed from the climate base (identity, name, visual range), the
/// serial device mixin (`bus_id`, `setup_priority`), the device's own
/// settings, the five capability lists, one nested sub-schema per sensor
/// slot, and the automation list.
pub fn device_schema() -> Schema {
    let visual = Schema::new()
        .optional(CONF_MIN_TEMPERATURE, Validator::Temperature)
        .optional(CONF_MAX_TEMPERATURE, Validator::Temperature)
        .optional(CONF_TEMPERATURE_STEP, Validator::Float);

    let mut schema = Schema::new()
        .generated_id(CONF_ID, EntityKind::Device, DEVICE_ID_PREFIX)
        .optional(CONF_NAME, Validator::Text)
        .optional(CONF_VISUAL, Validator::Nested(visual))
        .optional(CONF_SETUP_PRIORITY, Validator::Float)
        .optional(CONF_BUS_ID, Validator::Reference(EntityKind::SerialBus))
        .optional_default(CONF_PERIOD, "1s", Validator::DurationValue)
        .optional_default(CONF_TIMEOUT, "100ms", Validator::DurationValue)
        .only_with(
            CONF_TRANSMITTER_ID,
            COMPONENT_REMOTE_TRANSMITTER,
            Validator::Reference(EntityKind::Transmitter),
        )
        .optional_default(CONF_BEEPER, false, Validator::Boolean)
        .optional_default(CONF_AUTOCONF, true, Validator::Boolean)
        .optional(
            CONF_SUPPORTED_MODES,
            Validator::ListOf(Box::new(Validator::TokenOf(ClimateMode::TOKENS))),
        )
        .optional(
            CONF_SUPPORTED_SWING_MODES,
            Validator::ListOf(Box::new(Validator::TokenOf(SwingMode::TOKENS))),
        )
        .optional(
            CONF_SUPPORTED_PRESETS,
            Validator::ListOf(Box::new(Validator::TokenOf(ClimatePreset::TOKENS))),
        )
        .optional(
            CONF_CUSTOM_PRESETS,
            Validator::ListOf(Box::new(Validator::TokenOf(CustomPreset::TOKENS))),
        )
        .optional(
            CONF_CUSTOM_FAN_MODES,
            Validator::ListOf(Box::new(Validator::TokenOf(CustomFanMode::TOKENS))),
        );

    for slot in SensorSlot::ALL {
        schema = schema.optional(slot.key(), Validator::Nested(sensor_schema(slot)));
    }

    schema.optional(
        CONF_AUTOMATIONS,
        Validator::ListOf(Box::new(Validator::Any)),
    )
}

/// The sub-schema for one sensor slot, carrying the slot's defaults
pub fn sensor_schema(slot: SensorSlot) -> Schema {
    Schema::new()
        .generated_id(CONF_ID, EntityKind::Sensor, slot.key())
        .optional(CONF_NAME, Validator::Text)
        .optional_default(CONF_UNIT_OF_MEASUREMENT, slot.unit(), Validator::Text)
        .optional_default(CONF_ICON, slot.icon(), Validator::Icon)
        .optional_default(
            CONF_ACCURACY_DECIMALS,
            i64::from(slot.accuracy_decimals()),
            Validator::Integer,
        )
        .optional_default(CONF_DEVICE_CLASS, slot.device_class(), Validator::Text)
        .optional_default(
            CONF_STATE_CLASS,
            classes::STATE_CLASS_MEASUREMENT,
            Validator::TokenOf(STATE_CLASSES),
        )
}

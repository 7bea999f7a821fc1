//! The fixed sensor slot table and normalized sensor descriptors

use crate::classes::*;
use crate::icons::*;
use crate::units::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named sensor slot on the device
///
/// Every auxiliary sensor binds to exactly one of these fixed slots. Slot
/// order is the emission order, regardless of where the sub-blocks appear
/// in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorSlot {
    OutdoorTemperature,
    #[serde(rename = "temperature_2a")]
    Temperature2a,
    #[serde(rename = "temperature_2b")]
    Temperature2b,
    Current,
    TimerStart,
    TimerStop,
    ErrorFlags,
    ProtectFlags,
    PowerUsage,
    HumiditySetpoint,
}

impl SensorSlot {
    /// All slots, in emission order
    pub const ALL: [SensorSlot; 10] = [
        SensorSlot::OutdoorTemperature,
        SensorSlot::Temperature2a,
        SensorSlot::Temperature2b,
        SensorSlot::Current,
        SensorSlot::TimerStart,
        SensorSlot::TimerStop,
        SensorSlot::ErrorFlags,
        SensorSlot::ProtectFlags,
        SensorSlot::PowerUsage,
        SensorSlot::HumiditySetpoint,
    ];

    /// The configuration key naming this slot's sub-block
    pub fn key(&self) -> &'static str {
        match self {
            SensorSlot::OutdoorTemperature => "outdoor_temperature",
            SensorSlot::Temperature2a => "temperature_2a",
            SensorSlot::Temperature2b => "temperature_2b",
            SensorSlot::Current => "current",
            SensorSlot::TimerStart => "timer_start",
            SensorSlot::TimerStop => "timer_stop",
            SensorSlot::ErrorFlags => "error_flags",
            SensorSlot::ProtectFlags => "protect_flags",
            SensorSlot::PowerUsage => "power_usage",
            SensorSlot::HumiditySetpoint => "humidity_setpoint",
        }
    }

    /// Default unit of measurement for this slot
    pub fn unit(&self) -> &'static str {
        match self {
            SensorSlot::OutdoorTemperature
            | SensorSlot::Temperature2a
            | SensorSlot::Temperature2b => UNIT_FAHRENHEIT,
            SensorSlot::Current => UNIT_AMPERE,
            SensorSlot::TimerStart | SensorSlot::TimerStop => UNIT_MINUTE,
            SensorSlot::ErrorFlags | SensorSlot::ProtectFlags => UNIT_EMPTY,
            SensorSlot::PowerUsage => UNIT_WATT,
            SensorSlot::HumiditySetpoint => UNIT_PERCENT,
        }
    }

    /// Default icon hint for this slot
    pub fn icon(&self) -> &'static str {
        match self {
            SensorSlot::OutdoorTemperature
            | SensorSlot::Temperature2a
            | SensorSlot::Temperature2b => ICON_THERMOMETER,
            SensorSlot::Current | SensorSlot::PowerUsage => ICON_POWER,
            SensorSlot::TimerStart | SensorSlot::TimerStop => ICON_TIMER,
            SensorSlot::ErrorFlags => ICON_BUG,
            SensorSlot::ProtectFlags => ICON_SECURITY,
            SensorSlot::HumiditySetpoint => ICON_WATER_PERCENT,
        }
    }

    /// Default number of displayed decimals for this slot
    pub fn accuracy_decimals(&self) -> u8 {
        match self {
            SensorSlot::OutdoorTemperature
            | SensorSlot::Temperature2a
            | SensorSlot::Temperature2b => 1,
            _ => 0,
        }
    }

    /// Default device classification for this slot
    pub fn device_class(&self) -> &'static str {
        match self {
            SensorSlot::OutdoorTemperature
            | SensorSlot::Temperature2a
            | SensorSlot::Temperature2b => DEVICE_CLASS_TEMPERATURE,
            SensorSlot::Current | SensorSlot::PowerUsage => DEVICE_CLASS_POWER,
            SensorSlot::TimerStart | SensorSlot::TimerStop => DEVICE_CLASS_DURATION,
            SensorSlot::ErrorFlags | SensorSlot::ProtectFlags => DEVICE_CLASS_EMPTY,
            SensorSlot::HumiditySetpoint => DEVICE_CLASS_HUMIDITY,
        }
    }
}

impl fmt::Display for SensorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The normalized descriptor of one sensor entity
///
/// Built from a validated sensor sub-block; the metadata fields are always
/// populated because validation fills them from the slot defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorOptions {
    /// Optional display name
    pub name: Option<String>,
    /// Unit of measurement (may be empty for dimensionless slots)
    pub unit_of_measurement: String,
    /// Icon hint in `prefix:name` form
    pub icon: String,
    /// Number of decimals shown
    pub accuracy_decimals: u8,
    /// Device classification (may be empty)
    pub device_class: String,
    /// Sampling classification
    pub state_class: String,
}

impl SensorOptions {
    /// Descriptor carrying a slot's defaults with no overrides
    pub fn for_slot(slot: SensorSlot) -> Self {
        Self {
            name: None,
            unit_of_measurement: slot.unit().to_string(),
            icon: slot.icon().to_string(),
            accuracy_decimals: slot.accuracy_decimals(),
            device_class: slot.device_class().to_string(),
            state_class: STATE_CLASS_MEASUREMENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_order_is_fixed() {
        assert_eq!(SensorSlot::ALL[0], SensorSlot::OutdoorTemperature);
        assert_eq!(SensorSlot::ALL[3], SensorSlot::Current);
        assert_eq!(SensorSlot::ALL[9], SensorSlot::HumiditySetpoint);
        assert_eq!(SensorSlot::ALL.len(), 10);
    }

    #[test]
    fn test_slot_metadata() {
        let slot = SensorSlot::Current;
        assert_eq!(slot.key(), "current");
        assert_eq!(slot.unit(), "A");
        assert_eq!(slot.icon(), "mdi:power");
        assert_eq!(slot.accuracy_decimals(), 0);
        assert_eq!(slot.device_class(), "power");
    }

    #[test]
    fn test_temperature_slots_show_one_decimal() {
        assert_eq!(SensorSlot::OutdoorTemperature.accuracy_decimals(), 1);
        assert_eq!(SensorSlot::Temperature2b.unit(), "°F");
    }

    #[test]
    fn test_flag_slots_are_dimensionless() {
        assert_eq!(SensorSlot::ErrorFlags.unit(), "");
        assert_eq!(SensorSlot::ErrorFlags.device_class(), "");
        assert_eq!(SensorSlot::ProtectFlags.icon(), "mdi:security");
    }

    #[test]
    fn test_default_descriptor() {
        let options = SensorOptions::for_slot(SensorSlot::HumiditySetpoint);
        assert_eq!(options.unit_of_measurement, "%");
        assert_eq!(options.icon, "mdi:water-percent");
        assert_eq!(options.state_class, "measurement");
        assert_eq!(options.name, None);
    }

    #[test]
    fn test_slot_serde_uses_key_names() {
        let json = serde_json::to_string(&SensorSlot::Temperature2a).unwrap();
        assert_eq!(json, "\"temperature_2a\"");
        let json = serde_json::to_string(&SensorSlot::TimerStart).unwrap();
        assert_eq!(json, "\"timer_start\"");
    }
}

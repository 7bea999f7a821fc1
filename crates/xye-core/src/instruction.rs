//! The construction-instruction vocabulary
//!
//! A compilation produces an ordered sequence of these instructions. The
//! external artifact emitter owns their realization; the compiler only
//! guarantees completeness, internal consistency, and deterministic order.

use crate::climate::{ClimateMode, ClimatePreset, CustomFanMode, CustomPreset, SwingMode};
use crate::ident::Identifier;
use crate::sensor::{SensorOptions, SensorSlot};
use crate::value::ParamValue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One creation or wiring step for the external emitter to realize
///
/// The `id` field always names the instruction's subject: the device for
/// device-level steps, the sensor for sensor declarations, the action
/// object for action steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Create the device object
    DeclareDevice { id: Identifier },

    /// Set the device's component setup priority
    SetSetupPriority { id: Identifier, priority: f64 },

    /// Wire the device to a serial bus declared elsewhere
    LinkSerialBus { id: Identifier, bus: Identifier },

    /// Set the device's display name
    SetDeviceName { id: Identifier, name: String },

    /// Constrain the displayed temperature range and step
    SetVisual {
        id: Identifier,
        min_temperature: Option<f64>,
        max_temperature: Option<f64>,
        temperature_step: Option<f64>,
    },

    /// Set the status poll period
    SetPollPeriod { id: Identifier, period: Duration },

    /// Set the bus response timeout
    SetResponseTimeout { id: Identifier, timeout: Duration },

    /// Enable or disable the confirmation beeper
    SetBeeper { id: Identifier, enabled: bool },

    /// Enable or disable capability auto-configuration
    SetAutoconf { id: Identifier, enabled: bool },

    /// Turn on a named build feature
    EnableFeature { feature: String },

    /// Wire the device to an infrared transmitter declared elsewhere
    LinkTransmitter { id: Identifier, transmitter: Identifier },

    /// Restrict the set of operating modes
    SetSupportedModes { id: Identifier, modes: Vec<ClimateMode> },

    /// Restrict the set of louver swing modes
    SetSupportedSwingModes { id: Identifier, modes: Vec<SwingMode> },

    /// Restrict the set of standard presets
    SetSupportedPresets { id: Identifier, presets: Vec<ClimatePreset> },

    /// Declare the vendor-specific presets the unit offers
    SetCustomPresets { id: Identifier, presets: Vec<CustomPreset> },

    /// Declare the vendor-specific fan modes the unit offers
    SetCustomFanModes { id: Identifier, modes: Vec<CustomFanMode> },

    /// Create a sensor entity
    DeclareSensor { id: Identifier, options: SensorOptions },

    /// Bind a declared sensor to a named slot on the device
    AttachSensor {
        id: Identifier,
        slot: SensorSlot,
        sensor: Identifier,
    },

    /// Create an action object targeting a device
    DeclareAction {
        id: Identifier,
        action: String,
        device: Identifier,
    },

    /// Bind one parameter on a declared action
    SetActionParameter {
        id: Identifier,
        parameter: String,
        value: ParamValue,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ConstValue;

    fn id(name: &str) -> Identifier {
        Identifier::new(name).unwrap()
    }

    #[test]
    fn test_serde_tagging() {
        let instruction = Instruction::SetPollPeriod {
            id: id("ac"),
            period: Duration::from_secs(1),
        };
        let json = serde_json::to_value(&instruction).unwrap();
        assert_eq!(json["op"], "set_poll_period");
        assert_eq!(json["id"], "ac");
        assert_eq!(json["period"]["secs"], 1);
    }

    #[test]
    fn test_roundtrip() {
        let instructions = vec![
            Instruction::DeclareDevice { id: id("ac") },
            Instruction::SetSupportedModes {
                id: id("ac"),
                modes: vec![ClimateMode::Cool, ClimateMode::Heat],
            },
            Instruction::AttachSensor {
                id: id("ac"),
                slot: SensorSlot::Current,
                sensor: id("current_1"),
            },
            Instruction::SetActionParameter {
                id: id("follow_me_1"),
                parameter: "temperature".to_string(),
                value: ParamValue::Literal(ConstValue::Float(24.5)),
            },
        ];
        let json = serde_json::to_string(&instructions).unwrap();
        let parsed: Vec<Instruction> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, instructions);
    }
}

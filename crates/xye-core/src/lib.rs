//! Core types for the XYE configuration compiler
//!
//! This crate provides the fundamental vocabulary shared by the whole
//! compiler: validated identifiers, entity kinds, document key paths, the
//! climate capability enumerations, the fixed sensor slot table, and the
//! construction-instruction set handed to the artifact emitter.

mod climate;
mod ident;
mod instruction;
mod path;
mod sensor;
mod value;

pub use climate::{ClimateMode, ClimatePreset, CustomFanMode, CustomPreset, SwingMode};
pub use ident::{EntityHandle, EntityKind, Identifier, IdentifierError};
pub use instruction::Instruction;
pub use path::KeyPath;
pub use sensor::{SensorOptions, SensorSlot};
pub use value::{ConstValue, ParamValue};

/// Units of measurement used by the sensor slot table
pub mod units {
    /// Degrees Fahrenheit
    pub const UNIT_FAHRENHEIT: &str = "°F";

    /// Ampere
    pub const UNIT_AMPERE: &str = "A";

    /// Minute
    pub const UNIT_MINUTE: &str = "min";

    /// Watt
    pub const UNIT_WATT: &str = "W";

    /// Percent
    pub const UNIT_PERCENT: &str = "%";

    /// Dimensionless quantity
    pub const UNIT_EMPTY: &str = "";
}

/// Icon hints used by the sensor slot table
pub mod icons {
    pub const ICON_THERMOMETER: &str = "mdi:thermometer";
    pub const ICON_POWER: &str = "mdi:power";
    pub const ICON_TIMER: &str = "mdi:timer";
    pub const ICON_BUG: &str = "mdi:bug";
    pub const ICON_SECURITY: &str = "mdi:security";
    pub const ICON_WATER_PERCENT: &str = "mdi:water-percent";
}

/// Sensor classification metadata
pub mod classes {
    /// Temperature measurement
    pub const DEVICE_CLASS_TEMPERATURE: &str = "temperature";

    /// Power measurement
    pub const DEVICE_CLASS_POWER: &str = "power";

    /// Time span measurement
    pub const DEVICE_CLASS_DURATION: &str = "duration";

    /// Relative humidity measurement
    pub const DEVICE_CLASS_HUMIDITY: &str = "humidity";

    /// No classification
    pub const DEVICE_CLASS_EMPTY: &str = "";

    /// Point-in-time sampling
    pub const STATE_CLASS_MEASUREMENT: &str = "measurement";

    /// Monotonically accumulating total
    pub const STATE_CLASS_TOTAL: &str = "total";

    /// Accumulating total that may reset
    pub const STATE_CLASS_TOTAL_INCREASING: &str = "total_increasing";
}

//! Climate capability enumerations
//!
//! Each capability list in the device configuration draws from one of these
//! closed token sets. Tokens are matched case-insensitively during
//! validation and normalized to their canonical uppercase form.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! capability_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $token:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// The canonical tokens accepted for this capability
            pub const TOKENS: &'static [&'static str] = &[$($token),+];

            /// Parse a token, ignoring ASCII case
            pub fn from_token(token: &str) -> Option<Self> {
                $(
                    if token.eq_ignore_ascii_case($token) {
                        return Some($name::$variant);
                    }
                )+
                None
            }

            /// The canonical token for this value
            pub fn token(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

capability_enum! {
    /// Operating modes the unit can be put in
    ClimateMode {
        HeatCool => "HEAT_COOL",
        Cool => "COOL",
        Heat => "HEAT",
        Dry => "DRY",
        FanOnly => "FAN_ONLY",
    }
}

capability_enum! {
    /// Louver swing modes
    SwingMode {
        Both => "BOTH",
        Vertical => "VERTICAL",
        Horizontal => "HORIZONTAL",
    }
}

capability_enum! {
    /// Standard presets
    ClimatePreset {
        Eco => "ECO",
        Boost => "BOOST",
        Sleep => "SLEEP",
    }
}

capability_enum! {
    /// Vendor-specific presets
    CustomPreset {
        FreezeProtection => "FREEZE_PROTECTION",
    }
}

capability_enum! {
    /// Vendor-specific fan modes
    CustomFanMode {
        Silent => "SILENT",
        Turbo => "TURBO",
    }
}

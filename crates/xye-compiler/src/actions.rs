//! The device's built-in action set

use crate::model::{CONF_BEEPER, CONF_TEMPERATURE};
use xye_actions::{ActionRegistry, ActionResult};
use xye_schema::{Schema, Validator};

/// Names of the actions that take no parameters
const STATELESS_ACTIONS: &[&str] = &[
    "display_toggle",
    "swing_step",
    "beeper_on",
    "beeper_off",
    "power_on",
    "power_off",
    "power_toggle",
];

/// Register every built-in action on a registry
///
/// `follow_me` reports a remote temperature reading to the unit and
/// optionally beeps on receipt; its bound parameters are emitted beeper
/// first. The remaining seven actions are parameterless triggers.
pub fn register_builtin_actions(actions: &ActionRegistry) -> ActionResult<()> {
    actions.register(
        "follow_me",
        Schema::new()
            .required(CONF_TEMPERATURE, Validator::Temperature)
            .optional_default(CONF_BEEPER, false, Validator::Boolean),
        |args| {
            Ok(vec![
                args.bind_bool(CONF_BEEPER)?,
                args.bind_f64(CONF_TEMPERATURE)?,
            ])
        },
    )?;

    for name in STATELESS_ACTIONS {
        actions.register(name, Schema::new(), |_| Ok(Vec::new()))?;
    }

    Ok(())
}

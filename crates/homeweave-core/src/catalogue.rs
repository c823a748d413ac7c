// ── Capability catalogue ──
//
// Static vocabulary tying each abstract capability to the controller
// category tags (`generic_type`) that satisfy it, plus the fallback
// constants used when a command carries no metadata.

use crate::model::{Bounds, Capability};

pub const TOGGLE_TAGS: &[&str] = &["LIGHT_TOGGLE", "ENERGY_TOGGLE", "HEATING_TOGGLE"];
pub const ON_TAGS: &[&str] = &["LIGHT_ON", "ENERGY_ON", "HEATING_ON", "SWITCH_ON"];
pub const OFF_TAGS: &[&str] = &["LIGHT_OFF", "ENERGY_OFF", "HEATING_OFF", "SWITCH_OFF"];
pub const DIM_TAGS: &[&str] = &["LIGHT_SLIDER"];
pub const COLOR_TAGS: &[&str] = &["LIGHT_SET_COLOR", "LIGHT_COLOR"];
pub const TEMPERATURE_TAGS: &[&str] = &["LIGHT_SET_COLOR_TEMP"];

/// Info command tags that report a device's on/off state.
pub const STATE_TAGS: &[&str] = &[
    "LIGHT_STATE",
    "LIGHT_STATE_BOOL",
    "ENERGY_STATE",
    "HEATING_STATE",
    "SWITCH_STATE",
];

/// Name / logical-id fragments that mark an untagged state command.
pub const STATE_NAME_HINTS: &[&str] = &["etat", "state", "status"];

/// Info subtypes accepted as a last-resort state command.
pub const STATE_SUBTYPES: &[&str] = &["binary", "numeric", "string"];

/// Native range assumed for dim commands that declare none.
pub const DIM_FALLBACK: Bounds = Bounds {
    min: Some(0.0),
    max: Some(254.0),
};

/// Native range (mireds) assumed for temperature commands that declare none.
pub const TEMPERATURE_FALLBACK: Bounds = Bounds {
    min: Some(153.0),
    max: Some(500.0),
};

/// Colour temperature span used by the hue → kelvin estimate.
pub const KELVIN_WARM: f64 = 2200.0;
pub const KELVIN_COOL: f64 = 6500.0;

/// Category tags satisfying `capability`.
pub fn tags_for(capability: Capability) -> &'static [&'static str] {
    match capability {
        Capability::Toggle => TOGGLE_TAGS,
        Capability::On => ON_TAGS,
        Capability::Off => OFF_TAGS,
        Capability::Dim => DIM_TAGS,
        Capability::Color => COLOR_TAGS,
        Capability::Temperature => TEMPERATURE_TAGS,
    }
}

/// Canonical verb an untagged action command may be named after.
pub fn verb_for(capability: Capability) -> Option<&'static str> {
    match capability {
        Capability::Toggle => Some("toggle"),
        Capability::On => Some("on"),
        Capability::Off => Some("off"),
        Capability::Dim | Capability::Color | Capability::Temperature => None,
    }
}

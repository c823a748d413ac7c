// ── Wire → domain conversion ──
//
// Translates Jeedom JSON-RPC payloads into the engine's canonical model.
// Bounds resolution lives here because the controller scatters range
// metadata across several nested blocks.

use homeweave_api::{Equipment, RawCommand};
use serde_json::Value;

use crate::config::DeviceFilter;
use crate::model::capability::as_number;
use crate::model::{Bounds, CommandDirection, DeviceKind, NativeCommand};

impl From<&RawCommand> for NativeCommand {
    fn from(raw: &RawCommand) -> Self {
        Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            direction: CommandDirection::parse(&raw.kind),
            subtype: raw.sub_type.clone(),
            generic_type: raw.generic_type.clone().filter(|t| !t.is_empty()),
            logical_id: raw.logical_id.clone(),
            bounds: resolve_bounds(raw),
            cached_state: raw.state.clone().filter(|v| !v.is_null()),
        }
    }
}

/// First finite `minValue` / `maxValue` across the top level,
/// `configuration`, `display` and `template.dashboard`.
pub fn resolve_bounds(raw: &RawCommand) -> Bounds {
    let nested = |key: &str| -> [Option<&Value>; 4] {
        let top = match key {
            "minValue" => raw.min_value.as_ref(),
            _ => raw.max_value.as_ref(),
        };
        [
            top,
            raw.configuration.as_ref().and_then(|c| c.get(key)),
            raw.display.as_ref().and_then(|d| d.get(key)),
            raw.template
                .as_ref()
                .and_then(|t| t.get("dashboard"))
                .and_then(|d| d.get(key)),
        ]
    };
    let first_finite = |key: &str| nested(key).into_iter().flatten().find_map(as_number);

    Bounds {
        min: first_finite("minValue"),
        max: first_finite("maxValue"),
    }
}

/// Device category from the owning plugin.
pub fn device_kind(eq_type_name: Option<&str>) -> DeviceKind {
    match eq_type_name {
        Some("light") => DeviceKind::Light,
        Some("heating") => DeviceKind::Thermostat,
        _ => DeviceKind::Switch,
    }
}

/// Whether an equipment should be exposed as a device.
pub fn passes_filter(equipment: &Equipment, filter: &DeviceFilter) -> bool {
    let type_ok = equipment
        .eq_type_name
        .as_deref()
        .is_some_and(|t| filter.equipment_types.iter().any(|allowed| allowed == t));
    type_ok
        && (!filter.require_enabled || equipment.is_enable)
        && (!filter.require_visible || equipment.is_visible)
}

// ── Capability executor ──
//
// Resolves one abstract capability invocation into exactly one native
// command call. Planning is pure: the adapter supplies the command list,
// the mapping and (only when needed) the device's current on/off reading,
// then performs the returned `Invocation` itself.
//
// Resolution order:
//   1. `mapping[capability]`
//   2. colour → temperature fallback when no colour command exists
//   3. toggle priority: explicit on/off commands beat a native toggle
//   4. slider rescaling for dim / temperature

use homeweave_api::ExecOptions;
use serde::Serialize;
use tracing::debug;

use crate::capability::{hue_fallback, rescale};
use crate::catalogue::{DIM_FALLBACK, TEMPERATURE_FALLBACK};
use crate::error::CoreError;
use crate::model::{Bounds, Capability, CapabilityParams, CommandMapping, NativeCommand};

/// A fully resolved native call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub command_id: String,
    /// The capability actually served, after fallbacks.
    pub capability: Capability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slider: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Kelvin estimate when a colour request was served by a temperature command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kelvin: Option<i64>,
}

impl Invocation {
    /// Options to attach to the native call, if any.
    pub fn options(&self) -> Option<ExecOptions> {
        let opts = ExecOptions {
            slider: self.slider,
            color: self.color.clone(),
        };
        (!opts.is_empty()).then_some(opts)
    }
}

/// Whether planning `capability` needs the device's current state.
///
/// Only a toggle without an explicit target, on a device with an on or off
/// command, has to read state first.
pub fn needs_current_state(
    capability: Capability,
    params: &CapabilityParams,
    mapping: &CommandMapping,
) -> bool {
    capability == Capability::Toggle
        && params.desired_state.is_none()
        && (mapping.contains(Capability::On) || mapping.contains(Capability::Off))
}

/// Resolve `capability` on `device_id` into a native invocation.
///
/// `current_on` is consulted only for a toggle without `desired_state`; an
/// unknown reading is treated as "off", so the device is switched on.
pub fn plan(
    device_id: &str,
    capability: Capability,
    params: &CapabilityParams,
    mapping: &CommandMapping,
    commands: &[NativeCommand],
    current_on: Option<bool>,
) -> Result<Invocation, CoreError> {
    params.validate(capability)?;

    let mut effective = capability;
    let mut command_id = mapping.get(capability);
    let mut derived_value = None;
    let mut kelvin = None;

    let temperature_fallback = if capability == Capability::Color && command_id.is_none() {
        mapping.get(Capability::Temperature)
    } else {
        None
    };
    if let Some(temperature_id) = temperature_fallback {
        let fallback = hue_fallback(params.numeric_hue()?);
        debug!(
            device_id,
            value = fallback.value,
            kelvin = fallback.kelvin,
            "colour served by temperature command"
        );
        effective = Capability::Temperature;
        command_id = Some(temperature_id);
        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        let value = fallback.value as f64;
        derived_value = Some(value);
        kelvin = Some(fallback.kelvin);
    }

    if effective == Capability::Toggle
        && (mapping.contains(Capability::On) || mapping.contains(Capability::Off))
    {
        let switch_on = params
            .desired_state
            .unwrap_or_else(|| !current_on.unwrap_or(false));
        let preferred = if switch_on {
            Capability::On
        } else {
            Capability::Off
        };
        command_id = mapping
            .get(preferred)
            .or_else(|| mapping.get(Capability::Toggle));
        debug!(device_id, ?current_on, switch_on, ?command_id, "toggle resolved through on/off");
    }

    let command_id = command_id.ok_or_else(|| CoreError::CapabilityUnavailable {
        device_id: device_id.to_owned(),
        capability: effective,
    })?;

    let bounds = commands
        .iter()
        .find(|c| ids_match(&c.id, command_id))
        .map_or_else(Bounds::default, |c| c.bounds);

    let mut invocation = Invocation {
        command_id: command_id.to_owned(),
        capability: effective,
        slider: None,
        color: None,
        kelvin,
    };

    match effective {
        Capability::Dim => {
            invocation.slider = params
                .numeric_value()?
                .map(|v| rescale(v, bounds, DIM_FALLBACK));
        }
        Capability::Temperature => {
            let input = match derived_value {
                Some(v) => Some(v),
                None => params.numeric_value()?,
            };
            invocation.slider = input.map(|v| rescale(v, bounds, TEMPERATURE_FALLBACK));
        }
        Capability::Color => invocation.color = params.color_payload(),
        Capability::Toggle | Capability::On | Capability::Off => {}
    }

    debug!(
        device_id,
        requested = %capability,
        ?bounds,
        ?invocation,
        "capability resolved"
    );
    Ok(invocation)
}

/// Controller ids compare numerically when both sides are numbers.
fn ids_match(a: &str, b: &str) -> bool {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::CommandDirection;
    use pretty_assertions::assert_eq;

    fn action(id: &str, tag: &str, bounds: Bounds) -> NativeCommand {
        NativeCommand {
            id: id.into(),
            name: tag.to_lowercase(),
            direction: CommandDirection::Action,
            subtype: None,
            generic_type: Some(tag.into()),
            logical_id: None,
            bounds,
            cached_state: None,
        }
    }

    fn mapping(pairs: &[(Capability, &str)]) -> CommandMapping {
        pairs.iter().map(|(c, id)| (*c, (*id).to_string())).collect()
    }

    #[test]
    fn toggle_prefers_off_when_device_is_on() {
        let m = mapping(&[
            (Capability::On, "5"),
            (Capability::Off, "6"),
            (Capability::Toggle, "9"),
        ]);
        let inv = plan("13", Capability::Toggle, &CapabilityParams::default(), &m, &[], Some(true))
            .unwrap();
        assert_eq!(inv.command_id, "6");

        let inv = plan("13", Capability::Toggle, &CapabilityParams::default(), &m, &[], Some(false))
            .unwrap();
        assert_eq!(inv.command_id, "5");
    }

    #[test]
    fn toggle_with_unknown_state_switches_on() {
        let m = mapping(&[(Capability::On, "5"), (Capability::Off, "6")]);
        let inv =
            plan("13", Capability::Toggle, &CapabilityParams::default(), &m, &[], None).unwrap();
        assert_eq!(inv.command_id, "5");
    }

    #[test]
    fn desired_state_skips_state_read() {
        let m = mapping(&[(Capability::On, "5"), (Capability::Off, "6")]);
        let params = CapabilityParams::with_desired_state(false);
        assert!(!needs_current_state(Capability::Toggle, &params, &m));
        assert!(needs_current_state(Capability::Toggle, &CapabilityParams::default(), &m));

        let inv = plan("13", Capability::Toggle, &params, &m, &[], Some(false)).unwrap();
        assert_eq!(inv.command_id, "6");
    }

    #[test]
    fn toggle_falls_back_to_native_when_side_missing() {
        let m = mapping(&[(Capability::On, "5"), (Capability::Toggle, "9")]);
        let inv = plan("13", Capability::Toggle, &CapabilityParams::default(), &m, &[], Some(true))
            .unwrap();
        assert_eq!(inv.command_id, "9");

        let only_native = mapping(&[(Capability::Toggle, "9")]);
        assert!(!needs_current_state(Capability::Toggle, &CapabilityParams::default(), &only_native));
        let inv = plan(
            "13",
            Capability::Toggle,
            &CapabilityParams::default(),
            &only_native,
            &[],
            None,
        )
        .unwrap();
        assert_eq!(inv.command_id, "9");
    }

    #[test]
    fn unmapped_capability_is_unavailable() {
        let err = plan(
            "13",
            Capability::Dim,
            &CapabilityParams::with_value(50),
            &CommandMapping::default(),
            &[],
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::CapabilityUnavailable { capability: Capability::Dim, .. }
        ));
    }

    #[test]
    fn dim_uses_fallback_range() {
        let m = mapping(&[(Capability::Dim, "7")]);
        let cmds = [action("7", "LIGHT_SLIDER", Bounds::default())];

        let inv = plan("13", Capability::Dim, &CapabilityParams::with_value(50), &m, &cmds, None)
            .unwrap();
        assert_eq!(inv.slider, Some(127));

        let inv = plan("13", Capability::Dim, &CapabilityParams::with_value(254), &m, &cmds, None)
            .unwrap();
        assert_eq!(inv.slider, Some(254));
    }

    #[test]
    fn dim_uses_declared_range() {
        let m = mapping(&[(Capability::Dim, "7")]);
        let cmds = [action("7", "LIGHT_SLIDER", Bounds::new(0.0, 99.0))];
        let inv = plan("13", Capability::Dim, &CapabilityParams::with_value("40"), &m, &cmds, None)
            .unwrap();
        assert_eq!(inv.slider, Some(40));
        assert_eq!(inv.options().unwrap().slider, Some(40));
    }

    #[test]
    fn dim_without_value_sends_no_options() {
        let m = mapping(&[(Capability::Dim, "7")]);
        let inv = plan("13", Capability::Dim, &CapabilityParams::default(), &m, &[], None).unwrap();
        assert_eq!(inv.options(), None);
    }

    #[test]
    fn non_numeric_value_is_invalid() {
        let m = mapping(&[(Capability::Dim, "7")]);
        let err = plan("13", Capability::Dim, &CapabilityParams::with_value("max"), &m, &[], None)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { .. }));
    }

    #[test]
    fn colour_falls_back_to_temperature() {
        let m = mapping(&[(Capability::Temperature, "11")]);
        let cmds = [action("11", "LIGHT_SET_COLOR_TEMP", Bounds::default())];

        let inv = plan("13", Capability::Color, &CapabilityParams::with_hue(180.0), &m, &cmds, None)
            .unwrap();
        assert_eq!(inv.command_id, "11");
        assert_eq!(inv.capability, Capability::Temperature);
        assert_eq!(inv.kelvin, Some(6500));
        assert_eq!(inv.slider, Some(500));

        let inv = plan("13", Capability::Color, &CapabilityParams::with_hue(0.0), &m, &cmds, None)
            .unwrap();
        assert_eq!(inv.kelvin, Some(2200));
        assert_eq!(inv.slider, Some(153));
    }

    #[test]
    fn colour_command_gets_payload() {
        let m = mapping(&[(Capability::Color, "12"), (Capability::Temperature, "11")]);
        let params = CapabilityParams {
            hex: Some("#ff8800".into()),
            ..CapabilityParams::default()
        };
        let inv = plan("13", Capability::Color, &params, &m, &[], None).unwrap();
        assert_eq!(inv.command_id, "12");
        assert_eq!(inv.color.as_deref(), Some("#ff8800"));
        assert_eq!(inv.kelvin, None);
    }

    #[test]
    fn colour_command_ignores_unusable_hue() {
        let m = mapping(&[(Capability::Color, "12")]);
        let params = CapabilityParams {
            hex: Some("#ff8800".into()),
            hue: Some(serde_json::Value::from("red")),
            ..CapabilityParams::default()
        };
        let inv = plan("13", Capability::Color, &params, &m, &[], None).unwrap();
        assert_eq!(inv.command_id, "12");
        assert_eq!(inv.color.as_deref(), Some("#ff8800"));

        // The temperature fallback does read `hue`.
        let m = mapping(&[(Capability::Temperature, "11")]);
        let err = plan("13", Capability::Color, &params, &m, &[], None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { ref name, .. } if name == "hue"));
    }

    #[test]
    fn temperature_rescales_into_mireds() {
        let m = mapping(&[(Capability::Temperature, "11")]);
        let inv = plan("13", Capability::Temperature, &CapabilityParams::with_value(50), &m, &[], None)
            .unwrap();
        // 153 + 0.5 * 347
        assert_eq!(inv.slider, Some(327));
    }

    #[test]
    fn numeric_ids_match_loosely() {
        assert!(ids_match("07", "7"));
        assert!(!ids_match("a", "7"));
    }
}

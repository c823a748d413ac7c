// ── Capability vocabulary ──
//
// The fixed set of abstract actions a dashboard can invoke, the per-device
// support flags derived from a command directory, and the loosely typed
// parameter bag that accompanies an invocation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::CoreError;

/// An abstract device action, independent of any controller's commands.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Capability {
    Toggle,
    On,
    Off,
    Dim,
    Color,
    Temperature,
}

/// What a device supports, as inferred from its command directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct CapabilitySet {
    pub toggle: bool,
    pub dim: bool,
    pub color: bool,
    pub temperature: bool,
}

impl CapabilitySet {
    /// Names of the supported capabilities, for display.
    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.toggle, "toggle"),
            (self.dim, "dim"),
            (self.color, "color"),
            (self.temperature, "temperature"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

/// Parameters accompanying a capability invocation.
///
/// Kept deliberately loose (`value` and `hue` accept numbers or numeric
/// strings) because they arrive straight from dashboard requests.
/// [`CapabilityParams::validate`] rejects malformed input before any
/// controller call is made.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Explicit target for `toggle`; skips the state read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<bool>,
    /// Hue angle in degrees, used by the colour-to-temperature fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<u8>,
}

impl CapabilityParams {
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn with_desired_state(on: bool) -> Self {
        Self {
            desired_state: Some(on),
            ..Self::default()
        }
    }

    pub fn with_hue(hue: f64) -> Self {
        Self {
            hue: Some(Value::from(hue)),
            ..Self::default()
        }
    }

    /// `value` as a finite number, if present.
    pub fn numeric_value(&self) -> Result<Option<f64>, CoreError> {
        self.value
            .as_ref()
            .map(|v| as_number(v).ok_or_else(|| not_numeric("value", v)))
            .transpose()
    }

    /// `hue` as a finite number, if present.
    pub fn numeric_hue(&self) -> Result<Option<f64>, CoreError> {
        self.hue
            .as_ref()
            .map(|v| as_number(v).ok_or_else(|| not_numeric("hue", v)))
            .transpose()
    }

    /// Reject parameters that can never produce a valid command.
    ///
    /// Numeric fields are only checked for the capabilities that consume
    /// them, so e.g. a colour string in `value` stays legal for `color`.
    /// `hue` is only read on the colour-to-temperature fallback, which
    /// checks it when the plan is built.
    pub fn validate(&self, capability: Capability) -> Result<(), CoreError> {
        match capability {
            Capability::Dim | Capability::Temperature => {
                self.numeric_value()?;
            }
            Capability::Color | Capability::Toggle | Capability::On | Capability::Off => {}
        }
        Ok(())
    }

    /// The colour payload for a colour command: `hex`, then `color`, then a
    /// string `value`, then `#rrggbb` assembled from `r`/`g`/`b`.
    pub fn color_payload(&self) -> Option<String> {
        let non_empty = |s: &String| !s.trim().is_empty();
        self.hex
            .clone()
            .filter(non_empty)
            .or_else(|| self.color.clone().filter(non_empty))
            .or_else(|| {
                self.value
                    .as_ref()
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_owned)
            })
            .or_else(|| match (self.r, self.g, self.b) {
                (Some(r), Some(g), Some(b)) => Some(format!("#{r:02x}{g:02x}{b:02x}")),
                _ => None,
            })
    }
}

/// Numbers and numeric strings both count; non-finite results do not.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn not_numeric(name: &str, value: &Value) -> CoreError {
    CoreError::invalid_parameter(name, format!("expected a number, got {value}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn capability_round_trips_lowercase() {
        assert_eq!("temperature".parse::<Capability>().unwrap(), Capability::Temperature);
        assert_eq!(Capability::Dim.to_string(), "dim");
        assert!("Dim".parse::<Capability>().is_err());
    }

    #[test]
    fn params_deserialize_camel_case() {
        let params: CapabilityParams =
            serde_json::from_value(json!({ "desiredState": true, "value": "40" })).unwrap();
        assert_eq!(params.desired_state, Some(true));
        assert_eq!(params.numeric_value().unwrap(), Some(40.0));
    }

    #[test]
    fn non_numeric_dim_value_is_rejected() {
        let params = CapabilityParams::with_value("bright");
        let err = params.validate(Capability::Dim).unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { ref name, .. } if name == "value"));
        // The same value is a legal colour payload.
        assert!(params.validate(Capability::Color).is_ok());
    }

    #[test]
    fn color_payload_precedence() {
        let params = CapabilityParams {
            color: Some("#00ff00".into()),
            r: Some(255),
            g: Some(0),
            b: Some(16),
            ..CapabilityParams::default()
        };
        assert_eq!(params.color_payload().as_deref(), Some("#00ff00"));

        let rgb_only = CapabilityParams {
            r: Some(255),
            g: Some(0),
            b: Some(16),
            ..CapabilityParams::default()
        };
        assert_eq!(rgb_only.color_payload().as_deref(), Some("#ff0010"));
        assert_eq!(CapabilityParams::default().color_payload(), None);
    }

    #[test]
    fn capability_set_names() {
        let set = CapabilitySet {
            toggle: true,
            dim: true,
            ..CapabilitySet::default()
        };
        assert_eq!(set.names(), vec!["toggle", "dim"]);
    }
}

// ── Canonical device state ──

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

/// Where a state reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum StateSource {
    /// Live read through command execution.
    #[serde(rename = "cmd::execCmd")]
    #[strum(serialize = "cmd::execCmd")]
    ExecCmd,
    /// The controller's own cached value on an info command.
    #[serde(rename = "cached-info-state")]
    #[strum(serialize = "cached-info-state")]
    CachedInfoState,
}

/// Normalized `{on, raw, source}` triple.
///
/// `on == None` means no binary interpretation could be derived and must not
/// be read as "off". A fully empty state (serialized as `{}`) means the
/// device's state is unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<StateSource>,
}

impl DeviceState {
    /// An empty, "unknown" state.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unknown(&self) -> bool {
        self.on.is_none() && self.raw.is_none() && self.source.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_state_serializes_empty() {
        assert_eq!(serde_json::to_value(DeviceState::unknown()).unwrap(), json!({}));
    }

    #[test]
    fn source_uses_wire_names() {
        let state = DeviceState {
            on: Some(true),
            raw: Some(json!("1")),
            source: Some(StateSource::ExecCmd),
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({ "on": true, "raw": "1", "source": "cmd::execCmd" })
        );
        assert_eq!(StateSource::CachedInfoState.to_string(), "cached-info-state");
    }
}

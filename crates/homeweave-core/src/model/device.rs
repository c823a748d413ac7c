// ── Normalized devices ──
//
// The controller-agnostic device record exposed to dashboards, plus the
// capability → native command table resolved for it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

use super::capability::{Capability, CapabilitySet};
use super::provider::ProviderKind;

/// Coarse device category used by dashboards to pick a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceKind {
    Light,
    Thermostat,
    Switch,
}

/// Capability → native command id.
///
/// A missing entry means the capability cannot be invoked, whatever the
/// capability set claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandMapping(BTreeMap<Capability, String>);

impl CommandMapping {
    pub fn get(&self, capability: Capability) -> Option<&str> {
        self.0.get(&capability).map(String::as_str)
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains_key(&capability)
    }

    /// Keep the first command seen for a capability.
    pub fn insert_first(&mut self, capability: Capability, command_id: &str) {
        self.0
            .entry(capability)
            .or_insert_with(|| command_id.to_owned());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Capability, &str)> {
        self.0.iter().map(|(cap, id)| (*cap, id.as_str()))
    }
}

impl FromIterator<(Capability, String)> for CommandMapping {
    fn from_iter<I: IntoIterator<Item = (Capability, String)>>(iter: I) -> Self {
        let mut mapping = Self::default();
        for (cap, id) in iter {
            mapping.insert_first(cap, &id);
        }
        mapping
    }
}

/// Where and how a normalized device's commands live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCommandMapping {
    pub provider_type: ProviderKind,
    /// Controller-native device id.
    pub device_id: String,
    pub commands: CommandMapping,
}

/// A physical device, as exposed to dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDevice {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub capabilities: CapabilitySet,
    pub command_mapping: DeviceCommandMapping,
}

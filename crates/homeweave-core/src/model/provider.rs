// ── Provider kinds ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Controller backends the registry can instantiate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    Jeedom,
}

impl ProviderKind {
    /// Human-facing name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Jeedom => "Jeedom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Jeedom => "Jeedom home automation platform",
        }
    }
}

/// One entry of the registry's catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    pub name: String,
    pub description: String,
}

impl From<ProviderKind> for ProviderDescriptor {
    fn from(kind: ProviderKind) -> Self {
        Self {
            kind,
            name: kind.display_name().to_owned(),
            description: kind.description().to_owned(),
        }
    }
}

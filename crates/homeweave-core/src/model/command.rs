// ── Native commands ──
//
// A controller command as the engine sees it: identity, direction, the
// controller's category tag, and any declared numeric range.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

/// Whether a command reads (`info`) or writes (`action`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommandDirection {
    Info,
    Action,
    #[serde(other)]
    Unknown,
}

impl CommandDirection {
    /// Parse the controller's `type` field; anything unexpected is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            r if r.eq_ignore_ascii_case("info") => Self::Info,
            r if r.eq_ignore_ascii_case("action") => Self::Action,
            _ => Self::Unknown,
        }
    }
}

/// Declared numeric range of a slider-like command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

/// One addressable command on a physical device.
///
/// Immutable for the lifetime of a directory cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeCommand {
    pub id: String,
    pub name: String,
    pub direction: CommandDirection,
    pub subtype: Option<String>,
    /// Controller category tag (`LIGHT_ON`, `LIGHT_SLIDER`, ...).
    pub generic_type: Option<String>,
    pub logical_id: Option<String>,
    pub bounds: Bounds,
    /// Last value the controller cached for an info command.
    pub cached_state: Option<Value>,
}

impl NativeCommand {
    pub fn is_info(&self) -> bool {
        self.direction == CommandDirection::Info
    }

    pub fn is_action(&self) -> bool {
        self.direction == CommandDirection::Action
    }

    /// `true` if the category tag is one of `tags`.
    pub fn has_tag(&self, tags: &[&str]) -> bool {
        self.generic_type
            .as_deref()
            .is_some_and(|tag| tags.contains(&tag))
    }
}

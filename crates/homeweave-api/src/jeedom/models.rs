// Jeedom JSON-RPC wire types
//
// Every call goes through the same `{ jsonrpc, id, method, params }` request
// and `{ result | error }` response envelope. Jeedom is loose about scalar
// types: identifiers and flags arrive as numbers or numeric strings depending
// on plugin and version, so both are accepted. Fields use `#[serde(default)]`
// liberally and anything unmodelled lands in `extra`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ── Envelope ─────────────────────────────────────────────────────────

/// JSON-RPC 2.0 request body sent to `core/api/jeeApi.php`.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: &'static str,
    pub method: &'a str,
    pub params: Value,
}

/// JSON-RPC 2.0 response envelope.
///
/// ```json
/// { "jsonrpc": "2.0", "id": "1", "result": ... }
/// { "jsonrpc": "2.0", "id": "1", "error": { "code": -32001, "message": "..." } }
/// ```
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

/// The `error` member of a JSON-RPC response.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

// ── Equipment ────────────────────────────────────────────────────────

/// One equipment ("eqLogic") from `eqLogic::all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Plugin that owns the equipment (`virtual`, `light`, `heating`, ...).
    #[serde(default, rename = "eqType_name")]
    pub eq_type_name: Option<String>,
    #[serde(default, rename = "isEnable", deserialize_with = "de_flag")]
    pub is_enable: bool,
    #[serde(default, rename = "isVisible", deserialize_with = "de_flag")]
    pub is_visible: bool,
    #[serde(default, rename = "object_id")]
    pub object_id: Option<Value>,
    /// Catch-all for plugin-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Command ──────────────────────────────────────────────────────────

/// One command from `cmd::byEqLogicId`.
///
/// Range metadata (`minValue` / `maxValue`) can sit at the top level or
/// inside `configuration`, `display`, or `template.dashboard`, so those
/// sub-objects are kept as raw JSON for the engine to inspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCommand {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// `info` or `action`.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// `binary`, `numeric`, `string`, `other`, `slider`, `color`, ...
    #[serde(default, rename = "subType")]
    pub sub_type: Option<String>,
    /// Semantic category tag (`LIGHT_ON`, `LIGHT_SLIDER`, ...).
    #[serde(default)]
    pub generic_type: Option<String>,
    #[serde(default, rename = "logicalId")]
    pub logical_id: Option<String>,
    #[serde(default, rename = "minValue")]
    pub min_value: Option<Value>,
    #[serde(default, rename = "maxValue")]
    pub max_value: Option<Value>,
    #[serde(default)]
    pub configuration: Option<Value>,
    #[serde(default)]
    pub display: Option<Value>,
    #[serde(default)]
    pub template: Option<Value>,
    /// Last value the controller cached for an info command.
    #[serde(default)]
    pub state: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options attached to `cmd::execCmd`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slider: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ExecOptions {
    pub fn is_empty(&self) -> bool {
        self.slider.is_none() && self.color.is_none()
    }
}

// ── Events ───────────────────────────────────────────────────────────

/// Result of `event::changes`: the next cursor plus any changes since the
/// previous one.
#[derive(Debug, Clone, Deserialize)]
pub struct EventChanges {
    #[serde(deserialize_with = "de_cursor")]
    pub datetime: f64,
    #[serde(default)]
    pub result: Vec<ChangeEvent>,
}

/// A single change notification (`cmd::update`, `eqLogic::update`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub option: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Lenient scalar decoding ──────────────────────────────────────────

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}

fn de_cursor<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("cursor out of range")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("non-numeric cursor '{s}'"))),
        other => Err(serde::de::Error::custom(format!(
            "expected numeric cursor, got {other}"
        ))),
    }
}

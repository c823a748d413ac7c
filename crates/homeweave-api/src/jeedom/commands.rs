// Jeedom command endpoints
//
// Command directory lookup (`cmd::byEqLogicId`) and execution
// (`cmd::execCmd`). Executing an info command returns its current value,
// which is how live state is read.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::jeedom::client::{JeedomClient, id_param};
use crate::jeedom::models::{ExecOptions, RawCommand};

impl JeedomClient {
    /// List the commands attached to one equipment.
    ///
    /// `cmd::byEqLogicId` with `{"eqLogic_id": ...}`. A missing `result` is
    /// treated as an empty directory.
    pub async fn list_commands(&self, equipment_id: &str) -> Result<Vec<RawCommand>, Error> {
        debug!(equipment_id, "listing commands");
        let mut params = Map::new();
        params.insert("eqLogic_id".into(), id_param(equipment_id));
        Ok(self
            .call_optional("cmd::byEqLogicId", params, None)
            .await?
            .unwrap_or_default())
    }

    /// Execute a command, returning whatever the controller reports.
    ///
    /// `cmd::execCmd` with `{"id": ..., "options": {...}}`. Options are only
    /// sent when at least one field is set. Action commands usually answer
    /// with an empty result, which comes back as `Value::Null`.
    pub async fn exec_command(
        &self,
        command_id: &str,
        options: Option<&ExecOptions>,
    ) -> Result<Value, Error> {
        debug!(command_id, ?options, "executing command");
        let mut params = Map::new();
        params.insert("id".into(), id_param(command_id));
        if let Some(opts) = options.filter(|o| !o.is_empty()) {
            params.insert(
                "options".into(),
                serde_json::to_value(opts).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body: String::new(),
                })?,
            );
        }
        Ok(self
            .call_optional("cmd::execCmd", params, None)
            .await?
            .unwrap_or(Value::Null))
    }
}

// Controller RPC seam
//
// The engine talks to a controller through this trait rather than the
// concrete HTTP client, so adapters can be driven by in-process fakes.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;
use crate::jeedom::client::JeedomClient;
use crate::jeedom::models::{EventChanges, Equipment, ExecOptions, RawCommand};

/// The four JSON-RPC calls the engine relies on.
#[async_trait]
pub trait JeedomRpc: Send + Sync {
    /// `eqLogic::all`
    async fn list_equipment(&self) -> Result<Vec<Equipment>, Error>;

    /// `cmd::byEqLogicId`
    async fn list_commands(&self, equipment_id: &str) -> Result<Vec<RawCommand>, Error>;

    /// `cmd::execCmd`
    async fn exec_command(
        &self,
        command_id: &str,
        options: Option<&ExecOptions>,
    ) -> Result<Value, Error>;

    /// `event::changes`
    async fn event_changes(&self, since: f64, timeout: Duration) -> Result<EventChanges, Error>;
}

#[async_trait]
impl JeedomRpc for JeedomClient {
    async fn list_equipment(&self) -> Result<Vec<Equipment>, Error> {
        JeedomClient::list_equipment(self).await
    }

    async fn list_commands(&self, equipment_id: &str) -> Result<Vec<RawCommand>, Error> {
        JeedomClient::list_commands(self, equipment_id).await
    }

    async fn exec_command(
        &self,
        command_id: &str,
        options: Option<&ExecOptions>,
    ) -> Result<Value, Error> {
        JeedomClient::exec_command(self, command_id, options).await
    }

    async fn event_changes(&self, since: f64, timeout: Duration) -> Result<EventChanges, Error> {
        JeedomClient::event_changes(self, since, timeout).await
    }
}

// ── Jeedom adapter ──
//
// Drives a Jeedom controller through its JSON-RPC API. Command directories
// and state readings go through the shared caches; every successful execute
// invalidates the device's state entry before returning.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures_util::future::join_all;
use homeweave_api::{JeedomClient, JeedomRpc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::Provider;
use crate::capability::{extract, map};
use crate::catalogue::{STATE_NAME_HINTS, STATE_SUBTYPES, STATE_TAGS};
use crate::config::{ConnectionConfig, DeviceFilter, PollConfig};
use crate::convert::{device_kind, passes_filter};
use crate::error::CoreError;
use crate::executor::{Invocation, needs_current_state, plan};
use crate::model::{
    Capability, CapabilityParams, DeviceCommandMapping, DeviceState, NativeCommand,
    NormalizedDevice, ProviderKind, StateSource,
};
use crate::normalize::normalize;
use crate::store::EngineCaches;
use crate::subscriber::{ChangeCallback, SubscriptionHandle, spawn_poll_loop};

/// Adapter for one Jeedom controller.
pub struct JeedomProvider {
    controller_id: String,
    rpc: Arc<dyn JeedomRpc>,
    caches: EngineCaches,
    filter: DeviceFilter,
    poll: PollConfig,
    /// Parent of every running poll loop; swapped out on `unsubscribe`.
    subscriptions: Mutex<CancellationToken>,
}

impl JeedomProvider {
    /// Build an adapter over any RPC implementation.
    pub fn new(config: &ConnectionConfig, rpc: Arc<dyn JeedomRpc>, caches: EngineCaches) -> Self {
        Self {
            controller_id: config.controller_key(),
            rpc,
            caches,
            filter: config.device_filter.clone(),
            poll: config.poll,
            subscriptions: Mutex::new(CancellationToken::new()),
        }
    }

    /// Build an adapter backed by the HTTP JSON-RPC client.
    pub fn connect_http(config: ConnectionConfig, caches: EngineCaches) -> Result<Self, CoreError> {
        let client = JeedomClient::new(
            config.url.clone(),
            config.api_key.clone(),
            &config.transport(),
        )?;
        Ok(Self::new(&config, Arc::new(client), caches))
    }

    async fn commands(&self, device_id: &str) -> Arc<Vec<NativeCommand>> {
        self.caches
            .directory
            .get(&self.controller_id, device_id, self.rpc.as_ref())
            .await
    }

    async fn normalize_device(
        &self,
        id: String,
        name: String,
        eq_type: Option<String>,
    ) -> NormalizedDevice {
        let commands = self.commands(&id).await;
        NormalizedDevice {
            name,
            kind: device_kind(eq_type.as_deref()),
            capabilities: extract(&commands),
            command_mapping: DeviceCommandMapping {
                provider_type: ProviderKind::Jeedom,
                device_id: id.clone(),
                commands: map(&commands),
            },
            id,
        }
    }

    async fn read_state(&self, device_id: &str) -> Result<DeviceState, CoreError> {
        let commands = self.commands(device_id).await;

        let Some(state_cmd) = find_state_command(&commands) else {
            if let Some(raw) = commands
                .iter()
                .filter(|c| c.is_info())
                .find_map(|c| c.cached_state.as_ref().filter(|v| is_truthy(v)))
            {
                return Ok(DeviceState {
                    on: normalize(raw),
                    raw: Some(raw.clone()),
                    source: Some(StateSource::CachedInfoState),
                });
            }
            debug!(device_id, "no state command found");
            return Ok(DeviceState::unknown());
        };

        let raw = self.rpc.exec_command(&state_cmd.id, None).await?;
        let state = DeviceState {
            on: normalize(&raw),
            raw: Some(raw),
            source: Some(StateSource::ExecCmd),
        };
        debug!(device_id, command_id = %state_cmd.id, on = ?state.on, "device state read");
        self.caches
            .state
            .put(&self.controller_id, device_id, state.clone());
        Ok(state)
    }
}

#[async_trait]
impl Provider for JeedomProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Jeedom
    }

    fn controller_id(&self) -> &str {
        &self.controller_id
    }

    async fn connect(&self) -> bool {
        match self.rpc.list_equipment().await {
            Ok(_) => {
                info!(controller = %self.controller_id, "controller reachable");
                true
            }
            Err(e) => {
                warn!(controller = %self.controller_id, error = %e, "controller connection failed");
                false
            }
        }
    }

    async fn list_devices(&self) -> Vec<NormalizedDevice> {
        let equipment = match self.rpc.list_equipment().await {
            Ok(equipment) => equipment,
            Err(e) => {
                warn!(controller = %self.controller_id, error = %e, "failed to list devices");
                return Vec::new();
            }
        };

        let selected: Vec<_> = equipment
            .into_iter()
            .filter(|eq| passes_filter(eq, &self.filter))
            .collect();
        debug!(count = selected.len(), "equipment selected");

        join_all(
            selected
                .into_iter()
                .map(|eq| self.normalize_device(eq.id, eq.name, eq.eq_type_name)),
        )
        .await
    }

    async fn get_device_state(&self, device_id: &str) -> DeviceState {
        if let Some(cached) = self.caches.state.get(&self.controller_id, device_id) {
            return cached;
        }

        match self.read_state(device_id).await {
            Ok(state) => state,
            Err(e) => {
                warn!(device_id, error = %e, "failed to get device state");
                DeviceState::unknown()
            }
        }
    }

    async fn execute_capability(
        &self,
        device_id: &str,
        capability: Capability,
        params: &CapabilityParams,
    ) -> Result<Invocation, CoreError> {
        params.validate(capability)?;

        let commands = self.commands(device_id).await;
        let mapping = map(&commands);

        let current_on = if needs_current_state(capability, params, &mapping) {
            self.get_device_state(device_id).await.on
        } else {
            None
        };

        let invocation = plan(device_id, capability, params, &mapping, &commands, current_on)?;
        info!(
            device_id,
            command_id = %invocation.command_id,
            capability = %invocation.capability,
            "executing command"
        );

        let options = invocation.options();
        if let Err(e) = self
            .rpc
            .exec_command(&invocation.command_id, options.as_ref())
            .await
        {
            warn!(device_id, error = %e, "failed to execute capability");
            return Err(e.into());
        }

        self.caches.state.invalidate(&self.controller_id, device_id);
        Ok(invocation)
    }

    fn subscribe(&self, on_change: ChangeCallback) -> SubscriptionHandle {
        let parent = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        spawn_poll_loop(Arc::clone(&self.rpc), self.poll, on_change, parent.child_token())
    }

    fn unsubscribe(&self) {
        let previous = std::mem::take(
            &mut *self
                .subscriptions
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        previous.cancel();
    }
}

/// Pick the info command that reports on/off state: tagged first, then by
/// name or logical id, then any binary/numeric/string info command.
fn find_state_command(commands: &[NativeCommand]) -> Option<&NativeCommand> {
    let infos = || commands.iter().filter(|c| c.is_info());

    infos()
        .find(|c| c.has_tag(STATE_TAGS))
        .or_else(|| {
            infos().find(|c| {
                let label = format!(
                    "{} {}",
                    c.name,
                    c.logical_id.as_deref().unwrap_or_default()
                )
                .to_lowercase();
                STATE_NAME_HINTS.iter().any(|hint| label.contains(hint))
            })
        })
        .or_else(|| {
            infos().find(|c| {
                c.subtype
                    .as_deref()
                    .is_some_and(|s| STATE_SUBTYPES.contains(&s))
            })
        })
}

/// Cached info values that carry something: not null, `false`, `0` or `""`.
fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// In-process controller double shared by the engine tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use homeweave_api::{Equipment, Error, EventChanges, ExecOptions, JeedomRpc, RawCommand};
use homeweave_core::{ConnectionConfig, EngineCaches, JeedomProvider};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::time::Instant;
use url::Url;

/// One recorded controller call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListEquipment,
    ListCommands(String),
    Exec {
        id: String,
        options: Option<ExecOptions>,
    },
    Events(f64),
}

#[derive(Default)]
pub struct FakeRpc {
    equipment: Mutex<Vec<Equipment>>,
    commands: Mutex<HashMap<String, Vec<RawCommand>>>,
    values: Mutex<HashMap<String, Value>>,
    failing_commands: Mutex<HashSet<String>>,
    exec_delays: Mutex<HashMap<String, Duration>>,
    fail_discovery: Mutex<bool>,
    fail_equipment: Mutex<bool>,
    events: Mutex<VecDeque<Result<EventChanges, Error>>>,
    calls: Mutex<Vec<(Instant, Call)>>,
}

impl FakeRpc {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_equipment(&self, equipment: Value) {
        let equipment = serde_json::from_value(equipment).unwrap();
        self.equipment.lock().unwrap().push(equipment);
    }

    pub fn set_commands(&self, device_id: &str, commands: Value) {
        let commands = serde_json::from_value(commands).unwrap();
        self.commands
            .lock()
            .unwrap()
            .insert(device_id.to_owned(), commands);
    }

    /// Value returned when `command_id` is executed.
    pub fn set_value(&self, command_id: &str, value: Value) {
        self.values
            .lock()
            .unwrap()
            .insert(command_id.to_owned(), value);
    }

    pub fn fail_command(&self, command_id: &str) {
        self.failing_commands
            .lock()
            .unwrap()
            .insert(command_id.to_owned());
    }

    /// Hold every execution of `command_id` for `delay` before answering.
    pub fn delay_command(&self, command_id: &str, delay: Duration) {
        self.exec_delays
            .lock()
            .unwrap()
            .insert(command_id.to_owned(), delay);
    }

    pub fn set_discovery_failing(&self, failing: bool) {
        *self.fail_discovery.lock().unwrap() = failing;
    }

    pub fn set_equipment_failing(&self, failing: bool) {
        *self.fail_equipment.lock().unwrap() = failing;
    }

    pub fn push_changes(&self, datetime: f64, result: Value) {
        let changes = serde_json::from_value(json!({ "datetime": datetime, "result": result }))
            .unwrap();
        self.events.lock().unwrap().push_back(Ok(changes));
    }

    pub fn push_poll_error(&self) {
        self.events
            .lock()
            .unwrap()
            .push_back(Err(Error::Http { status: 502 }));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, Call)> {
        self.calls.lock().unwrap().clone()
    }

    /// Ids of every executed command, in call order.
    pub fn executed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Exec { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls().iter().filter(|call| *call == wanted).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }
}

#[async_trait]
impl JeedomRpc for FakeRpc {
    async fn list_equipment(&self) -> Result<Vec<Equipment>, Error> {
        self.record(Call::ListEquipment);
        if *self.fail_equipment.lock().unwrap() {
            return Err(Error::Http { status: 500 });
        }
        Ok(self.equipment.lock().unwrap().clone())
    }

    async fn list_commands(&self, equipment_id: &str) -> Result<Vec<RawCommand>, Error> {
        self.record(Call::ListCommands(equipment_id.to_owned()));
        if *self.fail_discovery.lock().unwrap() {
            return Err(Error::Rpc {
                code: -32000,
                message: "discovery unavailable".into(),
            });
        }
        Ok(self
            .commands
            .lock()
            .unwrap()
            .get(equipment_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn exec_command(
        &self,
        command_id: &str,
        options: Option<&ExecOptions>,
    ) -> Result<Value, Error> {
        self.record(Call::Exec {
            id: command_id.to_owned(),
            options: options.cloned(),
        });
        let delay = self.exec_delays.lock().unwrap().get(command_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_commands.lock().unwrap().contains(command_id) {
            return Err(Error::Http { status: 503 });
        }
        Ok(self
            .values
            .lock()
            .unwrap()
            .get(command_id)
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn event_changes(&self, since: f64, _timeout: Duration) -> Result<EventChanges, Error> {
        self.record(Call::Events(since));
        let next = self.events.lock().unwrap().pop_front();
        match next {
            Some(outcome) => outcome,
            None => std::future::pending().await,
        }
    }
}

pub fn connection() -> ConnectionConfig {
    ConnectionConfig::new(
        Url::parse("http://jeedom.test").unwrap(),
        SecretString::from("test-key".to_string()),
    )
}

pub fn provider(rpc: &Arc<FakeRpc>) -> JeedomProvider {
    JeedomProvider::new(
        &connection(),
        Arc::clone(rpc) as Arc<dyn JeedomRpc>,
        EngineCaches::default(),
    )
}

/// A light with on/off/toggle, a dimmer and a binary state readout.
pub fn light_commands() -> Value {
    json!([
        { "id": "101", "name": "On", "type": "action", "subType": "other", "generic_type": "LIGHT_ON" },
        { "id": "102", "name": "Etat", "type": "info", "subType": "binary", "generic_type": "LIGHT_STATE" },
        { "id": "103", "name": "Off", "type": "action", "subType": "other", "generic_type": "LIGHT_OFF" },
        { "id": "104", "name": "Toggle", "type": "action", "subType": "other", "generic_type": "LIGHT_TOGGLE" },
        { "id": "105", "name": "Intensité", "type": "action", "subType": "slider", "generic_type": "LIGHT_SLIDER" }
    ])
}

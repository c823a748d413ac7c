// ── Persistence seams ──
//
// The engine does not own a database. It reads device/controller records
// through `DeviceLookup` and mutates widget associations through
// `AssociationStore` transactions. `MemoryAssociationStore` implements both
// for tests and single-process use.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::error::CoreError;
use crate::model::{ControllerRef, DeviceRef, GroupRef};

// ── Traits ───────────────────────────────────────────────────────────

/// Read-only lookups into the surrounding application's records.
#[async_trait]
pub trait DeviceLookup: Send + Sync {
    /// Connection settings of a stored controller.
    async fn controller_connection(
        &self,
        controller: &ControllerRef,
    ) -> Result<ConnectionConfig, CoreError>;

    /// Controller-native id of a stored device.
    async fn native_device_id(&self, device: &DeviceRef) -> Result<String, CoreError>;

    /// Devices bound to a widget grouping.
    async fn devices_for_group(&self, group: &GroupRef) -> Result<Vec<DeviceRef>, CoreError>;
}

/// Source of serializable transactions over widget associations.
#[async_trait]
pub trait AssociationStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn AssociationTx>, CoreError>;
}

/// One open transaction. Dropping it without `commit` discards its writes.
#[async_trait]
pub trait AssociationTx: Send {
    /// Devices currently associated with `group`.
    async fn group_devices(&mut self, group: &GroupRef) -> Result<Vec<DeviceRef>, CoreError>;

    /// Remove the grouping and all of its device associations.
    async fn delete_group(&mut self, group: &GroupRef) -> Result<(), CoreError>;

    /// Associations referencing `device` across every grouping.
    async fn count_associations(&mut self, device: &DeviceRef) -> Result<usize, CoreError>;

    async fn delete_device(&mut self, device: &DeviceRef) -> Result<(), CoreError>;

    async fn commit(self: Box<Self>) -> Result<(), CoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), CoreError>;
}

// ── In-memory implementation ─────────────────────────────────────────

/// A stored device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub controller: ControllerRef,
    pub native_id: String,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    controllers: BTreeMap<ControllerRef, ConnectionConfig>,
    devices: BTreeMap<DeviceRef, DeviceRecord>,
    groups: BTreeMap<GroupRef, BTreeSet<DeviceRef>>,
}

/// Single-process association store.
///
/// A transaction holds the table lock for its whole lifetime and works on a
/// private copy, so transactions are serialized and a dropped transaction
/// leaves no trace.
#[derive(Clone, Default)]
pub struct MemoryAssociationStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryAssociationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_controller(&self, controller: ControllerRef, config: ConnectionConfig) {
        self.tables.lock().await.controllers.insert(controller, config);
    }

    /// Store a device with no associations yet.
    pub async fn add_device(&self, device: DeviceRef, record: DeviceRecord) {
        self.tables.lock().await.devices.insert(device, record);
    }

    /// Bind `device` to `group`, creating the grouping if needed.
    pub async fn associate(&self, group: GroupRef, device: DeviceRef) {
        self.tables
            .lock()
            .await
            .groups
            .entry(group)
            .or_default()
            .insert(device);
    }

    pub async fn contains_device(&self, device: &DeviceRef) -> bool {
        self.tables.lock().await.devices.contains_key(device)
    }

    pub async fn contains_group(&self, group: &GroupRef) -> bool {
        self.tables.lock().await.groups.contains_key(group)
    }

    pub async fn device_count(&self) -> usize {
        self.tables.lock().await.devices.len()
    }
}

#[async_trait]
impl DeviceLookup for MemoryAssociationStore {
    async fn controller_connection(
        &self,
        controller: &ControllerRef,
    ) -> Result<ConnectionConfig, CoreError> {
        self.tables
            .lock()
            .await
            .controllers
            .get(controller)
            .cloned()
            .ok_or_else(|| CoreError::not_found("controller", controller))
    }

    async fn native_device_id(&self, device: &DeviceRef) -> Result<String, CoreError> {
        self.tables
            .lock()
            .await
            .devices
            .get(device)
            .map(|record| record.native_id.clone())
            .ok_or_else(|| CoreError::not_found("device", device))
    }

    async fn devices_for_group(&self, group: &GroupRef) -> Result<Vec<DeviceRef>, CoreError> {
        self.tables
            .lock()
            .await
            .groups
            .get(group)
            .map(|devices| devices.iter().cloned().collect())
            .ok_or_else(|| CoreError::not_found("group", group))
    }
}

#[async_trait]
impl AssociationStore for MemoryAssociationStore {
    async fn begin(&self) -> Result<Box<dyn AssociationTx>, CoreError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let working = guard.clone();
        debug!("association transaction started");
        Ok(Box::new(MemoryTx { guard, working }))
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl AssociationTx for MemoryTx {
    async fn group_devices(&mut self, group: &GroupRef) -> Result<Vec<DeviceRef>, CoreError> {
        Ok(self
            .working
            .groups
            .get(group)
            .map(|devices| devices.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_group(&mut self, group: &GroupRef) -> Result<(), CoreError> {
        self.working
            .groups
            .remove(group)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("group", group))
    }

    async fn count_associations(&mut self, device: &DeviceRef) -> Result<usize, CoreError> {
        Ok(self
            .working
            .groups
            .values()
            .filter(|devices| devices.contains(device))
            .count())
    }

    async fn delete_device(&mut self, device: &DeviceRef) -> Result<(), CoreError> {
        self.working.devices.remove(device);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), CoreError> {
        let Self { mut guard, working } = *self;
        *guard = working;
        debug!("association transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), CoreError> {
        debug!("association transaction rolled back");
        Ok(())
    }
}

//! Shared helpers for command handlers.

use std::sync::Arc;

use homeweave_core::{
    ControllerRef, DeviceLookup, DeviceRecord, DeviceRef, MemoryAssociationStore, Provider,
};

/// Register controller-native ids as stored devices so the group fan-out
/// can address them. Each id doubles as its own device reference.
pub async fn adhoc_devices(
    provider: &dyn Provider,
    ids: &[String],
) -> (Arc<dyn DeviceLookup>, Vec<DeviceRef>) {
    let store = MemoryAssociationStore::new();
    let controller = ControllerRef::new(provider.controller_id());

    let mut refs = Vec::with_capacity(ids.len());
    for id in ids {
        let device = DeviceRef::new(id.as_str());
        store
            .add_device(
                device.clone(),
                DeviceRecord {
                    controller: controller.clone(),
                    native_id: id.clone(),
                },
            )
            .await;
        refs.push(device);
    }

    let lookup: Arc<dyn DeviceLookup> = Arc::new(store);
    (lookup, refs)
}

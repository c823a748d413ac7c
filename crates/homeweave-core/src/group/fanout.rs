// ── Multi-device fan-out ──
//
// One spawned task per device, joined in input order. A device's failure is
// captured into its own result slot; it never aborts or fails the others.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use super::store::DeviceLookup;
use crate::error::CoreError;
use crate::model::{Capability, CapabilityParams, DeviceRef, DeviceState, GroupRef};
use crate::provider::Provider;

/// One device whose operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceFailure {
    pub device: DeviceRef,
    pub error: String,
}

/// Aggregate outcome of a group execute. Both lists keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FanOutResult {
    pub succeeded: Vec<DeviceRef>,
    pub failed: Vec<DeviceFailure>,
}

impl FanOutResult {
    /// `true` when no device failed.
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Aggregate outcome of a group state read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStateResult {
    pub states: Vec<(DeviceRef, DeviceState)>,
    pub failed: Vec<DeviceFailure>,
}

/// Execute `capability` on every device in `devices`, concurrently.
pub async fn execute_on_group(
    provider: &Arc<dyn Provider>,
    lookup: &Arc<dyn DeviceLookup>,
    devices: &[DeviceRef],
    capability: Capability,
    params: &CapabilityParams,
) -> FanOutResult {
    let outcomes = fan_out(devices, |device| {
        let provider = Arc::clone(provider);
        let lookup = Arc::clone(lookup);
        let params = params.clone();
        async move {
            let native_id = lookup.native_device_id(&device).await?;
            provider
                .execute_capability(&native_id, capability, &params)
                .await
        }
    })
    .await;

    let mut result = FanOutResult::default();
    for (device, outcome) in outcomes {
        match outcome {
            Ok(_) => result.succeeded.push(device),
            Err(error) => result.failed.push(DeviceFailure { device, error }),
        }
    }
    debug!(
        %capability,
        succeeded = result.succeeded.len(),
        failed = result.failed.len(),
        "group execute finished"
    );
    result
}

/// Execute `capability` on every device bound to `group`.
pub async fn execute_on_widget(
    provider: &Arc<dyn Provider>,
    lookup: &Arc<dyn DeviceLookup>,
    group: &GroupRef,
    capability: Capability,
    params: &CapabilityParams,
) -> Result<FanOutResult, CoreError> {
    let devices = lookup.devices_for_group(group).await?;
    Ok(execute_on_group(provider, lookup, &devices, capability, params).await)
}

/// Read the canonical state of every device in `devices`, concurrently.
///
/// Only a failed id lookup counts as a failure; an unreadable device
/// yields an unknown state, as it does for a single read.
pub async fn read_group_state(
    provider: &Arc<dyn Provider>,
    lookup: &Arc<dyn DeviceLookup>,
    devices: &[DeviceRef],
) -> GroupStateResult {
    let outcomes = fan_out(devices, |device| {
        let provider = Arc::clone(provider);
        let lookup = Arc::clone(lookup);
        async move {
            let native_id = lookup.native_device_id(&device).await?;
            Ok(provider.get_device_state(&native_id).await)
        }
    })
    .await;

    let mut result = GroupStateResult::default();
    for (device, outcome) in outcomes {
        match outcome {
            Ok(state) => result.states.push((device, state)),
            Err(error) => result.failed.push(DeviceFailure { device, error }),
        }
    }
    result
}

/// Run `op` once per device and collect every outcome, in input order.
async fn fan_out<T, F, Fut>(devices: &[DeviceRef], op: F) -> Vec<(DeviceRef, Result<T, String>)>
where
    T: Send + 'static,
    F: Fn(DeviceRef) -> Fut,
    Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
{
    let tasks = devices.iter().map(|device| tokio::spawn(op(device.clone())));
    let joined = join_all(tasks).await;

    devices
        .iter()
        .cloned()
        .zip(joined)
        .map(|(device, joined)| {
            let outcome = match joined {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(format!("device task failed: {e}")),
            };
            if let Err(error) = &outcome {
                warn!(device = %device, error = %error, "device operation failed");
            }
            (device, outcome)
        })
        .collect()
}

// ── Provider abstraction ──
//
// One adapter per controller type. Adapters own no global state: the
// caches they read through are handed in by the registry, and every poll
// loop they start can be cancelled.

pub mod jeedom;
pub mod registry;

use async_trait::async_trait;

pub use jeedom::JeedomProvider;
pub use registry::ProviderRegistry;

use crate::error::CoreError;
use crate::executor::Invocation;
use crate::model::{Capability, CapabilityParams, DeviceState, NormalizedDevice, ProviderKind};
use crate::subscriber::{ChangeCallback, SubscriptionHandle};

/// A controller adapter.
///
/// Read paths fail soft (`false`, empty list, unknown state); the write
/// path always surfaces its error.
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Key partitioning this controller's cache entries.
    fn controller_id(&self) -> &str;

    /// Probe the controller. `false` on any failure.
    async fn connect(&self) -> bool;

    /// Every exposed device, normalized. Empty on failure.
    async fn list_devices(&self) -> Vec<NormalizedDevice>;

    /// Canonical state of one device. Unknown (`{}`) when it cannot be read.
    async fn get_device_state(&self, device_id: &str) -> DeviceState;

    /// Resolve and perform `capability` on one device.
    async fn execute_capability(
        &self,
        device_id: &str,
        capability: Capability,
        params: &CapabilityParams,
    ) -> Result<Invocation, CoreError>;

    /// Start a background change feed. Requires a tokio runtime.
    fn subscribe(&self, on_change: ChangeCallback) -> SubscriptionHandle;

    /// Stop every change feed started by this adapter.
    fn unsubscribe(&self);
}

//! Device normalization and command resolution engine for home-automation
//! controllers.
//!
//! This crate sits between a controller's wire client (`homeweave-api`) and
//! whatever drives devices (the `homeweave` CLI, an HTTP layer):
//!
//! - **[`Provider`]**: One adapter per controller type, created through the
//!   [`ProviderRegistry`]. Lists devices as [`NormalizedDevice`]s, reads
//!   [`DeviceState`], executes abstract [`Capability`] calls and runs the
//!   long-poll change feed.
//!
//! - **Capability resolution** ([`capability`], [`executor`]): Infers the
//!   supported [`CapabilitySet`] from a device's command directory, maps each
//!   capability to a native command, and plans a single native
//!   [`Invocation`] (toggle priority, colour to temperature fallback, slider
//!   rescaling).
//!
//! - **[`normalize()`]**: Reduces arbitrarily nested raw state payloads to
//!   `Some(true)`, `Some(false)` or `None` ("unknown", never "off").
//!
//! - **Caches** ([`store`]): [`EngineCaches`] holds the 30s command
//!   directory cache and the 1.2s state cache, keyed per
//!   `(controller, device)` and owned by the registry.
//!
//! - **Event feed** ([`subscriber`]): A cancellable background long-poll
//!   loop with a monotonic cursor and a fixed retry delay.
//!
//! - **Groups** ([`group`]): Concurrent fan-out of executes and state reads
//!   across the devices bound to a widget, and atomic orphan cleanup when a
//!   grouping is deleted.

pub mod capability;
pub mod catalogue;
pub mod config;
pub mod convert;
pub mod error;
pub mod executor;
pub mod group;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod store;
pub mod subscriber;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{CacheConfig, ConnectionConfig, DeviceFilter, PollConfig, TlsVerification};
pub use error::CoreError;
pub use executor::Invocation;
pub use group::{
    AssociationStore, AssociationTx, DeviceFailure, DeviceLookup, DeviceRecord, FanOutResult,
    GroupStateResult, MemoryAssociationStore, cleanup_orphans, execute_on_group,
    execute_on_widget, read_group_state,
};
pub use normalize::normalize;
pub use provider::{JeedomProvider, Provider, ProviderRegistry};
pub use store::EngineCaches;
pub use subscriber::{ChangeCallback, PollPhase, SubscriptionHandle};

pub use model::{
    Bounds, Capability, CapabilityParams, CapabilitySet, CommandDirection, CommandMapping,
    ControllerRef, DeviceCommandMapping, DeviceKind, DeviceRef, DeviceState, GroupRef,
    NativeCommand, NormalizedDevice, ProviderDescriptor, ProviderKind, StateSource,
};

// Wire types that appear in engine signatures.
pub use homeweave_api::{ChangeEvent, JeedomRpc};

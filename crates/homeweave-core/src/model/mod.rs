// ── Domain model ──
//
// Canonical, controller-agnostic types. Adapters translate their wire
// payloads into these; everything downstream (extractor, mapper, executor,
// fan-out) only ever sees this vocabulary.

pub mod capability;
pub mod command;
pub mod device;
pub mod ids;
pub mod provider;
pub mod state;

pub use capability::{Capability, CapabilityParams, CapabilitySet};
pub use command::{Bounds, CommandDirection, NativeCommand};
pub use device::{CommandMapping, DeviceCommandMapping, DeviceKind, NormalizedDevice};
pub use ids::{ControllerRef, DeviceRef, GroupRef};
pub use provider::{ProviderDescriptor, ProviderKind};
pub use state::{DeviceState, StateSource};

// ── Multi-device groups ──
//
// A dashboard widget can drive several physical devices as one unit. This
// module fans capability calls and state reads out across a group, and
// removes devices left without any widget when a grouping is deleted.

pub mod cleanup;
pub mod fanout;
pub mod store;

pub use cleanup::cleanup_orphans;
pub use fanout::{
    DeviceFailure, FanOutResult, GroupStateResult, execute_on_group, execute_on_widget,
    read_group_state,
};
pub use store::{
    AssociationStore, AssociationTx, DeviceLookup, DeviceRecord, MemoryAssociationStore,
};

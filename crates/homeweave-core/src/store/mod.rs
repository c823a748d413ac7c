// ── Engine caches ──
//
// Process-wide, explicitly owned caches shared by every adapter a registry
// creates. Entries are keyed by `(controller, device)` so different devices
// never contend. Both caches are pure optimizations: dropping them is always
// safe, merely slower.

pub mod directory;
pub mod state_cache;
pub mod ttl_cache;

use std::sync::Arc;

pub use directory::CommandDirectory;
pub use state_cache::StateCache;
pub use ttl_cache::{CacheKey, TtlCache};

use crate::config::CacheConfig;

/// Handle to the shared caches. Cheap to clone.
#[derive(Clone)]
pub struct EngineCaches {
    pub directory: Arc<CommandDirectory>,
    pub state: Arc<StateCache>,
}

impl EngineCaches {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            directory: Arc::new(CommandDirectory::new(config.directory_ttl)),
            state: Arc::new(StateCache::new(config.state_ttl)),
        }
    }

    /// Drop every entry in both caches.
    pub fn clear(&self) {
        self.directory.clear();
        self.state.clear();
    }
}

impl Default for EngineCaches {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

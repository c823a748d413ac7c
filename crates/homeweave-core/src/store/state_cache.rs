// ── State cache ──
//
// Very short-lived canonical state per device. Any successful execute
// against a device removes its entry before returning, so a read that
// follows a write never sees the pre-write state.

use std::time::Duration;

use super::ttl_cache::{CacheKey, TtlCache};
use crate::model::DeviceState;

pub struct StateCache {
    cache: TtlCache<DeviceState>,
}

impl StateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: TtlCache::new(ttl),
        }
    }

    pub fn get(&self, controller_id: &str, device_id: &str) -> Option<DeviceState> {
        self.cache.get(&CacheKey::new(controller_id, device_id))
    }

    pub fn put(&self, controller_id: &str, device_id: &str, state: DeviceState) {
        self.cache
            .insert(CacheKey::new(controller_id, device_id), state);
    }

    pub fn invalidate(&self, controller_id: &str, device_id: &str) {
        self.cache.invalidate(&CacheKey::new(controller_id, device_id));
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

// ── Command directory cache ──
//
// Per-device command lists, refreshed from the controller after 30s.
// Discovery failures degrade to an empty list and are not cached, so the
// next caller retries.

use std::sync::Arc;
use std::time::Duration;

use homeweave_api::JeedomRpc;
use tracing::{debug, warn};

use super::ttl_cache::{CacheKey, TtlCache};
use crate::model::NativeCommand;

pub struct CommandDirectory {
    cache: TtlCache<Arc<Vec<NativeCommand>>>,
}

impl CommandDirectory {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: TtlCache::new(ttl),
        }
    }

    /// Commands of `device_id`, from cache or from the controller.
    ///
    /// An empty list means "capabilities unknown", not an error.
    pub async fn get(
        &self,
        controller_id: &str,
        device_id: &str,
        rpc: &dyn JeedomRpc,
    ) -> Arc<Vec<NativeCommand>> {
        let key = CacheKey::new(controller_id, device_id);
        if let Some(commands) = self.cache.get(&key) {
            return commands;
        }

        match rpc.list_commands(device_id).await {
            Ok(raw) => {
                let commands: Arc<Vec<NativeCommand>> =
                    Arc::new(raw.iter().map(NativeCommand::from).collect());
                debug!(
                    controller_id,
                    device_id,
                    count = commands.len(),
                    "command directory refreshed"
                );
                self.cache.insert(key, Arc::clone(&commands));
                commands
            }
            Err(e) => {
                warn!(controller_id, device_id, error = %e, "command discovery failed");
                Arc::new(Vec::new())
            }
        }
    }

    pub fn invalidate(&self, controller_id: &str, device_id: &str) {
        self.cache.invalidate(&CacheKey::new(controller_id, device_id));
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

// ── Orphan cleanup ──

use tracing::{debug, info, warn};

use super::store::{AssociationStore, AssociationTx};
use crate::error::CoreError;
use crate::model::GroupRef;

/// Delete `group` and every device it leaves without any association.
///
/// Runs in one transaction: either the grouping and all of its orphans are
/// gone, or nothing changed. Returns the number of devices deleted.
pub async fn cleanup_orphans(
    store: &dyn AssociationStore,
    group: &GroupRef,
) -> Result<usize, CoreError> {
    let mut tx = store.begin().await?;

    match remove_group(tx.as_mut(), group).await {
        Ok(deleted) => {
            tx.commit().await?;
            info!(%group, deleted, "grouping removed");
            Ok(deleted)
        }
        Err(e) => {
            warn!(%group, error = %e, "orphan cleanup failed, rolling back");
            if let Err(rollback) = tx.rollback().await {
                warn!(%group, error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}

async fn remove_group(tx: &mut dyn AssociationTx, group: &GroupRef) -> Result<usize, CoreError> {
    let devices = tx.group_devices(group).await?;
    tx.delete_group(group).await?;

    let mut deleted = 0;
    for device in &devices {
        let remaining = tx.count_associations(device).await?;
        if remaining == 0 {
            tx.delete_device(device).await?;
            deleted += 1;
        } else {
            debug!(%device, remaining, "device still referenced");
        }
    }
    Ok(deleted)
}

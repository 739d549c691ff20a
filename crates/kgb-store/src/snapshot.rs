use kgb_core::{PendingNotification, decode_snapshot, encode_snapshot};
use tracing::info;

use crate::{KvStore, StoreError};

/// Key holding the JSON-encoded list of employees due at the last evaluation.
pub const PENDING_KEY: &str = "waktunyaKGB";

/// Replace the pending snapshot with `entries` in a single write.
pub async fn save_pending(
    store: &dyn KvStore,
    entries: &[PendingNotification],
) -> Result<(), StoreError> {
    let json = encode_snapshot(entries)?;
    store.set(PENDING_KEY, &json).await?;
    info!(count = entries.len(), "pending notification snapshot saved");
    Ok(())
}

/// Read the pending snapshot back; `None` when nothing was ever saved.
pub async fn load_pending(
    store: &dyn KvStore,
) -> Result<Option<Vec<PendingNotification>>, StoreError> {
    match store.get(PENDING_KEY).await? {
        Some(json) => Ok(Some(decode_snapshot(&json)?)),
        None => Ok(None),
    }
}

/// Drop the pending snapshot. Clearing an absent snapshot is not an error.
pub async fn clear_pending(store: &dyn KvStore) -> Result<(), StoreError> {
    store.remove(PENDING_KEY).await?;
    info!("pending notification snapshot cleared");
    Ok(())
}

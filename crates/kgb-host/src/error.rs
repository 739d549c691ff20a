use std::time::Duration;

use kgb_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("roster fetch failed: {0:#}")]
    Fetch(anyhow::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("notification failed: {0:#}")]
    Notify(anyhow::Error),

    #[error("notification permission not granted")]
    PermissionDenied,

    #[error("schedule interval must be non-zero")]
    ZeroInterval,

    #[error("evaluation exceeded {0:?}")]
    Timeout(Duration),
}

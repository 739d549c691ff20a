//! Key-value persistence: a file-backed store for the host, an in-memory one
//! for tests, and the pending-notification snapshot helpers built on both.

mod error;
mod file;
mod memory;
mod snapshot;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use snapshot::{PENDING_KEY, clear_pending, load_pending, save_pending};

use async_trait::async_trait;

/// A string key-value store. Each `set` replaces the whole value.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

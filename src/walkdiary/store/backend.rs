use crate::error::Result;
use async_trait::async_trait;

/// Raw key-value storage for the durable state record.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// `PersistenceStore` handles the "what" (defaulting, recovery, logging).
///
/// Reads happen once, when a session loads its state, and stay synchronous.
/// Writes and removals happen while the session runs and are async.
#[async_trait(?Send)]
pub trait StorageBackend {
    /// Read the value stored under `key`.
    /// Returns Ok(None) if nothing has been stored yet.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    /// MUST be atomic (e.g. write to tmp then rename) so no partial value is
    /// ever observable.
    async fn write(&self, key: &str, value: String) -> Result<()>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

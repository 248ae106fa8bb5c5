//! Key-value persistence seam.
//!
//! All durable state goes through [`KeyValueStore`]: an asynchronous,
//! string-keyed, string-valued store with one logical writer at a time per key.
//! Implementations use `&self` and interior mutability so services can share a
//! single backend behind an `Arc`.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod fs;
pub mod memory;

pub use fs::DirStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
///
/// Read failures are recovered at the codec boundary; write failures propagate
/// to the mutating caller.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed")]
    Io(#[from] std::io::Error),

    #[error("failed to encode value for storage")]
    Encode(#[source] serde_json::Error),
}

#[automock]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key. Irreversible.
    async fn clear(&self) -> Result<(), StorageError>;
}

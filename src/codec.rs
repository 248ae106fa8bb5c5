//! Entity codec: collections ⇄ backend string values.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::storage::{KeyValueStore, StorageError};

/// Encodes and decodes one collection per backend key.
///
/// Loads never fail: an absent key, an unreadable backend or an undecodable
/// value all come back as the empty collection, because a usable app with an
/// empty list beats a crash over a corrupt on-device cache. Saves propagate
/// backend failures to the mutating caller.
#[derive(Clone)]
pub(crate) struct Codec {
    store: Arc<dyn KeyValueStore>,
}

impl Codec {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub(crate) async fn load<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!(key, %err, "discarding undecodable collection");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(err) => {
                warn!(key, %err, "storage read failed, treating collection as empty");
                T::default()
            }
        }
    }

    pub(crate) async fn save<T>(&self, key: &str, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value).map_err(StorageError::Encode)?;

        self.store.set(key, &raw).await
    }

    pub(crate) async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove(key).await
    }
}

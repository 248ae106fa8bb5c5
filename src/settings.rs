//! Scalar user settings.
//!
//! Settings live outside the collection codec as opaque strings, one backend
//! key each. Reads recover to the documented default on a missing, unreadable
//! or unparseable value; writes propagate backend failures like any other
//! mutation.

use std::sync::Arc;

use tracing::warn;

use crate::storage::{KeyValueStore, StorageError};

mod keys {
    pub const DARK_MODE: &str = "darkMode";
    pub const LANGUAGE: &str = "language";
    pub const FONT_SIZE: &str = "fontSize";
    pub const DEFAULT_PAYMENT: &str = "defaultPayment";
    pub const AUTO_REORDER: &str = "autoReorder";
    pub const REORDER_INTERVAL: &str = "reorderInterval";
    pub const OFFLINE_MODE: &str = "offlineMode";
    pub const BIOMETRIC_AUTH: &str = "biometricAuth";
    // Distinct from the notification log's "notifications" collection key.
    pub const NOTIFICATIONS_ENABLED: &str = "notificationsEnabled";
}

/// Typed accessors over the settings keys.
pub struct Settings {
    store: Arc<dyn KeyValueStore>,
}

impl Settings {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn dark_mode(&self) -> bool {
        self.bool_value(keys::DARK_MODE, false).await
    }

    pub async fn set_dark_mode(&self, on: bool) -> Result<(), StorageError> {
        self.store.set(keys::DARK_MODE, &on.to_string()).await
    }

    pub async fn language(&self) -> String {
        self.string_value(keys::LANGUAGE, "en").await
    }

    pub async fn set_language(&self, language: &str) -> Result<(), StorageError> {
        self.store.set(keys::LANGUAGE, language).await
    }

    pub async fn font_size(&self) -> f32 {
        self.parsed_value(keys::FONT_SIZE, 16.0).await
    }

    pub async fn set_font_size(&self, size: f32) -> Result<(), StorageError> {
        self.store.set(keys::FONT_SIZE, &size.to_string()).await
    }

    pub async fn default_payment(&self) -> String {
        self.string_value(keys::DEFAULT_PAYMENT, "Card").await
    }

    pub async fn set_default_payment(&self, method: &str) -> Result<(), StorageError> {
        self.store.set(keys::DEFAULT_PAYMENT, method).await
    }

    pub async fn auto_reorder(&self) -> bool {
        self.bool_value(keys::AUTO_REORDER, false).await
    }

    pub async fn set_auto_reorder(&self, on: bool) -> Result<(), StorageError> {
        self.store.set(keys::AUTO_REORDER, &on.to_string()).await
    }

    pub async fn reorder_interval(&self) -> String {
        self.string_value(keys::REORDER_INTERVAL, "Weekly").await
    }

    pub async fn set_reorder_interval(&self, interval: &str) -> Result<(), StorageError> {
        self.store.set(keys::REORDER_INTERVAL, interval).await
    }

    pub async fn offline_mode(&self) -> bool {
        self.bool_value(keys::OFFLINE_MODE, false).await
    }

    pub async fn set_offline_mode(&self, on: bool) -> Result<(), StorageError> {
        self.store.set(keys::OFFLINE_MODE, &on.to_string()).await
    }

    pub async fn biometric_auth(&self) -> bool {
        self.bool_value(keys::BIOMETRIC_AUTH, false).await
    }

    pub async fn set_biometric_auth(&self, on: bool) -> Result<(), StorageError> {
        self.store.set(keys::BIOMETRIC_AUTH, &on.to_string()).await
    }

    pub async fn notifications_enabled(&self) -> bool {
        self.bool_value(keys::NOTIFICATIONS_ENABLED, true).await
    }

    pub async fn set_notifications_enabled(&self, on: bool) -> Result<(), StorageError> {
        self.store
            .set(keys::NOTIFICATIONS_ENABLED, &on.to_string())
            .await
    }

    async fn string_value(&self, key: &str, default: &str) -> String {
        match self.store.get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(err) => {
                warn!(key, %err, "settings read failed, using default");
                default.to_string()
            }
        }
    }

    async fn bool_value(&self, key: &str, default: bool) -> bool {
        self.parsed_value(key, default).await
    }

    async fn parsed_value<T>(&self, key: &str, default: T) -> T
    where
        T: std::str::FromStr + Copy,
    {
        match self.store.get(key).await {
            Ok(Some(value)) => value.parse().unwrap_or(default),
            Ok(None) => default,
            Err(err) => {
                warn!(key, %err, "settings read failed, using default");
                default
            }
        }
    }
}

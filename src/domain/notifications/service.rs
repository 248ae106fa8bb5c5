//! Notification Log.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, watch};

use crate::{
    codec::Codec,
    domain::{
        next_id,
        notifications::models::{Notification, display_now},
    },
    reload::Refresh,
    storage::{KeyValueStore, StorageError},
};

const NOTIFICATIONS_KEY: &str = "notifications";

/// Owns the newest-first log of user-facing events.
///
/// Entries are never deleted individually; the only mutations are appending
/// and flipping `read` to true. Every call persists the full log.
pub struct NotificationLog {
    codec: Codec,
    mirror: RwLock<Vec<Notification>>,
    changed: watch::Sender<u64>,
}

impl NotificationLog {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (changed, _) = watch::channel(0);

        Self {
            codec: Codec::new(store),
            mirror: RwLock::new(Vec::new()),
            changed,
        }
    }

    /// Refresh the mirror from the backend and return the log, newest first.
    pub async fn reload(&self) -> Vec<Notification> {
        let log: Vec<Notification> = self.codec.load(NOTIFICATIONS_KEY).await;

        *self.mirror.write().await = log.clone();

        log
    }

    /// The possibly-stale mirror.
    pub async fn cached(&self) -> Vec<Notification> {
        self.mirror.read().await.clone()
    }

    /// A channel bumped after every persisted mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    /// Prepend a fresh unread notification and return it.
    pub async fn append(
        &self,
        message: impl Into<String> + Send,
    ) -> Result<Notification, StorageError> {
        let mut log: Vec<Notification> = self.codec.load(NOTIFICATIONS_KEY).await;

        let notification = Notification {
            id: next_id(log.iter().map(|n| n.id).max()),
            message: message.into(),
            timestamp: display_now(),
            read: false,
        };

        log.insert(0, notification.clone());
        self.persist(log).await?;

        Ok(notification)
    }

    /// Mark one notification read. An absent or already-read id is a no-op,
    /// not an error; the log is rewritten either way.
    pub async fn mark_read(&self, id: i64) -> Result<(), StorageError> {
        let mut log: Vec<Notification> = self.codec.load(NOTIFICATIONS_KEY).await;

        if let Some(notification) = log.iter_mut().find(|n| n.id == id) {
            notification.read = true;
        }

        self.persist(log).await
    }

    /// Mark every notification read.
    pub async fn mark_all_read(&self) -> Result<(), StorageError> {
        let mut log: Vec<Notification> = self.codec.load(NOTIFICATIONS_KEY).await;

        for notification in &mut log {
            notification.read = true;
        }

        self.persist(log).await
    }

    /// Wake subscribers after a mutation that bypassed [`persist`](Self::persist),
    /// e.g. a whole-backend wipe.
    pub(crate) fn notify_changed(&self) {
        self.changed.send_modify(|revision| *revision += 1);
    }

    async fn persist(&self, log: Vec<Notification>) -> Result<(), StorageError> {
        self.codec.save(NOTIFICATIONS_KEY, &log).await?;

        *self.mirror.write().await = log;
        self.changed.send_modify(|revision| *revision += 1);

        Ok(())
    }
}

#[async_trait]
impl Refresh for NotificationLog {
    async fn refresh(&self) {
        self.reload().await;
    }
}

//! Reload protocol.
//!
//! Several independent view instances can read the same backend collection
//! (the cart screen and the checkout screen both read the cart), and each one
//! keeps its own in-memory mirror. A mirror is possibly stale the instant
//! control leaves its view, so view activation is a first-class event here
//! rather than an incidental UI lifecycle hook: a view registers every store
//! it reads in a [`ViewBinding`] and calls [`ViewBinding::activate`] when it
//! becomes the active view. Skipping that refresh is the classic way to show
//! a stale cart.
//!
//! For reacting to writes that happen while a view stays active, each store
//! also exposes a `subscribe()` revision channel.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

/// A store whose in-memory mirror can be refreshed from the backend.
#[automock]
#[async_trait]
pub trait Refresh: Send + Sync {
    /// Re-read the backing collection and replace the mirror.
    async fn refresh(&self);
}

/// The set of stores one view reads, refreshed together on activation.
#[derive(Default)]
pub struct ViewBinding {
    stores: Vec<Arc<dyn Refresh>>,
}

impl ViewBinding {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store this view displays.
    #[must_use]
    pub fn watch(mut self, store: Arc<dyn Refresh>) -> Self {
        self.stores.push(store);
        self
    }

    /// The view-activation event: refresh every registered store.
    pub async fn activate(&self) {
        for store in &self.stores {
            store.refresh().await;
        }
    }
}

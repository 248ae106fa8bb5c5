//! Tiffin
//!
//! Tiffin is the state store of a single-user mobile food-ordering app: a draft
//! cart, an append-only ledger of committed orders, a user-facing notification
//! log and scalar settings, all persisted through an asynchronous string-keyed
//! key-value backend.
//!
//! Screens come and go; the backend is the single source of truth. Every
//! mutation is a full read-modify-write against the backend, and any view that
//! reads shared state refreshes it on activation (see [`reload`]) so that a
//! freshly mounted screen never shows state older than the last completed
//! write.

pub mod catalog;
pub mod context;
pub mod domain;
pub mod reload;
pub mod settings;
pub mod storage;

mod codec;

#[cfg(test)]
mod test;

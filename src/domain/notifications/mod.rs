//! Notifications

pub mod models;
pub mod service;

pub use models::Notification;
pub use service::NotificationLog;

//! Notification Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One user-facing event.
///
/// Notifications embed a human-readable description of what happened and hold
/// no structural reference to orders or cart lines; they are a side-effect log,
/// not a foreign-keyed table. `read` only ever goes false→true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    /// Creation time, preformatted for display.
    pub timestamp: String,
    pub read: bool,
}

pub(crate) fn display_now() -> String {
    Timestamp::now().strftime("%Y-%m-%d %H:%M:%S").to_string()
}

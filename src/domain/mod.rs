//! Domain concerns: the cart, the order ledger and the notification log.

pub mod cart;
pub mod notifications;
pub mod orders;

use jiff::Timestamp;

/// Next creation-timestamp-derived id.
///
/// Ids are the current time in milliseconds, bumped past the largest existing
/// id so that two records created within the same millisecond stay distinct and
/// ids grow strictly within a collection.
pub(crate) fn next_id(largest_existing: Option<i64>) -> i64 {
    let now = Timestamp::now().as_millisecond();

    match largest_existing {
        Some(largest) if now <= largest => largest + 1,
        _ => now,
    }
}

//! Wall-clock helpers.
//!
//! All persisted timestamps in the data core are milliseconds since the Unix
//! epoch, stored as `i64`. The stores never compare clocks across machines,
//! so plain wall time is sufficient.

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall time as milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before Unix epoch")
        .as_millis() as i64
}

//! Directory domain model.
//!
//! # Responsibility
//! - Define the Person/Company/Edge records shared by every core component.
//! - Keep boundary validation next to the records it protects.
//!
//! # Invariants
//! - Person identity is its opaque `id`; Company identity is its normalized
//!   name (see `crate::resolve`).
//! - At most one `RelationshipEdge` exists per unordered person pair.

pub mod company;
pub mod edge;
pub mod person;

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns current wall-clock time in epoch milliseconds.
///
/// Falls back to `0` if the clock is before the unix epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// Returns the trimmed value when it carries content.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

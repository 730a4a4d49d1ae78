//! Local cache <-> remote store reconciliation.
//!
//! # Responsibility
//! - Define the remote store seam.
//! - Push local writes to the remote and pull remote snapshots into the cache.
//!
//! # Invariants
//! - The local cache is authoritative; a remote failure never rolls back a
//!   committed local write.
//! - People are matched by id, companies by normalized name.
//! - Per-record failures never abort a batch.

pub mod reconciler;
pub mod remote;

pub use reconciler::{PullReport, PushReport, SyncCounts, SyncError, SyncOutcome, SyncReconciler, SyncResult};
pub use remote::{InMemoryRemoteStore, RemoteError, RemoteResult, RemoteStore};

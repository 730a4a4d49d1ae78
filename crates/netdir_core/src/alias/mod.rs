//! Identity masking.
//!
//! # Responsibility
//! - Map real names to stable display pseudonyms without a persisted table.
//! - Gate real-name exposure on the viewer's privilege in one code path.
//!
//! # Invariants
//! - `AliasEngine::alias` depends only on its input and the override table.
//! - Distinct names may share an alias; collisions are reported by
//!   [`AliasIndex`], never corrected.
//! - Contact fields never reach the alias path.

pub mod engine;
pub mod gate;
pub mod index;

pub use engine::{alias_pool, name_hash, AliasEngine};
pub use gate::{should_alias, NameGate, PersonView, Viewer};
pub use index::AliasIndex;

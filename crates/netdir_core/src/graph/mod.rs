//! Relationship graph derived from Person attributes.
//!
//! # Responsibility
//! - Infer at most one typed, weighted edge per person pair.
//! - Project second-degree recommendations over an inferred edge set.
//!
//! # Invariants
//! - `infer_all` is total and idempotent for the same input.
//! - Recommendation is a read-time projection; nothing is persisted here.

pub mod inference;
pub mod recommend;

pub use inference::{infer_all, infer_edge, infer_for_person, title_level, MatchRule};
pub use recommend::{recommend, Recommendation};

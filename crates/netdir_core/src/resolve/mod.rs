//! Company entity resolution.
//!
//! # Responsibility
//! - Define the Company identity rule (normalized name).
//! - Group near-duplicate Company records and merge them into one canonical
//!   record with field-level coalesce/union rules.
//!
//! # Invariants
//! - `normalize_company_name` is idempotent.
//! - After `resolve_all`, no two kept records share a normalized name.
//! - Merges are destructive: absorbed ids are reported for deletion only.

pub mod merge;
pub mod normalize;

pub use merge::{
    absorb, group_by_normalized_name, merge_group, resolve_all, CompanyGroup, MergeRecord,
    MergedCompany, ResolveOutcome,
};
pub use normalize::normalize_company_name;

//! Company grouping and merge rules.
//!
//! Scalar fields follow first-non-empty-wins over creation order; list fields
//! take an order-preserving union without exact duplicates. Both rules are
//! deterministic but can hide a later, better value behind an earlier one.

use crate::model::company::{Company, CompanyId};
use crate::resolve::normalize::normalize_company_name;
use std::collections::HashMap;

/// Companies sharing one normalized name, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyGroup {
    pub normalized_name: String,
    pub members: Vec<Company>,
}

/// Result of merging one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCompany {
    /// Earliest-created member with absorbed fields.
    pub canonical: Company,
    /// Ids of members folded into `canonical`, in creation order.
    pub absorbed_ids: Vec<CompanyId>,
}

/// One collapsed group: which ids were absorbed into which survivor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRecord {
    pub canonical_id: CompanyId,
    pub absorbed_ids: Vec<CompanyId>,
}

/// Whole-store resolution plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    /// One record per normalized name, in first-appearance order.
    pub keep: Vec<Company>,
    /// Ids to remove from the store.
    pub delete: Vec<CompanyId>,
    /// Merge trail for groups with more than one member.
    pub merges: Vec<MergeRecord>,
}

/// Groups companies by normalized name, preserving first-appearance order.
///
/// Records whose name normalizes to empty are never grouped with anything.
pub fn group_by_normalized_name(companies: &[Company]) -> Vec<CompanyGroup> {
    let mut groups: Vec<CompanyGroup> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for company in companies {
        let normalized_name = normalize_company_name(&company.name);
        if normalized_name.is_empty() {
            groups.push(CompanyGroup {
                normalized_name,
                members: vec![company.clone()],
            });
            continue;
        }

        match index_by_name.get(&normalized_name) {
            Some(&index) => groups[index].members.push(company.clone()),
            None => {
                index_by_name.insert(normalized_name.clone(), groups.len());
                groups.push(CompanyGroup {
                    normalized_name,
                    members: vec![company.clone()],
                });
            }
        }
    }

    groups
}

/// Merges one group into its canonical record.
///
/// The earliest `created_at` wins as primary; ties keep input order.
/// Returns `None` for an empty group.
pub fn merge_group(members: &[Company]) -> Option<MergedCompany> {
    let mut ordered: Vec<&Company> = members.iter().collect();
    ordered.sort_by_key(|company| company.created_at);

    let (primary, rest) = ordered.split_first()?;
    let mut canonical = (*primary).clone();
    let mut absorbed_ids = Vec::with_capacity(rest.len());
    for duplicate in rest {
        absorb(&mut canonical, duplicate);
        absorbed_ids.push(duplicate.id.clone());
    }

    Some(MergedCompany {
        canonical,
        absorbed_ids,
    })
}

/// Folds `incoming` into `target` in place.
///
/// - scalar fields: `target` keeps its value when non-empty
/// - list fields: union, `target` entries first, exact duplicates dropped
/// - `updated_at`: the later of both
///
/// `id`, `name` and `created_at` of `target` never change.
pub fn absorb(target: &mut Company, incoming: &Company) {
    coalesce(&mut target.industry, &incoming.industry);
    coalesce(&mut target.scale, &incoming.scale);
    coalesce(&mut target.description, &incoming.description);
    coalesce(&mut target.headquarters, &incoming.headquarters);
    coalesce(&mut target.website, &incoming.website);

    union_into(&mut target.products, &incoming.products);
    union_into(&mut target.suppliers, &incoming.suppliers);
    union_into(&mut target.customers, &incoming.customers);

    target.updated_at = target.updated_at.max(incoming.updated_at);
}

/// Collapses every normalized-name collision in `companies`.
///
/// Must not run while another Company write is in flight; see crate docs.
pub fn resolve_all(companies: &[Company]) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();

    for group in group_by_normalized_name(companies) {
        let Some(merged) = merge_group(&group.members) else {
            continue;
        };
        if !merged.absorbed_ids.is_empty() {
            outcome.delete.extend(merged.absorbed_ids.iter().cloned());
            outcome.merges.push(MergeRecord {
                canonical_id: merged.canonical.id.clone(),
                absorbed_ids: merged.absorbed_ids,
            });
        }
        outcome.keep.push(merged.canonical);
    }

    outcome
}

fn coalesce(target: &mut Option<String>, incoming: &Option<String>) {
    let target_blank = target.as_deref().map_or(true, |value| value.trim().is_empty());
    if !target_blank {
        return;
    }
    if let Some(value) = incoming.as_deref().filter(|value| !value.trim().is_empty()) {
        *target = Some(value.to_string());
    }
}

fn union_into<T: Clone + PartialEq>(target: &mut Vec<T>, incoming: &[T]) {
    for item in incoming {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

//! Company use-case service.
//!
//! # Responsibility
//! - Resolve every incoming Company through find-or-create by normalized name.
//! - Run the explicitly triggered dedup sweep over the whole store.
//!
//! # Invariants
//! - An existing match is updated in place and keeps its id.
//! - `run_dedup` must not overlap another Company write.

use crate::model::company::Company;
use crate::repo::company_repo::CompanyRepository;
use crate::repo::RepoError;
use crate::resolve::{absorb, resolve_all, MergeRecord};
use crate::service::ServiceResult;
use log::info;

/// Outcome of one find-or-create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOrCreate {
    /// Stored record after the call.
    pub company: Company,
    /// `true` when no normalized match existed and a row was inserted.
    pub created: bool,
}

/// Counts reported to the admin tool after a dedup sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupReport {
    pub original: usize,
    pub deduplicated: usize,
    pub removed: usize,
    /// Which ids were absorbed into which survivor. Not persisted.
    pub merges: Vec<MergeRecord>,
}

/// Company service facade over repository implementations.
pub struct CompanyService<R: CompanyRepository> {
    repo: R,
}

impl<R: CompanyRepository> CompanyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Finds the company sharing `candidate`'s normalized name or inserts it.
    ///
    /// On a hit, `candidate` is folded into the stored record with the
    /// merge rules (stored non-empty values win, lists are unioned) and the
    /// row is rewritten only when something changed.
    pub fn find_or_create(&self, candidate: &Company) -> ServiceResult<FindOrCreate> {
        candidate.validate().map_err(RepoError::from)?;
        let normalized = candidate.normalized_name();

        match self.repo.find_by_normalized_name(&normalized)? {
            Some(existing) => {
                let mut merged = existing.clone();
                absorb(&mut merged, candidate);
                if merged != existing {
                    self.repo.update_company(&merged)?;
                }
                Ok(FindOrCreate {
                    company: merged,
                    created: false,
                })
            }
            None => {
                self.repo.insert_company(candidate)?;
                info!("event=company_create module=service status=ok id={}", candidate.id);
                Ok(FindOrCreate {
                    company: candidate.clone(),
                    created: true,
                })
            }
        }
    }

    /// Find-or-create for an employer name listed on a Person.
    ///
    /// `industry` seeds a new record and fills an empty one.
    pub fn ensure_employer(&self, name: &str, industry: Option<&str>) -> ServiceResult<FindOrCreate> {
        let mut candidate = Company::new(name.trim());
        candidate.industry = industry.map(str::to_string);
        self.find_or_create(&candidate)
    }

    pub fn get_company(&self, id: &str) -> ServiceResult<Option<Company>> {
        Ok(self.repo.get_company(id)?)
    }

    pub fn list_companies(&self) -> ServiceResult<Vec<Company>> {
        Ok(self.repo.list_companies()?)
    }

    /// Collapses every normalized-name collision in the store.
    ///
    /// Destructive: absorbed ids are deleted and cannot be recovered.
    pub fn run_dedup(&self) -> ServiceResult<DedupReport> {
        let companies = self.repo.list_companies()?;
        let original = companies.len();
        let outcome = resolve_all(&companies);

        let survivors: Vec<Company> = outcome
            .keep
            .iter()
            .filter(|company| {
                outcome
                    .merges
                    .iter()
                    .any(|merge| merge.canonical_id == company.id)
            })
            .cloned()
            .collect();
        let removed = self.repo.apply_resolution(&survivors, &outcome.delete)?;

        for merge in &outcome.merges {
            info!(
                "event=company_merge module=service status=ok canonical_id={} absorbed_ids={}",
                merge.canonical_id,
                merge.absorbed_ids.join(",")
            );
        }
        info!(
            "event=company_dedup module=service status=ok original={} deduplicated={} removed={}",
            original,
            outcome.keep.len(),
            removed
        );

        Ok(DedupReport {
            original,
            deduplicated: outcome.keep.len(),
            removed,
            merges: outcome.merges,
        })
    }
}

//! Push/pull reconciliation between the local cache and a remote store.
//!
//! # Responsibility
//! - Write each record locally first, then mirror it remotely.
//! - Report per-record outcomes instead of swallowing remote failures.
//! - Replace the local directory with a remote snapshot on pull.
//!
//! # Invariants
//! - A remote failure after a local success yields a degraded outcome, never
//!   a rollback of the local write.
//! - `pull_all` is all-or-nothing on the local side.
//! - Company writes are keyed by normalized name on both sides; a match
//!   keeps the id of the row already stored on that side.

use crate::db::LocalCache;
use crate::model::company::{Company, CompanyId};
use crate::model::person::{Person, PersonId};
use crate::repo::company_repo::{CompanyRepository, SqliteCompanyRepository};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::repo::RepoError;
use crate::service::company_service::CompanyService;
use crate::service::ServiceError;
use crate::sync::remote::{RemoteError, RemoteStore};
use log::{info, warn};
use rusqlite::{Transaction, TransactionBehavior};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SyncResult<T> = Result<T, SyncError>;

/// Sync failure that left the local cache untouched.
#[derive(Debug)]
pub enum SyncError {
    Remote(RemoteError),
    Repo(RepoError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(err) => write!(f, "remote store failed: {err}"),
            Self::Repo(err) => write!(f, "local cache failed: {err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Remote(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RemoteError> for SyncError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

impl From<RepoError> for SyncError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for SyncError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Result of one record write across both stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub local_ok: bool,
    pub remote_ok: bool,
    /// Id the record carries in the remote store, when the remote write ran.
    pub remote_id: Option<String>,
    /// First failure message, local or remote.
    pub error: Option<String>,
}

impl SyncOutcome {
    /// Both writes landed.
    pub fn is_synced(&self) -> bool {
        self.local_ok && self.remote_ok
    }

    /// Local write landed, remote did not.
    pub fn is_degraded(&self) -> bool {
        self.local_ok && !self.remote_ok
    }

    fn local_failed(error: impl Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

/// Per-entity record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounts {
    pub people: usize,
    pub companies: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushReport {
    pub uploaded: SyncCounts,
    pub failed: SyncCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullReport {
    pub downloaded: SyncCounts,
    /// Remote records dropped because they failed validation or repeated an id.
    pub skipped: SyncCounts,
}

/// Reconciles one local cache against one remote store.
pub struct SyncReconciler<'a, S: RemoteStore + ?Sized> {
    cache: &'a LocalCache,
    remote: &'a S,
}

impl<'a, S: RemoteStore + ?Sized> SyncReconciler<'a, S> {
    pub fn new(cache: &'a LocalCache, remote: &'a S) -> Self {
        Self { cache, remote }
    }

    /// Writes `person` locally, then overwrites the remote row with the same id.
    pub fn upsert_person(&self, person: &Person) -> SyncOutcome {
        let local = SqlitePersonRepository::try_new(self.cache.connection())
            .and_then(|repo| repo.upsert_person(person));
        if let Err(err) = local {
            warn!(
                "event=sync_person module=sync status=error side=local id={} error={}",
                person.id, err
            );
            return SyncOutcome::local_failed(err);
        }

        match self.remote.upsert_person(person) {
            Ok(()) => SyncOutcome {
                local_ok: true,
                remote_ok: true,
                remote_id: Some(person.id.clone()),
                error: None,
            },
            Err(err) => {
                warn!(
                    "event=sync_person module=sync status=degraded id={} code={} retryable={}",
                    person.id,
                    err.code(),
                    err.is_retryable()
                );
                SyncOutcome {
                    local_ok: true,
                    remote_ok: false,
                    remote_id: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Resolves `company` locally by normalized name, then mirrors it remotely.
    ///
    /// Locally this is find-or-create: a stored match absorbs the incoming
    /// fields and keeps its id. The resolved record is then matched remotely
    /// by normalized name; a remote hit is overwritten with the local fields
    /// but keeps its own id and creation time, otherwise the record is
    /// inserted under its local id.
    pub fn upsert_company(&self, company: &Company) -> SyncOutcome {
        let local = SqliteCompanyRepository::try_new(self.cache.connection())
            .map_err(ServiceError::from)
            .and_then(|repo| CompanyService::new(repo).find_or_create(company));
        let resolved = match local {
            Ok(found) => found.company,
            Err(err) => {
                warn!(
                    "event=sync_company module=sync status=error side=local id={} error={}",
                    company.id, err
                );
                return SyncOutcome::local_failed(err);
            }
        };

        match self.mirror_company(&resolved) {
            Ok(remote_id) => SyncOutcome {
                local_ok: true,
                remote_ok: true,
                remote_id: Some(remote_id),
                error: None,
            },
            Err(err) => {
                warn!(
                    "event=sync_company module=sync status=degraded id={} code={} retryable={}",
                    resolved.id,
                    err.code(),
                    err.is_retryable()
                );
                SyncOutcome {
                    local_ok: true,
                    remote_ok: false,
                    remote_id: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn mirror_company(&self, company: &Company) -> Result<CompanyId, RemoteError> {
        match self
            .remote
            .find_company_by_normalized_name(&company.normalized_name())?
        {
            Some(existing) => {
                let mut updated = company.clone();
                updated.id = existing.id;
                updated.created_at = existing.created_at;
                self.remote.update_company(&updated)?;
                Ok(updated.id)
            }
            None => {
                self.remote.insert_company(company)?;
                Ok(company.id.clone())
            }
        }
    }

    /// Upserts every record; one failure never stops the batch.
    pub fn push_all(&self, people: &[Person], companies: &[Company]) -> PushReport {
        let mut report = PushReport::default();
        for person in people {
            if self.upsert_person(person).is_synced() {
                report.uploaded.people += 1;
            } else {
                report.failed.people += 1;
            }
        }
        for company in companies {
            if self.upsert_company(company).is_synced() {
                report.uploaded.companies += 1;
            } else {
                report.failed.companies += 1;
            }
        }
        info!(
            "event=sync_push module=sync status=ok uploaded_people={} uploaded_companies={} failed_people={} failed_companies={}",
            report.uploaded.people,
            report.uploaded.companies,
            report.failed.people,
            report.failed.companies
        );
        report
    }

    /// Replaces the local people and companies with the remote snapshot.
    ///
    /// Both fetches happen before any local write, so a remote failure leaves
    /// the cache untouched. Edges of people missing from the snapshot are
    /// pruned by the foreign-key cascade; surviving edges are kept as-is and
    /// can be refreshed with a rebuild.
    pub fn pull_all(&self) -> SyncResult<PullReport> {
        info!("event=sync_pull module=sync status=start");
        let remote_people = self.remote.fetch_people()?;
        let remote_companies = self.remote.fetch_companies()?;

        let mut report = PullReport::default();
        let people = accept_valid(
            remote_people,
            |person| person.validate().is_ok(),
            |person| person.id.clone(),
            &mut report.skipped.people,
        );
        let companies = accept_valid(
            remote_companies,
            |company| company.validate().is_ok(),
            |company| company.id.clone(),
            &mut report.skipped.companies,
        );

        let conn = self.cache.connection();
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        {
            let person_repo = SqlitePersonRepository::try_new(&tx)?;
            for person in &people {
                person_repo.upsert_person(person)?;
            }
            let keep_ids: Vec<PersonId> = people.iter().map(|person| person.id.clone()).collect();
            let pruned = person_repo.retain_people(&keep_ids)?;

            let company_repo = SqliteCompanyRepository::try_new(&tx)?;
            company_repo.clear_companies()?;
            for company in &companies {
                company_repo.insert_company(company)?;
            }

            info!(
                "event=sync_pull module=sync status=ok people={} companies={} pruned_people={} skipped_people={} skipped_companies={}",
                people.len(),
                companies.len(),
                pruned,
                report.skipped.people,
                report.skipped.companies
            );
        }
        tx.commit()?;

        report.downloaded = SyncCounts {
            people: people.len(),
            companies: companies.len(),
        };
        Ok(report)
    }
}

fn accept_valid<T>(
    records: Vec<T>,
    is_valid: impl Fn(&T) -> bool,
    id_of: impl Fn(&T) -> String,
    skipped: &mut usize,
) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(records.len());
    for record in records {
        let id = id_of(&record);
        if !is_valid(&record) || !seen.insert(id.clone()) {
            warn!("event=sync_pull_skip module=sync status=degraded id={}", id);
            *skipped += 1;
            continue;
        }
        accepted.push(record);
    }
    accepted
}

//! Remote store contract and in-process implementation.

use crate::model::company::Company;
use crate::model::person::Person;
use crate::resolve::normalize_company_name;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure reported by a remote store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Store unreachable; an identical retry may succeed.
    Unavailable(String),
    /// Store refused the write for this record id.
    Rejected(String),
    NotFound(String),
    DuplicateId(String),
    /// Store state is unusable.
    Internal(String),
}

impl RemoteError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "remote_unavailable",
            Self::Rejected(_) => "write_rejected",
            Self::NotFound(_) => "not_found",
            Self::DuplicateId(_) => "duplicate_id",
            Self::Internal(_) => "internal",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "remote store unavailable: {message}"),
            Self::Rejected(id) => write!(f, "remote store rejected write for {id}"),
            Self::NotFound(id) => write!(f, "remote record not found: {id}"),
            Self::DuplicateId(id) => write!(f, "remote record already exists: {id}"),
            Self::Internal(message) => write!(f, "remote store error: {message}"),
        }
    }
}

impl Error for RemoteError {}

/// Hosted store contract.
///
/// Calls are blocking from the caller's view; implementations backed by a
/// network client wrap their transport behind this trait.
pub trait RemoteStore {
    /// Inserts or overwrites the person with the same id.
    fn upsert_person(&self, person: &Person) -> RemoteResult<()>;
    /// Earliest-created company whose normalized name equals `normalized`.
    fn find_company_by_normalized_name(&self, normalized: &str) -> RemoteResult<Option<Company>>;
    fn insert_company(&self, company: &Company) -> RemoteResult<()>;
    /// Overwrites the row with the same id.
    fn update_company(&self, company: &Company) -> RemoteResult<()>;
    fn fetch_people(&self) -> RemoteResult<Vec<Person>>;
    fn fetch_companies(&self) -> RemoteResult<Vec<Company>>;
}

#[derive(Debug, Default)]
struct RemoteState {
    people: Vec<Person>,
    companies: Vec<Company>,
}

/// In-process remote store.
///
/// Keeps rows in insertion order. Can be switched offline or told to reject
/// writes for specific ids to exercise degraded sync paths.
#[derive(Debug)]
pub struct InMemoryRemoteStore {
    state: Mutex<RemoteState>,
    online: AtomicBool,
    rejected_ids: Mutex<HashSet<String>>,
}

impl Default for InMemoryRemoteStore {
    fn default() -> Self {
        Self {
            state: Mutex::new(RemoteState::default()),
            online: AtomicBool::new(true),
            rejected_ids: Mutex::new(HashSet::new()),
        }
    }
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles availability; offline stores fail every call.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Makes subsequent writes of the record with `id` fail.
    pub fn reject_writes_for(&self, id: impl Into<String>) {
        if let Ok(mut rejected) = self.rejected_ids.lock() {
            rejected.insert(id.into());
        }
    }

    /// Inserts a company without any lookup, as a racing writer would.
    pub fn insert_company_unchecked(&self, company: Company) -> RemoteResult<()> {
        self.state()?.companies.push(company);
        Ok(())
    }

    /// Snapshot of stored people.
    pub fn people(&self) -> Vec<Person> {
        self.state().map(|state| state.people.clone()).unwrap_or_default()
    }

    /// Snapshot of stored companies.
    pub fn companies(&self) -> Vec<Company> {
        self.state()
            .map(|state| state.companies.clone())
            .unwrap_or_default()
    }

    fn state(&self) -> RemoteResult<MutexGuard<'_, RemoteState>> {
        self.state
            .lock()
            .map_err(|_| RemoteError::Internal("state lock poisoned".to_string()))
    }

    fn ensure_online(&self) -> RemoteResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RemoteError::Unavailable("store is offline".to_string()))
        }
    }

    fn ensure_writable(&self, id: &str) -> RemoteResult<()> {
        self.ensure_online()?;
        let rejected = self
            .rejected_ids
            .lock()
            .map(|rejected| rejected.contains(id))
            .unwrap_or(false);
        if rejected {
            return Err(RemoteError::Rejected(id.to_string()));
        }
        Ok(())
    }
}

impl RemoteStore for InMemoryRemoteStore {
    fn upsert_person(&self, person: &Person) -> RemoteResult<()> {
        self.ensure_writable(&person.id)?;
        let mut state = self.state()?;
        match state.people.iter_mut().find(|stored| stored.id == person.id) {
            Some(stored) => *stored = person.clone(),
            None => state.people.push(person.clone()),
        }
        Ok(())
    }

    fn find_company_by_normalized_name(&self, normalized: &str) -> RemoteResult<Option<Company>> {
        self.ensure_online()?;
        let state = self.state()?;
        Ok(state
            .companies
            .iter()
            .filter(|company| normalize_company_name(&company.name) == normalized)
            .min_by_key(|company| company.created_at)
            .cloned())
    }

    fn insert_company(&self, company: &Company) -> RemoteResult<()> {
        self.ensure_writable(&company.id)?;
        let mut state = self.state()?;
        if state.companies.iter().any(|stored| stored.id == company.id) {
            return Err(RemoteError::DuplicateId(company.id.clone()));
        }
        state.companies.push(company.clone());
        Ok(())
    }

    fn update_company(&self, company: &Company) -> RemoteResult<()> {
        self.ensure_writable(&company.id)?;
        let mut state = self.state()?;
        match state.companies.iter_mut().find(|stored| stored.id == company.id) {
            Some(stored) => {
                *stored = company.clone();
                Ok(())
            }
            None => Err(RemoteError::NotFound(company.id.clone())),
        }
    }

    fn fetch_people(&self) -> RemoteResult<Vec<Person>> {
        self.ensure_online()?;
        Ok(self.state()?.people.clone())
    }

    fn fetch_companies(&self) -> RemoteResult<Vec<Company>> {
        self.ensure_online()?;
        Ok(self.state()?.companies.clone())
    }
}

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into directory use-cases.
//! - Keep CLI/sync layers decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass repository validation.
//! - Company writes always go through find-or-create.

pub mod company_service;
pub mod person_service;

use crate::model::person::PersonId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for directory use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target person does not exist in the local cache.
    PersonNotFound(PersonId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::PersonNotFound(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PersonNotFound(id) => Self::PersonNotFound(id),
            other => Self::Repo(other),
        }
    }
}

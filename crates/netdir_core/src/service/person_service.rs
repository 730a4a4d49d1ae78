//! Person use-case service.
//!
//! # Responsibility
//! - Persist people with derived tags and resolved employers.
//! - Keep the stored edge set in step with people (incremental or sweep).
//! - Serve second-degree recommendations from stored data.
//!
//! # Invariants
//! - Every saved employer name resolves to exactly one stored Company.
//! - A save only rewrites edges touching the saved person.
//! - Deleting a person removes its edges.

use crate::db::LocalCache;
use crate::graph::{infer_all, infer_for_person, recommend, Recommendation};
use crate::model::edge::RelationshipEdge;
use crate::model::now_epoch_ms;
use crate::model::person::{derive_tags, employer_key, Person};
use crate::repo::company_repo::{CompanyRepository, SqliteCompanyRepository};
use crate::repo::edge_repo::{EdgeRepository, SqliteEdgeRepository};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::repo::RepoError;
use crate::service::company_service::CompanyService;
use crate::service::{ServiceError, ServiceResult};
use log::info;
use std::collections::HashSet;

/// Result of [`PersonService::save_person`].
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    /// Record as stored, with regenerated tags.
    pub person: Person,
    /// Employer companies inserted by find-or-create.
    pub companies_created: usize,
    /// Edges now stored for this person.
    pub edges: Vec<RelationshipEdge>,
}

/// Person service facade over repository implementations.
pub struct PersonService<P, C, E>
where
    P: PersonRepository,
    C: CompanyRepository,
    E: EdgeRepository,
{
    people: P,
    companies: CompanyService<C>,
    edges: E,
}

impl<'conn>
    PersonService<
        SqlitePersonRepository<'conn>,
        SqliteCompanyRepository<'conn>,
        SqliteEdgeRepository<'conn>,
    >
{
    /// Builds a service over the SQLite repositories of `cache`.
    pub fn for_cache(cache: &'conn LocalCache) -> ServiceResult<Self> {
        let conn = cache.connection();
        Ok(Self::new(
            SqlitePersonRepository::try_new(conn)?,
            SqliteCompanyRepository::try_new(conn)?,
            SqliteEdgeRepository::try_new(conn)?,
        ))
    }
}

impl<P, C, E> PersonService<P, C, E>
where
    P: PersonRepository,
    C: CompanyRepository,
    E: EdgeRepository,
{
    pub fn new(people: P, companies: C, edges: E) -> Self {
        Self {
            people,
            companies: CompanyService::new(companies),
            edges,
        }
    }

    pub fn companies(&self) -> &CompanyService<C> {
        &self.companies
    }

    /// Saves a person and refreshes everything derived from it.
    ///
    /// Steps: regenerate tags, upsert by id (keeping the stored
    /// `created_at`), find-or-create each employer, then recompute this
    /// person's edges against every other stored person.
    pub fn save_person(&self, person: &Person) -> ServiceResult<SaveReport> {
        person.validate().map_err(RepoError::from)?;

        let mut stored = person.clone();
        stored.tags = derive_tags(&stored);
        stored.updated_at = now_epoch_ms();
        if let Some(existing) = self.people.get_person(&stored.id)? {
            stored.created_at = existing.created_at;
        }
        self.people.upsert_person(&stored)?;

        let mut companies_created = 0;
        let mut seen_employers = HashSet::new();
        for employment in &stored.employers {
            if !seen_employers.insert(employer_key(&employment.company)) {
                continue;
            }
            if self
                .companies
                .ensure_employer(&employment.company, stored.industry())?
                .created
            {
                companies_created += 1;
            }
        }

        let others = self.people.list_people()?;
        let edges = infer_for_person(&stored, &others);
        self.edges.replace_edges_for_person(&stored.id, &edges)?;

        info!(
            "event=person_save module=service status=ok id={} companies_created={} edges={}",
            stored.id,
            companies_created,
            edges.len()
        );

        Ok(SaveReport {
            person: stored,
            companies_created,
            edges,
        })
    }

    pub fn get_person(&self, id: &str) -> ServiceResult<Option<Person>> {
        Ok(self.people.get_person(id)?)
    }

    pub fn list_people(&self) -> ServiceResult<Vec<Person>> {
        Ok(self.people.list_people()?)
    }

    pub fn edges_for_person(&self, id: &str) -> ServiceResult<Vec<RelationshipEdge>> {
        Ok(self.edges.edges_for_person(id)?)
    }

    pub fn list_edges(&self) -> ServiceResult<Vec<RelationshipEdge>> {
        Ok(self.edges.list_edges()?)
    }

    /// Deletes a person together with every edge referencing it.
    pub fn delete_person(&self, id: &str) -> ServiceResult<()> {
        self.people.delete_person(id)?;
        info!("event=person_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Full sweep: recomputes and replaces the whole edge set.
    ///
    /// Returns the number of stored edges. Must not overlap a save.
    pub fn rebuild_edges(&self) -> ServiceResult<usize> {
        let people = self.people.list_people()?;
        let edges = infer_all(&people);
        self.edges.replace_all_edges(&edges)?;
        info!(
            "event=edge_rebuild module=service status=ok people={} edges={}",
            people.len(),
            edges.len()
        );
        Ok(edges.len())
    }

    /// Second-degree recommendations for a stored person.
    pub fn recommend_for(&self, id: &str, limit: usize) -> ServiceResult<Vec<Recommendation>> {
        let people = self.people.list_people()?;
        if !people.iter().any(|person| person.id == id) {
            return Err(ServiceError::PersonNotFound(id.to_string()));
        }
        let edges = self.edges.list_edges()?;
        Ok(recommend(id, &people, &edges, limit))
    }
}

//! Core domain logic for the relationship directory.
//! Owns alias masking, relationship inference, company resolution, the
//! local cache and its sync with a remote store.

pub mod alias;
pub mod config;
pub mod db;
pub mod graph;
pub mod logging;
pub mod model;
pub mod repo;
pub mod resolve;
pub mod service;
pub mod sync;

pub use alias::{should_alias, AliasEngine, AliasIndex, NameGate, PersonView, Viewer};
pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult, LocalCache};
pub use graph::{infer_all, infer_edge, infer_for_person, recommend, Recommendation};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::company::{
    normalize_partner_refs, Company, CompanyId, CompanyValidationError, PartnerDetail,
    SupplierRef,
};
pub use model::edge::{pair_key, RelationType, RelationshipEdge};
pub use model::person::{
    derive_tags, Education, Employment, Person, PersonId, PersonValidationError,
};
pub use repo::{RepoError, RepoResult};
pub use resolve::{normalize_company_name, resolve_all, MergeRecord, ResolveOutcome};
pub use service::company_service::{CompanyService, DedupReport, FindOrCreate};
pub use service::person_service::{PersonService, SaveReport};
pub use service::{ServiceError, ServiceResult};
pub use sync::{
    InMemoryRemoteStore, PullReport, PushReport, RemoteError, RemoteStore, SyncCounts,
    SyncError, SyncOutcome, SyncReconciler,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

use netdir_core::db::LocalCache;
use netdir_core::repo::company_repo::{CompanyRepository, SqliteCompanyRepository};
use netdir_core::{
    Company, InMemoryRemoteStore, Person, PersonService, RemoteError, RemoteStore, SyncCounts,
    SyncError, SyncReconciler,
};

fn person(id: &str, company: &str, created_at: i64) -> Person {
    let mut person = Person::with_id(id, format!("name-{id}")).with_employer(company, "Engineer");
    person.created_at = created_at;
    person.updated_at = created_at;
    person
}

fn company(id: &str, name: &str, created_at: i64) -> Company {
    let mut company = Company::with_id(id, name);
    company.created_at = created_at;
    company.updated_at = created_at;
    company
}

#[test]
fn upsert_person_writes_both_sides() {
    let cache = LocalCache::open_in_memory().unwrap();
    let remote = InMemoryRemoteStore::new();
    let sync = SyncReconciler::new(&cache, &remote);

    let outcome = sync.upsert_person(&person("p1", "Acme", 1));

    assert!(outcome.is_synced());
    assert_eq!(outcome.remote_id.as_deref(), Some("p1"));
    assert!(outcome.error.is_none());
    assert_eq!(remote.people().len(), 1);
    let service = PersonService::for_cache(&cache).unwrap();
    assert!(service.get_person("p1").unwrap().is_some());
}

#[test]
fn upsert_person_overwrites_remote_by_id() {
    let cache = LocalCache::open_in_memory().unwrap();
    let remote = InMemoryRemoteStore::new();
    let sync = SyncReconciler::new(&cache, &remote);

    sync.upsert_person(&person("p1", "Acme", 1));
    let moved = person("p1", "Globex", 1);
    assert!(sync.upsert_person(&moved).is_synced());

    let stored = remote.people();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].employers[0].company, "Globex");
}

#[test]
fn remote_failure_keeps_local_write() {
    let cache = LocalCache::open_in_memory().unwrap();
    let remote = InMemoryRemoteStore::new();
    remote.set_online(false);
    let sync = SyncReconciler::new(&cache, &remote);

    let outcome = sync.upsert_person(&person("p1", "Acme", 1));

    assert!(outcome.local_ok);
    assert!(!outcome.remote_ok);
    assert!(outcome.is_degraded());
    assert!(outcome.remote_id.is_none());
    assert!(outcome.error.unwrap().contains("unavailable"));
    let service = PersonService::for_cache(&cache).unwrap();
    assert!(service.get_person("p1").unwrap().is_some());
}

#[test]
fn invalid_person_fails_locally_and_skips_remote() {
    let cache = LocalCache::open_in_memory().unwrap();
    let remote = InMemoryRemoteStore::new();
    let sync = SyncReconciler::new(&cache, &remote);

    let outcome = sync.upsert_person(&Person::with_id("p1", "No Job"));

    assert!(!outcome.local_ok);
    assert!(!outcome.remote_ok);
    assert!(!outcome.is_degraded());
    assert!(outcome.error.is_some());
    assert!(remote.people().is_empty());
}

#[test]
fn upsert_company_updates_remote_match_and_keeps_its_id() {
    let cache = LocalCache::open_in_memory().unwrap();
    let remote = InMemoryRemoteStore::new();
    remote
        .insert_company_unchecked(company("remote-1", "Acme", 1))
        .unwrap();
    let sync = SyncReconciler::new(&cache, &remote);

    let mut local = company("local-1", "Acme (Beijing)", 5);
    local.website = Some("https://acme.example".to_string());
    let outcome = sync.upsert_company(&local);

    assert!(outcome.is_synced());
    assert_eq!(outcome.remote_id.as_deref(), Some("remote-1"));
    let stored = remote.companies();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, "remote-1");
    assert_eq!(stored[0].created_at, 1);
    assert_eq!(stored[0].website.as_deref(), Some("https://acme.example"));

    let repo = SqliteCompanyRepository::try_new(cache.connection()).unwrap();
    assert!(repo.get_company("local-1").unwrap().is_some());
}

#[test]
fn upsert_company_resolves_local_side_by_normalized_name() {
    let cache = LocalCache::open_in_memory().unwrap();
    let remote = InMemoryRemoteStore::new();
    let sync = SyncReconciler::new(&cache, &remote);

    assert!(sync.upsert_company(&company("1", "Acme Inc", 1)).is_synced());
    let mut variant = company("2", "Acme Inc (Shanghai)", 2);
    variant.headquarters = Some("Shanghai".to_string());
    let outcome = sync.upsert_company(&variant);

    assert!(outcome.is_synced());
    assert_eq!(outcome.remote_id.as_deref(), Some("1"));

    let repo = SqliteCompanyRepository::try_new(cache.connection()).unwrap();
    let local = repo.list_companies().unwrap();
    assert_eq!(local.len(), 1);
    assert_eq!(local[0].id, "1");
    assert_eq!(local[0].name, "Acme Inc");
    assert_eq!(local[0].headquarters.as_deref(), Some("Shanghai"));

    let stored = remote.companies();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, "1");
    assert_eq!(stored[0].headquarters.as_deref(), Some("Shanghai"));
}

#[test]
fn upsert_company_inserts_when_no_remote_match() {
    let cache = LocalCache::open_in_memory().unwrap();
    let remote = InMemoryRemoteStore::new();
    let sync = SyncReconciler::new(&cache, &remote);

    let outcome = sync.upsert_company(&company("c1", "Globex", 1));
    assert_eq!(outcome.remote_id.as_deref(), Some("c1"));

    // Local row already exists, so this is an update on both sides.
    let mut renamed = company("c1", "Globex", 1);
    renamed.industry = Some("Energy".to_string());
    assert!(sync.upsert_company(&renamed).is_synced());

    let stored = remote.companies();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].industry.as_deref(), Some("Energy"));
}

#[test]
fn push_all_counts_failures_without_aborting() {
    let cache = LocalCache::open_in_memory().unwrap();
    let remote = InMemoryRemoteStore::new();
    remote.reject_writes_for("p2");
    let sync = SyncReconciler::new(&cache, &remote);

    let people = vec![
        person("p1", "Acme", 1),
        person("p2", "Acme", 2),
        person("p3", "Acme", 3),
    ];
    let companies = vec![company("c1", "Acme", 1), company("c2", "Globex", 2)];
    let report = sync.push_all(&people, &companies);

    assert_eq!(
        report.uploaded,
        SyncCounts {
            people: 2,
            companies: 2
        }
    );
    assert_eq!(
        report.failed,
        SyncCounts {
            people: 1,
            companies: 0
        }
    );
    let remote_ids: Vec<String> = remote.people().into_iter().map(|p| p.id).collect();
    assert_eq!(remote_ids, vec!["p1", "p3"]);
}

#[test]
fn pull_all_replaces_local_directory_and_prunes_edges() {
    let cache = LocalCache::open_in_memory().unwrap();
    let service = PersonService::for_cache(&cache).unwrap();
    service.save_person(&person("x", "Acme", 1)).unwrap();
    service.save_person(&person("y", "Acme", 2)).unwrap();
    assert_eq!(service.list_edges().unwrap().len(), 1);

    let remote = InMemoryRemoteStore::new();
    remote.upsert_person(&person("y", "Globex", 2)).unwrap();
    remote.upsert_person(&person("z", "Globex", 3)).unwrap();
    remote.insert_company(&company("g1", "Globex", 1)).unwrap();

    let report = SyncReconciler::new(&cache, &remote).pull_all().unwrap();

    assert_eq!(
        report.downloaded,
        SyncCounts {
            people: 2,
            companies: 1
        }
    );
    assert_eq!(report.skipped, SyncCounts::default());
    let ids: Vec<String> = service
        .list_people()
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec!["y", "z"]);
    assert_eq!(
        service.get_person("y").unwrap().unwrap().employers[0].company,
        "Globex"
    );
    assert!(service.list_edges().unwrap().is_empty());

    let companies = service.companies().list_companies().unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].id, "g1");

    assert_eq!(service.rebuild_edges().unwrap(), 1);
}

#[test]
fn pull_all_skips_invalid_and_repeated_records() {
    let cache = LocalCache::open_in_memory().unwrap();
    let remote = InMemoryRemoteStore::new();
    remote.upsert_person(&person("ok", "Acme", 1)).unwrap();
    remote
        .upsert_person(&Person::with_id("broken", "No Job"))
        .unwrap();
    remote
        .insert_company_unchecked(company("c1", "Acme", 1))
        .unwrap();
    remote
        .insert_company_unchecked(company("c1", "Acme copy", 2))
        .unwrap();

    let report = SyncReconciler::new(&cache, &remote).pull_all().unwrap();

    assert_eq!(
        report.downloaded,
        SyncCounts {
            people: 1,
            companies: 1
        }
    );
    assert_eq!(
        report.skipped,
        SyncCounts {
            people: 1,
            companies: 1
        }
    );
    let repo = SqliteCompanyRepository::try_new(cache.connection()).unwrap();
    assert_eq!(repo.get_company("c1").unwrap().unwrap().name, "Acme");
}

#[test]
fn pull_all_leaves_cache_untouched_when_remote_is_down() {
    let cache = LocalCache::open_in_memory().unwrap();
    let service = PersonService::for_cache(&cache).unwrap();
    service.save_person(&person("x", "Acme", 1)).unwrap();

    let remote = InMemoryRemoteStore::new();
    remote.set_online(false);
    let err = SyncReconciler::new(&cache, &remote).pull_all().unwrap_err();

    assert!(matches!(err, SyncError::Remote(RemoteError::Unavailable(_))));
    assert_eq!(service.list_people().unwrap().len(), 1);
    assert_eq!(service.companies().list_companies().unwrap().len(), 1);
}

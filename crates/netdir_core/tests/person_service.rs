use netdir_core::db::LocalCache;
use netdir_core::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use netdir_core::{
    Education, Person, PersonService, RelationType, RepoError, ServiceError,
};

fn person(id: &str, company: &str, title: &str) -> Person {
    Person::with_id(id, format!("name-{id}")).with_employer(company, title)
}

#[test]
fn save_person_derives_tags_and_resolves_employers_once() {
    let cache = LocalCache::open_in_memory().unwrap();
    let service = PersonService::for_cache(&cache).unwrap();

    let mut zhang = Person::with_id("p1", "张三")
        .with_employer("Acme", "Engineer")
        .with_employer("Acme (Beijing)", "Lead")
        .with_education(Education::new("bachelor", "Tsinghua"));
    zhang.industry = Some("Robotics".to_string());
    zhang.current_city = Some("Beijing".to_string());
    zhang.tags = vec!["stale".to_string()];

    let report = service.save_person(&zhang).unwrap();

    assert_eq!(report.companies_created, 1);
    assert_eq!(
        report.person.tags,
        vec!["Acme", "Acme (Beijing)", "Tsinghua", "Robotics", "Beijing"]
    );
    let companies = service.companies().list_companies().unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].name, "Acme");
    assert_eq!(companies[0].industry.as_deref(), Some("Robotics"));

    let stored = service.get_person("p1").unwrap().unwrap();
    assert_eq!(stored.tags, report.person.tags);
}

#[test]
fn resaving_keeps_original_created_at() {
    let cache = LocalCache::open_in_memory().unwrap();
    let service = PersonService::for_cache(&cache).unwrap();

    let mut first = person("p1", "Acme", "Engineer");
    first.created_at = 5;
    service.save_person(&first).unwrap();

    let mut second = person("p1", "Acme", "Manager");
    second.created_at = 999;
    let report = service.save_person(&second).unwrap();

    assert_eq!(report.person.created_at, 5);
    assert_eq!(report.companies_created, 0);
    let stored = service.get_person("p1").unwrap().unwrap();
    assert_eq!(stored.created_at, 5);
    assert_eq!(stored.employers[0].title, "Manager");
}

#[test]
fn save_person_rejects_invalid_records() {
    let cache = LocalCache::open_in_memory().unwrap();
    let service = PersonService::for_cache(&cache).unwrap();

    let err = service
        .save_person(&Person::with_id("p1", "No Job"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Repo(RepoError::PersonValidation(_))
    ));
    assert!(service.list_people().unwrap().is_empty());
}

#[test]
fn save_person_infers_edges_against_stored_people() {
    let cache = LocalCache::open_in_memory().unwrap();
    let service = PersonService::for_cache(&cache).unwrap();

    let first = service.save_person(&person("1", "Acme", "CEO")).unwrap();
    assert!(first.edges.is_empty());

    let second = service
        .save_person(&person("2", "Acme", "Assistant"))
        .unwrap();
    assert_eq!(second.edges.len(), 1);
    let edge = &second.edges[0];
    assert_eq!(edge.person_a, "2");
    assert_eq!(edge.person_b, "1");
    assert_eq!(edge.relation, RelationType::Subordinate);
    assert_eq!(edge.strength, 0.9);

    let stored = service.edges_for_person("1").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].relation_for("1"), Some(RelationType::Superior));
}

#[test]
fn resave_replaces_only_that_persons_edges() {
    let cache = LocalCache::open_in_memory().unwrap();
    let service = PersonService::for_cache(&cache).unwrap();

    service.save_person(&person("1", "Acme", "Engineer")).unwrap();
    service.save_person(&person("2", "Acme", "Engineer")).unwrap();
    service.save_person(&person("3", "Beta", "Engineer")).unwrap();
    service.save_person(&person("4", "Beta", "Engineer")).unwrap();
    assert_eq!(service.list_edges().unwrap().len(), 2);

    // Person 2 moves to Beta: loses Acme, gains 3 and 4.
    service.save_person(&person("2", "Beta", "Engineer")).unwrap();

    let edges = service.list_edges().unwrap();
    let pairs: Vec<(String, String)> = edges.iter().map(|edge| edge.key()).collect();
    assert_eq!(
        pairs,
        vec![
            ("2".to_string(), "3".to_string()),
            ("2".to_string(), "4".to_string()),
            ("3".to_string(), "4".to_string()),
        ]
    );
}

#[test]
fn delete_person_cascades_edges() {
    let cache = LocalCache::open_in_memory().unwrap();
    let service = PersonService::for_cache(&cache).unwrap();

    service.save_person(&person("1", "Acme", "CEO")).unwrap();
    service.save_person(&person("2", "Acme", "Assistant")).unwrap();
    assert_eq!(service.list_edges().unwrap().len(), 1);

    service.delete_person("1").unwrap();

    assert!(service.get_person("1").unwrap().is_none());
    assert!(service.edges_for_person("2").unwrap().is_empty());
    assert!(service.list_edges().unwrap().is_empty());

    let err = service.delete_person("1").unwrap_err();
    assert!(matches!(err, ServiceError::PersonNotFound(id) if id == "1"));
}

#[test]
fn rebuild_edges_recomputes_from_stored_people() {
    let cache = LocalCache::open_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(cache.connection()).unwrap();
    repo.upsert_person(&person("1", "Acme", "CEO")).unwrap();
    repo.upsert_person(&person("2", "Acme", "Assistant")).unwrap();
    repo.upsert_person(&person("3", "Acme", "Engineer")).unwrap();
    repo.upsert_person(&person("4", "Elsewhere", "Engineer")).unwrap();

    let service = PersonService::for_cache(&cache).unwrap();
    assert!(service.list_edges().unwrap().is_empty());

    let count = service.rebuild_edges().unwrap();
    assert_eq!(count, 3);
    assert_eq!(service.list_edges().unwrap().len(), 3);
    assert!(service.edges_for_person("4").unwrap().is_empty());

    assert_eq!(service.rebuild_edges().unwrap(), 3);
}

#[test]
fn recommend_for_suggests_second_degree_contacts() {
    let cache = LocalCache::open_in_memory().unwrap();
    let service = PersonService::for_cache(&cache).unwrap();

    service.save_person(&person("a", "Acme", "Engineer")).unwrap();
    let bridge = person("b", "Acme", "Engineer").with_employer("Beta", "Advisor");
    service.save_person(&bridge).unwrap();
    service.save_person(&person("c", "Beta", "Engineer")).unwrap();

    let picks = service.recommend_for("a", 10).unwrap();
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].person.id, "c");
    assert!((picks[0].score - 0.3).abs() < 1e-9);

    let err = service.recommend_for("missing", 10).unwrap_err();
    assert!(matches!(err, ServiceError::PersonNotFound(_)));
}

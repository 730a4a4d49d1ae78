use netdir_core::model::person::Education;
use netdir_core::{infer_all, infer_edge, Person, RelationType};

fn person(id: &str, company: &str, title: &str) -> Person {
    Person::with_id(id, format!("name-{id}")).with_employer(company, title)
}

#[test]
fn ceo_and_assistant_yield_one_hierarchy_edge() {
    let people = vec![person("1", "Acme", "CEO"), person("2", "Acme", "Assistant")];

    let edges = infer_all(&people);

    assert_eq!(edges.len(), 1);
    let edge = &edges[0];
    assert_eq!(edge.key(), ("1".to_string(), "2".to_string()));
    assert_eq!(edge.strength, 0.9);
    assert_eq!(edge.relation_for("1"), Some(RelationType::Superior));
    assert_eq!(edge.relation_for("2"), Some(RelationType::Subordinate));
}

#[test]
fn direction_follows_argument_order() {
    let ceo = person("1", "Acme", "CEO");
    let assistant = person("2", "Acme", "Assistant");

    let down = infer_edge(&ceo, &assistant).unwrap();
    let up = infer_edge(&assistant, &ceo).unwrap();

    assert_eq!(down.relation, RelationType::Superior);
    assert_eq!(up.relation, RelationType::Subordinate);
}

#[test]
fn strongest_signal_wins_and_others_are_described() {
    let mut left = person("1", "Acme", "Engineer")
        .with_education(Education::new("bachelor", "Fudan"));
    left.current_city = Some("Shanghai".to_string());
    let mut right = person("2", "Acme", "Engineer")
        .with_education(Education::new("master", "Fudan"));
    right.current_city = Some("Shanghai".to_string());

    let edge = infer_edge(&left, &right).unwrap();

    assert_eq!(edge.relation, RelationType::Colleague);
    assert_eq!(edge.strength, 0.8);
    assert!(edge.description.starts_with("colleagues at Acme"));
    assert!(edge.description.contains("Fudan"));
    assert!(edge.description.contains("Shanghai"));
    assert!(!edge.description.contains("name-"));
}

#[test]
fn unrelated_people_produce_no_edge() {
    let people = vec![
        person("1", "Acme", "CEO"),
        person("2", "Globex", "CEO"),
        person("3", "Initech", "CEO"),
    ];
    assert!(infer_all(&people).is_empty());
}

#[test]
fn every_pair_gets_at_most_one_edge() {
    let mut people: Vec<Person> = (0..6)
        .map(|n| {
            let mut p = person(&n.to_string(), "Acme", "Engineer");
            p.industry = Some("Robotics".to_string());
            p.current_city = Some("Shenzhen".to_string());
            p
        })
        .collect();
    people.push(person("3", "Acme", "Engineer"));

    let edges = infer_all(&people);

    assert_eq!(edges.len(), 15);
    let mut keys: Vec<_> = edges.iter().map(|edge| edge.key()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 15);
}

#[test]
fn product_owner_and_engineer_are_colleagues() {
    let owner = person("1", "Acme", "Product Owner");
    let engineer = person("2", "Acme", "Engineer");

    let edge = infer_edge(&owner, &engineer).unwrap();

    assert_eq!(edge.relation, RelationType::Colleague);
    assert_eq!(edge.strength, 0.8);
}

#[test]
fn hometown_equal_to_shared_city_counts_once() {
    let mut left = person("1", "Acme", "Engineer");
    left.current_city = Some("Chengdu".to_string());
    left.hometown = Some("Chengdu".to_string());
    let mut right = person("2", "Globex", "Engineer");
    right.current_city = Some("Chengdu".to_string());
    right.hometown = Some("Chengdu".to_string());

    let edge = infer_edge(&left, &right).unwrap();

    assert_eq!(edge.relation, RelationType::BusinessContact);
    assert_eq!(edge.strength, 0.3);
    assert_eq!(edge.description, "both based in Chengdu");
}

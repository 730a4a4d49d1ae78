//! Second-degree contact recommendations.

use crate::model::edge::RelationshipEdge;
use crate::model::person::Person;
use log::warn;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Score added per first-degree contact who also links to the candidate.
pub const BRIDGE_SCORE: f64 = 0.3;
/// Score added for a shared industry at a different employer.
pub const INDUSTRY_SCORE: f64 = 0.2;
/// Score added for a shared current city at a different employer.
pub const CITY_SCORE: f64 = 0.1;

/// One suggested contact.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub person: Person,
    /// Human-readable concatenation of the contributing signals.
    pub reason: String,
    pub score: f64,
}

/// Recommends people not yet directly connected to `person_id`.
///
/// Candidates with a zero score are dropped. Results are sorted by score,
/// descending; equal scores keep `people` order. Returns an empty list when
/// `person_id` is unknown.
pub fn recommend(
    person_id: &str,
    people: &[Person],
    edges: &[RelationshipEdge],
    limit: usize,
) -> Vec<Recommendation> {
    let Some(subject) = people.iter().find(|person| person.id == person_id) else {
        warn!("event=recommend module=graph status=skipped reason=unknown_person");
        return Vec::new();
    };

    let mut neighbours: HashMap<&str, HashSet<&str>> = HashMap::new();
    for edge in edges {
        neighbours
            .entry(edge.person_a.as_str())
            .or_default()
            .insert(edge.person_b.as_str());
        neighbours
            .entry(edge.person_b.as_str())
            .or_default()
            .insert(edge.person_a.as_str());
    }
    let empty = HashSet::new();
    let first_degree = neighbours.get(person_id).unwrap_or(&empty);

    let mut scored = Vec::new();
    for candidate in people {
        let candidate_id = candidate.id.as_str();
        if candidate_id == person_id || first_degree.contains(candidate_id) {
            continue;
        }

        let mut score = 0.0;
        let mut reasons = Vec::new();

        let bridges = first_degree
            .iter()
            .filter(|contact| {
                neighbours
                    .get(*contact)
                    .is_some_and(|linked| linked.contains(candidate_id))
            })
            .count();
        if bridges > 0 {
            score += BRIDGE_SCORE * bridges as f64;
            reasons.push(format!("{bridges} mutual connection(s)"));
        }

        let different_employer = !subject.shares_employer_with(candidate);
        if different_employer {
            if let Some(industry) = subject.industry().filter(|v| candidate.industry() == Some(*v)) {
                score += INDUSTRY_SCORE;
                reasons.push(format!("same industry ({industry})"));
            }
            if let Some(city) = subject
                .current_city()
                .filter(|v| candidate.current_city() == Some(*v))
            {
                score += CITY_SCORE;
                reasons.push(format!("same city ({city})"));
            }
        }

        if score > 0.0 {
            scored.push(Recommendation {
                person: candidate.clone(),
                reason: reasons.join("; "),
                score,
            });
        }
    }

    scored.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::recommend;
    use crate::graph::inference::infer_all;
    use crate::model::person::{Employment, Person};

    fn person(id: &str, companies: &[&str]) -> Person {
        let mut person = Person::with_id(id, format!("name-{id}"));
        for company in companies {
            person.employers.push(Employment::new(*company, "Engineer"));
        }
        person
    }

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn bridges_and_attributes_accumulate() {
        let mut me = person("me", &["Acme"]);
        me.industry = Some("Robotics".to_string());
        me.current_city = Some("Shanghai".to_string());
        let friend = person("friend", &["Acme", "Initech"]);
        let bridged = person("bridged", &["Initech"]);
        let mut peer = person("peer", &["Globex"]);
        peer.industry = Some("Robotics".to_string());
        let stranger = person("stranger", &["Umbrella"]);

        let people = vec![me, friend, bridged, peer, stranger];
        let edges = infer_all(&people);
        let results = recommend("me", &people, &edges, 10);
        let ids: Vec<&str> = results.iter().map(|r| r.person.id.as_str()).collect();

        // `peer` shares the industry, which is already a direct edge.
        assert_eq!(ids, vec!["bridged"]);
        assert!(approx(results[0].score, 0.3));
        assert!(results[0].reason.contains("mutual"));
    }

    #[test]
    fn attribute_scores_need_a_different_employer() {
        let mut me = person("me", &["Acme"]);
        me.current_city = Some("Beijing".to_string());
        let friend = person("friend", &["Acme", "Globex"]);
        let mut candidate = person("candidate", &["Globex"]);
        candidate.industry = Some("Robotics".to_string());

        let people = vec![me.clone(), friend, candidate];
        let edges = infer_all(&people);
        let results = recommend("me", &people, &edges, 10);
        assert_eq!(results.len(), 1);
        assert!(approx(results[0].score, 0.3));

        // With no edges at all, a shared industry at a different employer
        // still scores.
        me.industry = Some("Robotics".to_string());
        let mut far = person("far", &["Initech"]);
        far.industry = Some("Robotics".to_string());
        let scored = recommend("me", &[me, far], &[], 10);
        assert_eq!(scored.len(), 1);
        assert!(approx(scored[0].score, 0.2));
        assert!(scored[0].reason.contains("Robotics"));
    }

    #[test]
    fn results_are_sorted_and_limited() {
        let mut me = person("me", &["Acme"]);
        me.current_city = Some("Beijing".to_string());
        let hub = person("hub", &["Acme", "Globex"]);
        let far = person("far", &["Globex", "Initech"]);
        let mut local = person("local", &["Initech"]);
        local.current_city = Some("Beijing".to_string());
        let one_hop = person("one_hop", &["Globex"]);

        let people = vec![me, hub, far, local, one_hop];
        let edges = infer_all(&people);

        let all = recommend("me", &people, &edges, 10);
        assert!(all.windows(2).all(|pair| pair[0].score >= pair[1].score));
        assert_eq!(all[0].person.id, "far");
        assert!(approx(all[0].score, 0.6));

        let top = recommend("me", &people, &edges, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].person.id, "far");
    }

    #[test]
    fn unknown_subject_yields_nothing() {
        let people = vec![person("a", &["Acme"]), person("b", &["Acme"])];
        let edges = infer_all(&people);
        assert!(recommend("zzz", &people, &edges, 5).is_empty());
    }
}

//! Attribute-matching edge inference.
//!
//! Each rule yields an independent candidate for a pair; the pair keeps the
//! strongest one, ties broken by [`MatchRule`] order. Descriptions carry
//! employer/school/place labels only, never names.

use crate::model::edge::{pair_key, RelationType, RelationshipEdge};
use crate::model::now_epoch_ms;
use crate::model::person::{same_employer, Person};
use log::{info, warn};
use std::collections::HashSet;

pub const HIERARCHY_STRENGTH: f64 = 0.9;
pub const COLLEAGUE_STRENGTH: f64 = 0.8;
pub const SCHOOLMATE_CLOSE_STRENGTH: f64 = 0.7;
pub const SCHOOLMATE_STRENGTH: f64 = 0.6;
pub const INDUSTRY_SAME_CITY_STRENGTH: f64 = 0.5;
pub const INDUSTRY_STRENGTH: f64 = 0.4;
pub const HOMETOWN_STRENGTH: f64 = 0.35;
pub const CITY_STRENGTH: f64 = 0.3;

/// Title levels must differ by more than this to become a hierarchy edge.
const HIERARCHY_GAP: f64 = 0.5;

const EXECUTIVE_KEYWORDS: &[&str] = &[
    "founder",
    "ceo",
    "president",
    "chairman",
    "business owner",
    "proprietor",
    "创始人",
    "董事长",
    "总裁",
    "首席执行官",
    "总经理",
];
const MANAGER_KEYWORDS: &[&str] = &[
    "manager", "director", "head of", "vp", "lead", "supervisor", "经理", "总监", "主管",
    "主任", "负责人",
];
const JUNIOR_KEYWORDS: &[&str] = &["assistant", "intern", "trainee", "助理", "实习"];

/// Rule that produced a candidate. Declaration order is tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchRule {
    Hierarchy,
    Colleague,
    Schoolmate,
    Industry,
    /// Shared current city or hometown.
    Locality,
}

#[derive(Debug, Clone)]
struct Candidate {
    rule: MatchRule,
    relation: RelationType,
    strength: f64,
    description: String,
}

/// Classifies a job title into a numeric hierarchy level.
///
/// - executive terms -> `3.0`
/// - manager/director terms -> `2.0`
/// - assistant/intern terms -> `1.0`
/// - anything else -> `1.5`
pub fn title_level(title: &str) -> f64 {
    let lowered = title.to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|kw| lowered.contains(kw));

    if contains_any(EXECUTIVE_KEYWORDS) {
        3.0
    } else if contains_any(MANAGER_KEYWORDS) {
        2.0
    } else if contains_any(JUNIOR_KEYWORDS) {
        1.0
    } else {
        1.5
    }
}

/// Infers the single dominant edge between `a` and `b`.
///
/// The returned relation is from `a`'s perspective. Returns `None` when no
/// rule fires or both records share one id.
pub fn infer_edge(a: &Person, b: &Person) -> Option<RelationshipEdge> {
    infer_edge_at(a, b, now_epoch_ms())
}

/// Infers edges for every unordered pair in `people`.
///
/// Records with a blank id are skipped with a warning. Repeated ids are
/// deduplicated by their sorted pair key, first occurrence wins.
pub fn infer_all(people: &[Person]) -> Vec<RelationshipEdge> {
    let now = now_epoch_ms();
    let usable: Vec<&Person> = people
        .iter()
        .filter(|person| {
            let keep = !person.id.trim().is_empty();
            if !keep {
                warn!("event=infer_all module=graph status=skipped reason=missing_id");
            }
            keep
        })
        .collect();

    let mut processed = HashSet::new();
    let mut edges = Vec::new();
    for (index, a) in usable.iter().enumerate() {
        for b in &usable[index + 1..] {
            if a.id == b.id || !processed.insert(pair_key(&a.id, &b.id)) {
                continue;
            }
            if let Some(edge) = infer_edge_at(a, b, now) {
                edges.push(edge);
            }
        }
    }

    info!(
        "event=infer_all module=graph status=ok people={} edges={}",
        usable.len(),
        edges.len()
    );
    edges
}

/// Infers edges between `person` and each of `others`.
///
/// Used by incremental saves; every returned edge has `person` as
/// `person_a`.
pub fn infer_for_person(person: &Person, others: &[Person]) -> Vec<RelationshipEdge> {
    if person.id.trim().is_empty() {
        warn!("event=infer_for_person module=graph status=skipped reason=missing_id");
        return Vec::new();
    }

    let now = now_epoch_ms();
    let mut seen = HashSet::new();
    others
        .iter()
        .filter(|other| !other.id.trim().is_empty() && other.id != person.id)
        .filter(|other| seen.insert(other.id.as_str()))
        .filter_map(|other| infer_edge_at(person, other, now))
        .collect()
}

fn infer_edge_at(a: &Person, b: &Person, now: i64) -> Option<RelationshipEdge> {
    if a.id == b.id {
        return None;
    }

    let mut candidates = Vec::new();
    candidates.extend(employer_candidate(a, b));
    candidates.extend(school_candidate(a, b));
    candidates.extend(industry_candidate(a, b));
    candidates.extend(locality_candidates(a, b));

    let winner_index = candidates
        .iter()
        .enumerate()
        .max_by(|(_, left), (_, right)| {
            left.strength
                .total_cmp(&right.strength)
                .then_with(|| right.rule.cmp(&left.rule))
        })
        .map(|(index, _)| index)?;
    let winner = candidates.remove(winner_index);

    let mut description = winner.description;
    let supporting: Vec<&str> = candidates
        .iter()
        .map(|candidate| candidate.description.as_str())
        .collect();
    if !supporting.is_empty() {
        description.push_str("; also ");
        description.push_str(&supporting.join(", "));
    }

    Some(RelationshipEdge {
        person_a: a.id.clone(),
        person_b: b.id.clone(),
        relation: winner.relation,
        strength: winner.strength,
        description,
        created_at: now,
        updated_at: now,
    })
}

fn employer_candidate(a: &Person, b: &Person) -> Option<Candidate> {
    let mut shared_company: Option<&str> = None;
    let mut widest: Option<(&str, f64)> = None;

    for mine in &a.employers {
        for theirs in &b.employers {
            if !same_employer(&mine.company, &theirs.company) {
                continue;
            }
            let company = mine.company.trim();
            shared_company.get_or_insert(company);
            let gap = title_level(&mine.title) - title_level(&theirs.title);
            if widest.map_or(true, |(_, best)| gap.abs() > best.abs()) {
                widest = Some((company, gap));
            }
        }
    }

    let company = shared_company?;
    match widest {
        Some((at, gap)) if gap.abs() > HIERARCHY_GAP => {
            let (relation, label) = if gap > 0.0 {
                (RelationType::Superior, "superior")
            } else {
                (RelationType::Subordinate, "subordinate")
            };
            Some(Candidate {
                rule: MatchRule::Hierarchy,
                relation,
                strength: HIERARCHY_STRENGTH,
                description: format!("{label} at {at}"),
            })
        }
        _ => Some(Candidate {
            rule: MatchRule::Colleague,
            relation: RelationType::Colleague,
            strength: COLLEAGUE_STRENGTH,
            description: format!("colleagues at {company}"),
        }),
    }
}

fn school_candidate(a: &Person, b: &Person) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for mine in &a.education {
        let school = mine.school.trim();
        if school.is_empty() {
            continue;
        }
        for theirs in &b.education {
            if !school.eq_ignore_ascii_case(theirs.school.trim()) {
                continue;
            }
            let same_year = mine.year.is_some() && mine.year == theirs.year;
            let same_major = match (mine.major.as_deref(), theirs.major.as_deref()) {
                (Some(left), Some(right)) => {
                    !left.trim().is_empty() && left.trim().eq_ignore_ascii_case(right.trim())
                }
                _ => false,
            };
            let (strength, description) = if same_year || same_major {
                (SCHOOLMATE_CLOSE_STRENGTH, format!("classmates at {school}"))
            } else {
                (SCHOOLMATE_STRENGTH, format!("schoolmates at {school}"))
            };
            if best.as_ref().map_or(true, |current| strength > current.strength) {
                best = Some(Candidate {
                    rule: MatchRule::Schoolmate,
                    relation: RelationType::Schoolmate,
                    strength,
                    description,
                });
            }
        }
    }

    best
}

fn industry_candidate(a: &Person, b: &Person) -> Option<Candidate> {
    let industry = a.industry()?;
    if b.industry() != Some(industry) {
        return None;
    }
    let same_city = a.current_city().is_some() && a.current_city() == b.current_city();
    let strength = if same_city {
        INDUSTRY_SAME_CITY_STRENGTH
    } else {
        INDUSTRY_STRENGTH
    };
    Some(Candidate {
        rule: MatchRule::Industry,
        relation: RelationType::IndustryPartner,
        strength,
        description: format!("both in {industry}"),
    })
}

fn locality_candidates(a: &Person, b: &Person) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    let shared_city = a.current_city().filter(|city| b.current_city() == Some(*city));
    if let Some(city) = shared_city {
        candidates.push(Candidate {
            rule: MatchRule::Locality,
            relation: RelationType::BusinessContact,
            strength: CITY_STRENGTH,
            description: format!("both based in {city}"),
        });
    }

    if let Some(hometown) = a.hometown().filter(|town| b.hometown() == Some(*town)) {
        // A hometown that is also the shared current city adds nothing.
        if shared_city != Some(hometown) {
            candidates.push(Candidate {
                rule: MatchRule::Locality,
                relation: RelationType::BusinessContact,
                strength: HOMETOWN_STRENGTH,
                description: format!("both from {hometown}"),
            });
        }
    }

    candidates
}

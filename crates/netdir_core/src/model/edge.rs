//! Relationship edge model.
//!
//! # Invariants
//! - An edge joins two distinct people; the pair is unordered for identity
//!   purposes (see [`pair_key`]).
//! - `relation` is expressed from `person_a`'s perspective. Only
//!   `Superior`/`Subordinate` are directional.
//! - `strength` lies in `[0, 1]`.

use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};

/// Fixed relationship tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Colleague,
    Schoolmate,
    IndustryPartner,
    BusinessContact,
    /// `person_a` ranks above `person_b` at a shared employer.
    Superior,
    /// `person_a` ranks below `person_b` at a shared employer.
    Subordinate,
}

impl RelationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Colleague => "colleague",
            Self::Schoolmate => "schoolmate",
            Self::IndustryPartner => "industry_partner",
            Self::BusinessContact => "business_contact",
            Self::Superior => "superior",
            Self::Subordinate => "subordinate",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "colleague" => Some(Self::Colleague),
            "schoolmate" => Some(Self::Schoolmate),
            "industry_partner" => Some(Self::IndustryPartner),
            "business_contact" => Some(Self::BusinessContact),
            "superior" => Some(Self::Superior),
            "subordinate" => Some(Self::Subordinate),
            _ => None,
        }
    }

    /// Same relation seen from the other endpoint.
    pub fn inverse(self) -> Self {
        match self {
            Self::Superior => Self::Subordinate,
            Self::Subordinate => Self::Superior,
            other => other,
        }
    }
}

/// Typed, weighted relationship between two people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub person_a: PersonId,
    pub person_b: PersonId,
    #[serde(rename = "type")]
    pub relation: RelationType,
    pub strength: f64,
    pub description: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl RelationshipEdge {
    /// Canonical unordered key for this edge.
    pub fn key(&self) -> (PersonId, PersonId) {
        pair_key(&self.person_a, &self.person_b)
    }

    pub fn involves(&self, person_id: &str) -> bool {
        self.person_a == person_id || self.person_b == person_id
    }

    /// Relation type from `person_id`'s perspective.
    pub fn relation_for(&self, person_id: &str) -> Option<RelationType> {
        if self.person_a == person_id {
            Some(self.relation)
        } else if self.person_b == person_id {
            Some(self.relation.inverse())
        } else {
            None
        }
    }
}

/// Sorted id pair used to deduplicate unordered pairs.
pub fn pair_key(a: &str, b: &str) -> (PersonId, PersonId) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{pair_key, RelationType, RelationshipEdge};

    fn edge(relation: RelationType) -> RelationshipEdge {
        RelationshipEdge {
            person_a: "b".to_string(),
            person_b: "a".to_string(),
            relation,
            strength: 0.9,
            description: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn relation_for_flips_hierarchy_only() {
        let boss = edge(RelationType::Superior);
        assert_eq!(boss.relation_for("b"), Some(RelationType::Superior));
        assert_eq!(boss.relation_for("a"), Some(RelationType::Subordinate));
        assert_eq!(boss.relation_for("c"), None);

        let peers = edge(RelationType::Colleague);
        assert_eq!(peers.relation_for("a"), Some(RelationType::Colleague));
    }

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(pair_key("x", "y"), pair_key("y", "x"));
        assert_eq!(edge(RelationType::Colleague).key(), pair_key("a", "b"));
    }

    #[test]
    fn relation_type_string_forms_parse_back() {
        for relation in [
            RelationType::Colleague,
            RelationType::Schoolmate,
            RelationType::IndustryPartner,
            RelationType::BusinessContact,
            RelationType::Superior,
            RelationType::Subordinate,
        ] {
            assert_eq!(RelationType::parse(relation.as_str()), Some(relation));
        }
        assert_eq!(RelationType::parse("friend"), None);
    }
}

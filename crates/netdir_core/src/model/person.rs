//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical Person record consumed by inference and alias paths.
//! - Provide boundary validation and the derived tag projection.
//!
//! # Invariants
//! - `id` is stable for the record lifetime and never reused.
//! - `name`, `phone` and `email` are sensitive and never logged.
//! - `tags` is not authoritative; it is regenerated by [`derive_tags`].

use crate::model::{non_blank, now_epoch_ms};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque stable identifier for a Person.
pub type PersonId = String;

/// One `(employer, title)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employment {
    /// Employer name as entered. Resolved to a Company via normalized name.
    pub company: String,
    /// Free-text job title, used for hierarchy ranking.
    #[serde(default)]
    pub title: String,
}

impl Employment {
    pub fn new(company: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            title: title.into(),
        }
    }
}

/// One education record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    /// Degree level, e.g. `bachelor`.
    #[serde(default)]
    pub level: String,
    pub school: String,
    #[serde(default)]
    pub major: Option<String>,
    /// Graduation year.
    #[serde(default)]
    pub year: Option<i32>,
}

impl Education {
    pub fn new(level: impl Into<String>, school: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            school: school.into(),
            major: None,
            year: None,
        }
    }
}

/// Canonical Person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    /// Real identity. Only surfaced to privileged viewers.
    pub name: String,
    #[serde(default)]
    pub employers: Vec<Employment>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub current_city: Option<String>,
    #[serde(default)]
    pub hometown: Option<String>,
    /// Derived labels. Overwritten on every save.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Person {
    /// Creates a person with a generated stable id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name)
    }

    /// Creates a person with a caller-provided id.
    ///
    /// Used by import/sync paths where identity already exists externally.
    pub fn with_id(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: id.into(),
            name: name.into(),
            employers: Vec::new(),
            education: Vec::new(),
            industry: None,
            current_city: None,
            hometown: None,
            tags: Vec::new(),
            phone: None,
            email: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends one employment entry.
    pub fn with_employer(mut self, company: impl Into<String>, title: impl Into<String>) -> Self {
        self.employers.push(Employment::new(company, title));
        self
    }

    /// Appends one education entry.
    pub fn with_education(mut self, education: Education) -> Self {
        self.education.push(education);
        self
    }

    /// Validates the fields required at the core boundary.
    ///
    /// # Errors
    /// - `MissingId` / `EmptyName` for blank identity fields.
    /// - `NoEmployer` when no employment entry exists.
    /// - `EmptyEmployer` when one entry has a blank company name.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.id.trim().is_empty() {
            return Err(PersonValidationError::MissingId);
        }
        if self.name.trim().is_empty() {
            return Err(PersonValidationError::EmptyName);
        }
        if self.employers.is_empty() {
            return Err(PersonValidationError::NoEmployer);
        }
        if let Some(index) = self
            .employers
            .iter()
            .position(|entry| entry.company.trim().is_empty())
        {
            return Err(PersonValidationError::EmptyEmployer(index));
        }
        Ok(())
    }

    pub fn industry(&self) -> Option<&str> {
        non_blank(self.industry.as_deref())
    }

    pub fn current_city(&self) -> Option<&str> {
        non_blank(self.current_city.as_deref())
    }

    pub fn hometown(&self) -> Option<&str> {
        non_blank(self.hometown.as_deref())
    }

    /// Returns true when both people list at least one common employer.
    ///
    /// Comparison uses the Company identity rule (normalized name),
    /// case-insensitively.
    pub fn shares_employer_with(&self, other: &Person) -> bool {
        self.employers.iter().any(|mine| {
            other
                .employers
                .iter()
                .any(|theirs| same_employer(&mine.company, &theirs.company))
        })
    }
}

/// Returns true when two employer names denote the same Company.
pub fn same_employer(left: &str, right: &str) -> bool {
    let left = employer_key(left);
    !left.is_empty() && left == employer_key(right)
}

pub(crate) fn employer_key(name: &str) -> String {
    crate::resolve::normalize_company_name(name).to_lowercase()
}

/// Regenerates the derived tag list from authoritative fields.
///
/// Order: employers, schools, industry, current city. Blank values are
/// skipped and repeats are removed keeping the first occurrence.
pub fn derive_tags(person: &Person) -> Vec<String> {
    let candidates = person
        .employers
        .iter()
        .map(|entry| entry.company.as_str())
        .chain(person.education.iter().map(|entry| entry.school.as_str()))
        .chain(person.industry())
        .chain(person.current_city());

    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for candidate in candidates {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            tags.push(trimmed.to_string());
        }
    }
    tags
}

/// Person boundary validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    MissingId,
    EmptyName,
    NoEmployer,
    /// Index of the employment entry with a blank company name.
    EmptyEmployer(usize),
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "person id must not be empty"),
            Self::EmptyName => write!(f, "person name must not be empty"),
            Self::NoEmployer => write!(f, "person must list at least one employer"),
            Self::EmptyEmployer(index) => {
                write!(f, "employer entry {index} has an empty company name")
            }
        }
    }
}

impl Error for PersonValidationError {}

#[cfg(test)]
mod tests {
    use super::{derive_tags, same_employer, Education, Person, PersonValidationError};

    #[test]
    fn validate_requires_name_and_employer() {
        let blank = Person::with_id("p1", "  ").with_employer("Acme", "CEO");
        assert_eq!(blank.validate(), Err(PersonValidationError::EmptyName));

        let jobless = Person::with_id("p1", "Ann");
        assert_eq!(jobless.validate(), Err(PersonValidationError::NoEmployer));

        let unnamed_employer = Person::with_id("p1", "Ann")
            .with_employer("Acme", "CEO")
            .with_employer(" ", "Advisor");
        assert_eq!(
            unnamed_employer.validate(),
            Err(PersonValidationError::EmptyEmployer(1))
        );

        let missing_id = Person::with_id("", "Ann").with_employer("Acme", "CEO");
        assert_eq!(missing_id.validate(), Err(PersonValidationError::MissingId));
    }

    #[test]
    fn employer_match_ignores_case_and_parenthetical_suffix() {
        assert!(same_employer("Acme Inc", "acme  inc (Beijing)"));
        assert!(!same_employer("Acme", "Globex"));
        assert!(!same_employer("", ""));
    }

    #[test]
    fn derive_tags_deduplicates_in_first_seen_order() {
        let mut person = Person::with_id("p1", "Ann")
            .with_employer("Acme", "CEO")
            .with_employer("acme", "Advisor")
            .with_education(Education::new("bachelor", "Tsinghua"));
        person.industry = Some("Robotics".to_string());
        person.current_city = Some(" ".to_string());

        assert_eq!(derive_tags(&person), vec!["Acme", "Tsinghua", "Robotics"]);
    }
}

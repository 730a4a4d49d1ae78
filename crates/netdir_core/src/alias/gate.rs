//! Privilege gate over the alias engine.

use crate::alias::engine::AliasEngine;
use crate::model::person::{Education, Employment, Person, PersonId};
use serde::Serialize;

/// Caller context supplied by the privilege-resolution layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewer {
    pub privileged: bool,
}

impl Viewer {
    pub fn privileged() -> Self {
        Self { privileged: true }
    }

    pub fn public() -> Self {
        Self { privileged: false }
    }
}

/// Returns whether names must be masked for this viewer.
pub fn should_alias(viewer: Viewer) -> bool {
    !viewer.privileged
}

/// Person projection safe to hand to rendering and chat layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonView {
    pub id: PersonId,
    /// Real name for privileged viewers, alias otherwise.
    pub display_name: String,
    pub employers: Vec<Employment>,
    pub education: Vec<Education>,
    pub industry: Option<String>,
    pub current_city: Option<String>,
    pub hometown: Option<String>,
    pub tags: Vec<String>,
    /// Only populated for privileged viewers.
    pub phone: Option<String>,
    /// Only populated for privileged viewers.
    pub email: Option<String>,
}

/// Single decision point for surfacing real names.
pub struct NameGate<'a> {
    engine: &'a AliasEngine,
}

impl<'a> NameGate<'a> {
    pub fn new(engine: &'a AliasEngine) -> Self {
        Self { engine }
    }

    /// Name to show `viewer`.
    pub fn display_name(&self, name: &str, viewer: Viewer) -> String {
        if should_alias(viewer) {
            self.engine.alias(name)
        } else {
            name.to_string()
        }
    }

    /// Projects `person` for `viewer`, masking identity and contact fields.
    pub fn project(&self, person: &Person, viewer: Viewer) -> PersonView {
        let (phone, email) = if should_alias(viewer) {
            (None, None)
        } else {
            (person.phone.clone(), person.email.clone())
        };

        PersonView {
            id: person.id.clone(),
            display_name: self.display_name(&person.name, viewer),
            employers: person.employers.clone(),
            education: person.education.clone(),
            industry: person.industry.clone(),
            current_city: person.current_city.clone(),
            hometown: person.hometown.clone(),
            tags: person.tags.clone(),
            phone,
            email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{should_alias, NameGate, Viewer};
    use crate::alias::engine::AliasEngine;
    use crate::model::person::Person;

    fn sample_person() -> Person {
        let mut person = Person::with_id("p1", "张三").with_employer("Acme", "CEO");
        person.phone = Some("13800000000".to_string());
        person.email = Some("zhang@example.com".to_string());
        person
    }

    #[test]
    fn public_viewer_sees_alias_and_no_contact_fields() {
        let engine = AliasEngine::new();
        let gate = NameGate::new(&engine);
        let view = gate.project(&sample_person(), Viewer::public());

        assert_eq!(view.display_name, engine.alias("张三"));
        assert_ne!(view.display_name, "张三");
        assert!(view.phone.is_none());
        assert!(view.email.is_none());
    }

    #[test]
    fn privileged_viewer_sees_real_identity() {
        let engine = AliasEngine::new();
        let gate = NameGate::new(&engine);
        let view = gate.project(&sample_person(), Viewer::privileged());

        assert_eq!(view.display_name, "张三");
        assert_eq!(view.phone.as_deref(), Some("13800000000"));
    }

    #[test]
    fn default_viewer_is_masked() {
        assert!(should_alias(Viewer::default()));
        assert!(!should_alias(Viewer::privileged()));
    }
}

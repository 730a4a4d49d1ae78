//! Company domain model.
//!
//! # Responsibility
//! - Define the canonical Company record and its partner references.
//! - Convert legacy partner shapes into one canonical variant at the boundary.
//!
//! # Invariants
//! - `name` is the identity key; two rows with the same normalized name are
//!   the same real-world entity.
//! - `suppliers`/`customers` only hold canonical [`SupplierRef`] values.

use crate::model::{non_blank, now_epoch_ms};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque Company identifier. Not the identity key (see module docs).
pub type CompanyId = String;

/// Structured partner entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerDetail {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Supplier or customer reference: a bare name or a structured entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SupplierRef {
    Name(String),
    Detailed(PartnerDetail),
}

impl SupplierRef {
    /// Partner display name regardless of variant.
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name.as_str(),
            Self::Detailed(detail) => detail.name.as_str(),
        }
    }

    /// Converts one legacy partner value into its canonical variant.
    ///
    /// Accepted shapes:
    /// - bare string: `"Foxconn"`
    /// - JSON-encoded object string: `"{\"name\":\"Foxconn\"}"`
    /// - structured object: `{"name": "Foxconn", "product": "PCB"}`
    ///
    /// Structured entries without extra detail collapse to `Name`, so equal
    /// partners compare equal during merge. Returns `None` for blank names
    /// and unsupported shapes.
    pub fn from_legacy(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.starts_with('{') {
                    if let Ok(parsed @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
                        return Self::from_legacy(&parsed);
                    }
                }
                non_blank(Some(trimmed)).map(|name| Self::Name(name.to_string()))
            }
            Value::Object(map) => {
                let name = non_blank(map.get("name").and_then(Value::as_str))?.to_string();
                let product = non_blank(map.get("product").and_then(Value::as_str))
                    .map(str::to_string);
                let note = non_blank(map.get("note").and_then(Value::as_str)).map(str::to_string);
                if product.is_none() && note.is_none() {
                    Some(Self::Name(name))
                } else {
                    Some(Self::Detailed(PartnerDetail {
                        name,
                        product,
                        note,
                    }))
                }
            }
            _ => None,
        }
    }
}

/// Normalizes a list of legacy partner values, dropping unusable entries.
pub fn normalize_partner_refs(values: &[Value]) -> Vec<SupplierRef> {
    values.iter().filter_map(SupplierRef::from_legacy).collect()
}

/// Canonical Company record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    /// Identity key once normalized.
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    /// Headcount band or similar free-text scale label.
    #[serde(default)]
    pub scale: Option<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub suppliers: Vec<SupplierRef>,
    #[serde(default)]
    pub customers: Vec<SupplierRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub headquarters: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Unix epoch milliseconds. Earliest record wins a merge.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Company {
    /// Creates a company with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name)
    }

    /// Creates a company with a caller-provided id.
    pub fn with_id(id: impl Into<CompanyId>, name: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: id.into(),
            name: name.into(),
            industry: None,
            scale: None,
            products: Vec::new(),
            suppliers: Vec::new(),
            customers: Vec::new(),
            description: None,
            headquarters: None,
            website: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates the fields required at the core boundary.
    pub fn validate(&self) -> Result<(), CompanyValidationError> {
        if self.id.trim().is_empty() {
            return Err(CompanyValidationError::MissingId);
        }
        if crate::resolve::normalize_company_name(&self.name).is_empty() {
            return Err(CompanyValidationError::EmptyName);
        }
        Ok(())
    }

    /// Normalized identity key for this record.
    pub fn normalized_name(&self) -> String {
        crate::resolve::normalize_company_name(&self.name)
    }
}

/// Company boundary validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyValidationError {
    MissingId,
    /// Name is blank after normalization.
    EmptyName,
}

impl Display for CompanyValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "company id must not be empty"),
            Self::EmptyName => write!(f, "company name must not be empty after normalization"),
        }
    }
}

impl Error for CompanyValidationError {}

#[cfg(test)]
mod tests {
    use super::{normalize_partner_refs, Company, CompanyValidationError, PartnerDetail, SupplierRef};
    use serde_json::json;

    #[test]
    fn legacy_shapes_converge_on_one_variant() {
        let refs = normalize_partner_refs(&[
            json!("Foxconn"),
            json!("{\"name\":\"Foxconn\"}"),
            json!({"name": "Foxconn"}),
            json!({"name": "BOE", "product": "panels"}),
            json!("  "),
            json!(42),
        ]);

        assert_eq!(
            refs,
            vec![
                SupplierRef::Name("Foxconn".to_string()),
                SupplierRef::Name("Foxconn".to_string()),
                SupplierRef::Name("Foxconn".to_string()),
                SupplierRef::Detailed(PartnerDetail {
                    name: "BOE".to_string(),
                    product: Some("panels".to_string()),
                    note: None,
                }),
            ]
        );
    }

    #[test]
    fn malformed_json_string_is_kept_as_name() {
        let parsed = SupplierRef::from_legacy(&json!("{not json")).expect("non-blank string");
        assert_eq!(parsed, SupplierRef::Name("{not json".to_string()));
    }

    #[test]
    fn validate_rejects_names_that_normalize_to_empty() {
        let company = Company::with_id("c1", " (Beijing) ");
        assert_eq!(company.validate(), Err(CompanyValidationError::EmptyName));
        assert!(Company::with_id("c1", "Acme").validate().is_ok());
    }
}

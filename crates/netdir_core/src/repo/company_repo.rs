//! Company repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `normalized_name` is recomputed from `name` on every write.
//! - Normalized-name lookups return the earliest-created match.
//! - List order is creation order: `created_at ASC`, then insertion order.

use crate::model::company::{Company, CompanyId};
use crate::repo::{ensure_connection_ready, from_json, to_json, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const COMPANY_SELECT_SQL: &str = "SELECT
    id,
    name,
    industry,
    scale,
    products_json,
    suppliers_json,
    customers_json,
    description,
    headquarters,
    website,
    created_at,
    updated_at
FROM companies";

/// Repository interface for Company persistence.
pub trait CompanyRepository {
    fn insert_company(&self, company: &Company) -> RepoResult<()>;
    /// Overwrites the row with the same id.
    fn update_company(&self, company: &Company) -> RepoResult<()>;
    fn get_company(&self, id: &str) -> RepoResult<Option<Company>>;
    /// Earliest-created company whose normalized name equals `normalized`.
    fn find_by_normalized_name(&self, normalized: &str) -> RepoResult<Option<Company>>;
    fn list_companies(&self) -> RepoResult<Vec<Company>>;
    /// Deletes the given ids, ignoring unknown ones. Returns rows removed.
    fn delete_companies(&self, ids: &[CompanyId]) -> RepoResult<usize>;
    /// Deletes every company. Returns rows removed.
    fn clear_companies(&self) -> RepoResult<usize>;
    /// Writes merged survivors and removes absorbed ids in one transaction.
    fn apply_resolution(&self, survivors: &[Company], absorbed: &[CompanyId])
        -> RepoResult<usize>;
}

/// SQLite-backed company repository.
pub struct SqliteCompanyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompanyRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["companies"])?;
        Ok(Self { conn })
    }
}

impl CompanyRepository for SqliteCompanyRepository<'_> {
    fn insert_company(&self, company: &Company) -> RepoResult<()> {
        company.validate()?;

        self.conn.execute(
            "INSERT INTO companies (
                id,
                name,
                normalized_name,
                industry,
                scale,
                products_json,
                suppliers_json,
                customers_json,
                description,
                headquarters,
                website,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                company.id.as_str(),
                company.name.as_str(),
                company.normalized_name(),
                company.industry.as_deref(),
                company.scale.as_deref(),
                to_json(&company.products, "companies.products_json")?,
                to_json(&company.suppliers, "companies.suppliers_json")?,
                to_json(&company.customers, "companies.customers_json")?,
                company.description.as_deref(),
                company.headquarters.as_deref(),
                company.website.as_deref(),
                company.created_at,
                company.updated_at,
            ],
        )?;

        Ok(())
    }

    fn update_company(&self, company: &Company) -> RepoResult<()> {
        company.validate()?;

        let changed = self.conn.execute(
            "UPDATE companies
             SET
                name = ?2,
                normalized_name = ?3,
                industry = ?4,
                scale = ?5,
                products_json = ?6,
                suppliers_json = ?7,
                customers_json = ?8,
                description = ?9,
                headquarters = ?10,
                website = ?11,
                created_at = ?12,
                updated_at = ?13
             WHERE id = ?1;",
            params![
                company.id.as_str(),
                company.name.as_str(),
                company.normalized_name(),
                company.industry.as_deref(),
                company.scale.as_deref(),
                to_json(&company.products, "companies.products_json")?,
                to_json(&company.suppliers, "companies.suppliers_json")?,
                to_json(&company.customers, "companies.customers_json")?,
                company.description.as_deref(),
                company.headquarters.as_deref(),
                company.website.as_deref(),
                company.created_at,
                company.updated_at,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::CompanyNotFound(company.id.clone()));
        }
        Ok(())
    }

    fn get_company(&self, id: &str) -> RepoResult<Option<Company>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMPANY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_company_row(row)?));
        }
        Ok(None)
    }

    fn find_by_normalized_name(&self, normalized: &str) -> RepoResult<Option<Company>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMPANY_SELECT_SQL}
             WHERE normalized_name = ?1
             ORDER BY created_at ASC, rowid ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([normalized])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_company_row(row)?));
        }
        Ok(None)
    }

    fn list_companies(&self) -> RepoResult<Vec<Company>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMPANY_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut companies = Vec::new();
        while let Some(row) = rows.next()? {
            companies.push(parse_company_row(row)?);
        }
        Ok(companies)
    }

    fn delete_companies(&self, ids: &[CompanyId]) -> RepoResult<usize> {
        let mut removed = 0;
        for id in ids {
            removed += self
                .conn
                .execute("DELETE FROM companies WHERE id = ?1;", [id.as_str()])?;
        }
        Ok(removed)
    }

    fn clear_companies(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM companies;", [])?)
    }

    fn apply_resolution(
        &self,
        survivors: &[Company],
        absorbed: &[CompanyId],
    ) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let removed = {
            let scoped = SqliteCompanyRepository { conn: &tx };
            for company in survivors {
                scoped.update_company(company)?;
            }
            scoped.delete_companies(absorbed)?
        };
        tx.commit()?;
        Ok(removed)
    }
}

fn parse_company_row(row: &Row<'_>) -> RepoResult<Company> {
    let products_json: String = row.get("products_json")?;
    let suppliers_json: String = row.get("suppliers_json")?;
    let customers_json: String = row.get("customers_json")?;

    let company = Company {
        id: row.get("id")?,
        name: row.get("name")?,
        industry: row.get("industry")?,
        scale: row.get("scale")?,
        products: from_json(&products_json, "companies.products_json")?,
        suppliers: from_json(&suppliers_json, "companies.suppliers_json")?,
        customers: from_json(&customers_json, "companies.customers_json")?,
        description: row.get("description")?,
        headquarters: row.get("headquarters")?,
        website: row.get("website")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    company.validate()?;
    Ok(company)
}

//! Person repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Writes are keyed strictly by `id` (last write wins).
//! - Deleting a person cascades to its relationship edges.
//! - List order is deterministic: `created_at ASC, id ASC`.

use crate::model::person::{Person, PersonId};
use crate::repo::{ensure_connection_ready, from_json, to_json, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    name,
    employers_json,
    education_json,
    industry,
    current_city,
    hometown,
    tags_json,
    phone,
    email,
    created_at,
    updated_at
FROM people";

/// Repository interface for Person persistence.
pub trait PersonRepository {
    /// Inserts or fully overwrites the person with the same id.
    fn upsert_person(&self, person: &Person) -> RepoResult<()>;
    fn get_person(&self, id: &str) -> RepoResult<Option<Person>>;
    fn list_people(&self) -> RepoResult<Vec<Person>>;
    /// Removes the person and, through the schema, its edges.
    fn delete_person(&self, id: &str) -> RepoResult<()>;
    /// Deletes every person whose id is not in `keep_ids`. Returns the count.
    fn retain_people(&self, keep_ids: &[PersonId]) -> RepoResult<usize>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["people"])?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn upsert_person(&self, person: &Person) -> RepoResult<()> {
        person.validate()?;

        self.conn.execute(
            "INSERT INTO people (
                id,
                name,
                employers_json,
                education_json,
                industry,
                current_city,
                hometown,
                tags_json,
                phone,
                email,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                employers_json = excluded.employers_json,
                education_json = excluded.education_json,
                industry = excluded.industry,
                current_city = excluded.current_city,
                hometown = excluded.hometown,
                tags_json = excluded.tags_json,
                phone = excluded.phone,
                email = excluded.email,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at;",
            params![
                person.id.as_str(),
                person.name.as_str(),
                to_json(&person.employers, "people.employers_json")?,
                to_json(&person.education, "people.education_json")?,
                person.industry.as_deref(),
                person.current_city.as_deref(),
                person.hometown.as_deref(),
                to_json(&person.tags, "people.tags_json")?,
                person.phone.as_deref(),
                person.email.as_deref(),
                person.created_at,
                person.updated_at,
            ],
        )?;

        Ok(())
    }

    fn get_person(&self, id: &str) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }
        Ok(None)
    }

    fn list_people(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }
        Ok(people)
    }

    fn delete_person(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM people WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::PersonNotFound(id.to_string()));
        }
        Ok(())
    }

    fn retain_people(&self, keep_ids: &[PersonId]) -> RepoResult<usize> {
        let mut stmt = self.conn.prepare("SELECT id FROM people;")?;
        let existing = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut removed = 0;
        for id in existing {
            if !keep_ids.contains(&id) {
                removed += self.conn.execute("DELETE FROM people WHERE id = ?1;", [&id])?;
            }
        }
        Ok(removed)
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let employers_json: String = row.get("employers_json")?;
    let education_json: String = row.get("education_json")?;
    let tags_json: String = row.get("tags_json")?;

    let person = Person {
        id: row.get("id")?,
        name: row.get("name")?,
        employers: from_json(&employers_json, "people.employers_json")?,
        education: from_json(&education_json, "people.education_json")?,
        industry: row.get("industry")?,
        current_city: row.get("current_city")?,
        hometown: row.get("hometown")?,
        tags: from_json(&tags_json, "people.tags_json")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    person.validate()?;
    Ok(person)
}

//! Relationship edge repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Rows are keyed by the sorted endpoint pair, so one pair holds at most
//!   one edge.
//! - Replacement operations run in one immediate transaction.
//! - Both endpoints must exist in `people`; deleting either removes the row.

use crate::model::edge::{pair_key, RelationType, RelationshipEdge};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const EDGE_SELECT_SQL: &str = "SELECT
    person_a,
    person_b,
    relation_type,
    strength,
    description,
    created_at,
    updated_at
FROM relationship_edges";

/// Repository interface for relationship edges.
pub trait EdgeRepository {
    fn list_edges(&self) -> RepoResult<Vec<RelationshipEdge>>;
    fn edges_for_person(&self, person_id: &str) -> RepoResult<Vec<RelationshipEdge>>;
    /// Replaces every edge touching `person_id` with `edges`.
    fn replace_edges_for_person(
        &self,
        person_id: &str,
        edges: &[RelationshipEdge],
    ) -> RepoResult<()>;
    /// Replaces the whole edge table with `edges`.
    fn replace_all_edges(&self, edges: &[RelationshipEdge]) -> RepoResult<()>;
}

/// SQLite-backed edge repository.
pub struct SqliteEdgeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEdgeRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["people", "relationship_edges"])?;
        Ok(Self { conn })
    }
}

impl EdgeRepository for SqliteEdgeRepository<'_> {
    fn list_edges(&self) -> RepoResult<Vec<RelationshipEdge>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EDGE_SELECT_SQL} ORDER BY pair_low ASC, pair_high ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut edges = Vec::new();
        while let Some(row) = rows.next()? {
            edges.push(parse_edge_row(row)?);
        }
        Ok(edges)
    }

    fn edges_for_person(&self, person_id: &str) -> RepoResult<Vec<RelationshipEdge>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EDGE_SELECT_SQL}
             WHERE person_a = ?1 OR person_b = ?1
             ORDER BY pair_low ASC, pair_high ASC;"
        ))?;
        let mut rows = stmt.query([person_id])?;
        let mut edges = Vec::new();
        while let Some(row) = rows.next()? {
            edges.push(parse_edge_row(row)?);
        }
        Ok(edges)
    }

    fn replace_edges_for_person(
        &self,
        person_id: &str,
        edges: &[RelationshipEdge],
    ) -> RepoResult<()> {
        if let Some(stray) = edges.iter().find(|edge| !edge.involves(person_id)) {
            return Err(RepoError::InvalidData(format!(
                "edge {}-{} does not involve person {person_id}",
                stray.person_a, stray.person_b
            )));
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "DELETE FROM relationship_edges WHERE person_a = ?1 OR person_b = ?1;",
            [person_id],
        )?;
        for edge in edges {
            write_edge(&tx, edge)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn replace_all_edges(&self, edges: &[RelationshipEdge]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM relationship_edges;", [])?;
        for edge in edges {
            write_edge(&tx, edge)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn write_edge(tx: &Transaction<'_>, edge: &RelationshipEdge) -> RepoResult<()> {
    if edge.person_a == edge.person_b {
        return Err(RepoError::InvalidData(format!(
            "self edge for person {}",
            edge.person_a
        )));
    }
    if !(0.0..=1.0).contains(&edge.strength) {
        return Err(RepoError::InvalidData(format!(
            "edge strength {} outside [0, 1]",
            edge.strength
        )));
    }

    let (pair_low, pair_high) = pair_key(&edge.person_a, &edge.person_b);
    tx.execute(
        "INSERT OR REPLACE INTO relationship_edges (
            pair_low,
            pair_high,
            person_a,
            person_b,
            relation_type,
            strength,
            description,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
        params![
            pair_low,
            pair_high,
            edge.person_a.as_str(),
            edge.person_b.as_str(),
            edge.relation.as_str(),
            edge.strength,
            edge.description.as_str(),
            edge.created_at,
            edge.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_edge_row(row: &Row<'_>) -> RepoResult<RelationshipEdge> {
    let relation_text: String = row.get("relation_type")?;
    let relation = RelationType::parse(&relation_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid relation type `{relation_text}` in relationship_edges.relation_type"
        ))
    })?;

    Ok(RelationshipEdge {
        person_a: row.get("person_a")?,
        person_b: row.get("person_b")?,
        relation,
        strength: row.get("strength")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

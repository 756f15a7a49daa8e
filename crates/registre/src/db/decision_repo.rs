//! Decision repository: CRUD and search over the `decisions` table.

use rusqlite::{params, Connection, Row};

use super::{select_where, DatabaseError, RecordTable};
use crate::error::ValidationError;
use crate::model::{Decision, DecisionFields, DecisionFilter, DecisionForm, RecordKind, Stored};
use crate::search::{Criteria, SearchFilter};

const PROJECTION: &str = "SELECT id, number, date, subject, observation FROM decisions";

const FULL: &str =
    "SELECT id, number, date, subject, observation, created_at, updated_at FROM decisions";

const ORDER: &str = "created_at ASC, rowid ASC";

fn decision_from_row(row: &Row<'_>) -> Result<Decision, rusqlite::Error> {
    Ok(Decision {
        id: row.get("id")?,
        number: row.get("number")?,
        fields: DecisionFields {
            date: row.get("date")?,
            subject: row.get("subject")?,
            observation: row.get("observation")?,
        },
    })
}

fn stored_from_row(row: &Row<'_>) -> Result<Stored<Decision>, rusqlite::Error> {
    Ok(Stored {
        record: decision_from_row(row)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Storage binding for decisions.
pub struct DecisionTable;

impl RecordTable for DecisionTable {
    const KIND: RecordKind = RecordKind::Decision;
    const TABLE: &'static str = "decisions";
    const NUMBER_COLUMN: &'static str = "number";

    type Record = Decision;
    type Form = DecisionForm;
    type Filter = DecisionFilter;

    fn build(id: String, number: String, form: DecisionForm) -> Result<Decision, ValidationError> {
        Ok(Decision {
            id,
            number,
            fields: form.into_fields()?,
        })
    }

    fn merge(record: &mut Decision, form: DecisionForm) -> Result<(), ValidationError> {
        form.merge_into(&mut record.fields)
    }

    fn id(record: &Decision) -> &str {
        &record.id
    }

    fn insert(conn: &Connection, row: &Stored<Decision>) -> Result<(), DatabaseError> {
        let decision = &row.record;
        conn.execute(
            "INSERT INTO decisions (id, number, date, subject, observation, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                decision.id,
                decision.number,
                decision.fields.date,
                decision.fields.subject,
                decision.fields.observation,
                row.created_at,
                row.updated_at,
            ],
        )?;
        Ok(())
    }

    fn update(conn: &Connection, row: &Stored<Decision>) -> Result<bool, DatabaseError> {
        let decision = &row.record;
        let changed = conn.execute(
            "UPDATE decisions SET date=?2, subject=?3, observation=?4, updated_at=?5 WHERE id=?1",
            params![
                decision.id,
                decision.fields.date,
                decision.fields.subject,
                decision.fields.observation,
                row.updated_at,
            ],
        )?;
        Ok(changed > 0)
    }

    fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Stored<Decision>>, DatabaseError> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", FULL))?;
        let mut rows = stmt.query_map(params![id], stored_from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    }

    fn list(conn: &Connection) -> Result<Vec<Stored<Decision>>, DatabaseError> {
        select_where(conn, FULL, ORDER, &Criteria::new(), stored_from_row)
    }

    fn delete(conn: &Connection, id: &str) -> Result<bool, DatabaseError> {
        let removed = conn.execute("DELETE FROM decisions WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn search(conn: &Connection, criteria: &Criteria) -> Result<Vec<Decision>, DatabaseError> {
        select_where(conn, PROJECTION, ORDER, criteria, decision_from_row)
    }
}

impl SearchFilter for DecisionFilter {
    fn criteria(&self) -> Result<Criteria, ValidationError> {
        Ok(Criteria::new()
            .contains("number", self.number.as_deref())
            .same_day("date", "date", self.date.as_deref())?
            .contains("subject", self.subject.as_deref()))
    }
}

//! Incoming mail repository: CRUD and search over the `incoming_mail` table.

use rusqlite::{params, Connection, Row};

use super::{select_where, DatabaseError, RecordTable};
use crate::error::ValidationError;
use crate::model::{IncomingFields, IncomingFilter, IncomingForm, IncomingMail, RecordKind, Stored};
use crate::search::{Criteria, SearchFilter};

const PROJECTION: &str = "SELECT id, bo_number, arrival_date, sender, recipient, subject, nature,
     orientation, reference, reference_number, reference_date FROM incoming_mail";

const FULL: &str = "SELECT id, bo_number, arrival_date, sender, recipient, subject, nature,
     orientation, reference, reference_number, reference_date, created_at, updated_at
     FROM incoming_mail";

const ORDER: &str = "created_at ASC, rowid ASC";

fn mail_from_row(row: &Row<'_>) -> Result<IncomingMail, rusqlite::Error> {
    Ok(IncomingMail {
        id: row.get("id")?,
        bo_number: row.get("bo_number")?,
        fields: IncomingFields {
            arrival_date: row.get("arrival_date")?,
            sender: row.get("sender")?,
            recipient: row.get("recipient")?,
            subject: row.get("subject")?,
            nature: row.get("nature")?,
            orientation: row.get("orientation")?,
            reference: row.get("reference")?,
            reference_number: row.get("reference_number")?,
            reference_date: row.get("reference_date")?,
        },
    })
}

fn stored_from_row(row: &Row<'_>) -> Result<Stored<IncomingMail>, rusqlite::Error> {
    Ok(Stored {
        record: mail_from_row(row)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Storage binding for incoming mail.
pub struct IncomingTable;

impl RecordTable for IncomingTable {
    const KIND: RecordKind = RecordKind::Incoming;
    const TABLE: &'static str = "incoming_mail";
    const NUMBER_COLUMN: &'static str = "bo_number";

    type Record = IncomingMail;
    type Form = IncomingForm;
    type Filter = IncomingFilter;

    fn build(id: String, number: String, form: IncomingForm) -> Result<IncomingMail, ValidationError> {
        Ok(IncomingMail {
            id,
            bo_number: number,
            fields: form.into_fields()?,
        })
    }

    fn merge(record: &mut IncomingMail, form: IncomingForm) -> Result<(), ValidationError> {
        form.merge_into(&mut record.fields)
    }

    fn id(record: &IncomingMail) -> &str {
        &record.id
    }

    fn insert(conn: &Connection, row: &Stored<IncomingMail>) -> Result<(), DatabaseError> {
        let mail = &row.record;
        let f = &mail.fields;
        conn.execute(
            "INSERT INTO incoming_mail (id, bo_number, arrival_date, sender, recipient, subject,
             nature, orientation, reference, reference_number, reference_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                mail.id,
                mail.bo_number,
                f.arrival_date,
                f.sender,
                f.recipient,
                f.subject,
                f.nature,
                f.orientation,
                f.reference,
                f.reference_number,
                f.reference_date,
                row.created_at,
                row.updated_at,
            ],
        )?;
        Ok(())
    }

    fn update(conn: &Connection, row: &Stored<IncomingMail>) -> Result<bool, DatabaseError> {
        let mail = &row.record;
        let f = &mail.fields;
        let changed = conn.execute(
            "UPDATE incoming_mail SET arrival_date=?2, sender=?3, recipient=?4, subject=?5,
             nature=?6, orientation=?7, reference=?8, reference_number=?9, reference_date=?10,
             updated_at=?11
             WHERE id=?1",
            params![
                mail.id,
                f.arrival_date,
                f.sender,
                f.recipient,
                f.subject,
                f.nature,
                f.orientation,
                f.reference,
                f.reference_number,
                f.reference_date,
                row.updated_at,
            ],
        )?;
        Ok(changed > 0)
    }

    fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Stored<IncomingMail>>, DatabaseError> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", FULL))?;
        let mut rows = stmt.query_map(params![id], stored_from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    }

    fn list(conn: &Connection) -> Result<Vec<Stored<IncomingMail>>, DatabaseError> {
        select_where(conn, FULL, ORDER, &Criteria::new(), stored_from_row)
    }

    fn delete(conn: &Connection, id: &str) -> Result<bool, DatabaseError> {
        let removed = conn.execute("DELETE FROM incoming_mail WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn search(conn: &Connection, criteria: &Criteria) -> Result<Vec<IncomingMail>, DatabaseError> {
        select_where(conn, PROJECTION, ORDER, criteria, mail_from_row)
    }
}

impl SearchFilter for IncomingFilter {
    fn criteria(&self) -> Result<Criteria, ValidationError> {
        Ok(Criteria::new()
            .contains("bo_number", self.bo_number.as_deref())
            .same_day("arrival_date", "date", self.date.as_deref())?
            .contains("sender", self.sender.as_deref())
            .contains("recipient", self.recipient.as_deref())
            .contains("subject", self.subject.as_deref()))
    }
}

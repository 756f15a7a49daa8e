//! Outgoing mail repository: CRUD and search over the `outgoing_mail` table.

use rusqlite::{params, Connection, Row};

use super::{select_where, DatabaseError, RecordTable};
use crate::error::ValidationError;
use crate::model::{OutgoingFields, OutgoingFilter, OutgoingForm, OutgoingMail, RecordKind, Stored};
use crate::search::{Criteria, SearchFilter};

const PROJECTION: &str =
    "SELECT id, number, date, sender, recipient, subject FROM outgoing_mail";

const FULL: &str = "SELECT id, number, date, sender, recipient, subject, created_at, updated_at
     FROM outgoing_mail";

const ORDER: &str = "created_at ASC, rowid ASC";

fn mail_from_row(row: &Row<'_>) -> Result<OutgoingMail, rusqlite::Error> {
    Ok(OutgoingMail {
        id: row.get("id")?,
        number: row.get("number")?,
        fields: OutgoingFields {
            date: row.get("date")?,
            sender: row.get("sender")?,
            recipient: row.get("recipient")?,
            subject: row.get("subject")?,
        },
    })
}

fn stored_from_row(row: &Row<'_>) -> Result<Stored<OutgoingMail>, rusqlite::Error> {
    Ok(Stored {
        record: mail_from_row(row)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Storage binding for outgoing mail.
pub struct OutgoingTable;

impl RecordTable for OutgoingTable {
    const KIND: RecordKind = RecordKind::Outgoing;
    const TABLE: &'static str = "outgoing_mail";
    const NUMBER_COLUMN: &'static str = "number";

    type Record = OutgoingMail;
    type Form = OutgoingForm;
    type Filter = OutgoingFilter;

    fn build(id: String, number: String, form: OutgoingForm) -> Result<OutgoingMail, ValidationError> {
        Ok(OutgoingMail {
            id,
            number,
            fields: form.into_fields()?,
        })
    }

    fn merge(record: &mut OutgoingMail, form: OutgoingForm) -> Result<(), ValidationError> {
        form.merge_into(&mut record.fields)
    }

    fn id(record: &OutgoingMail) -> &str {
        &record.id
    }

    fn insert(conn: &Connection, row: &Stored<OutgoingMail>) -> Result<(), DatabaseError> {
        let mail = &row.record;
        conn.execute(
            "INSERT INTO outgoing_mail (id, number, date, sender, recipient, subject,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                mail.id,
                mail.number,
                mail.fields.date,
                mail.fields.sender,
                mail.fields.recipient,
                mail.fields.subject,
                row.created_at,
                row.updated_at,
            ],
        )?;
        Ok(())
    }

    fn update(conn: &Connection, row: &Stored<OutgoingMail>) -> Result<bool, DatabaseError> {
        let mail = &row.record;
        let changed = conn.execute(
            "UPDATE outgoing_mail SET date=?2, sender=?3, recipient=?4, subject=?5, updated_at=?6
             WHERE id=?1",
            params![
                mail.id,
                mail.fields.date,
                mail.fields.sender,
                mail.fields.recipient,
                mail.fields.subject,
                row.updated_at,
            ],
        )?;
        Ok(changed > 0)
    }

    fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Stored<OutgoingMail>>, DatabaseError> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", FULL))?;
        let mut rows = stmt.query_map(params![id], stored_from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    }

    fn list(conn: &Connection) -> Result<Vec<Stored<OutgoingMail>>, DatabaseError> {
        select_where(conn, FULL, ORDER, &Criteria::new(), stored_from_row)
    }

    fn delete(conn: &Connection, id: &str) -> Result<bool, DatabaseError> {
        let removed = conn.execute("DELETE FROM outgoing_mail WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn search(conn: &Connection, criteria: &Criteria) -> Result<Vec<OutgoingMail>, DatabaseError> {
        select_where(conn, PROJECTION, ORDER, criteria, mail_from_row)
    }
}

impl SearchFilter for OutgoingFilter {
    fn criteria(&self) -> Result<Criteria, ValidationError> {
        Ok(Criteria::new()
            .contains("number", self.number.as_deref())
            .same_day("date", "date", self.date.as_deref())?
            .contains("sender", self.sender.as_deref())
            .contains("recipient", self.recipient.as_deref())
            .contains("subject", self.subject.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample_mail(id: &str, number: &str, day: u32) -> Stored<OutgoingMail> {
        let at = Utc.with_ymd_and_hms(2026, 2, day, 9, 0, 0).unwrap();
        Stored {
            record: OutgoingMail {
                id: id.to_string(),
                number: number.to_string(),
                fields: OutgoingFields {
                    date: NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
                    sender: "Mairie".to_string(),
                    recipient: "Préfecture".to_string(),
                    subject: format!("Rapport {}", day),
                },
            },
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_list_is_oldest_first() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            OutgoingTable::insert(conn, &sample_mail("late", "2", 20))?;
            OutgoingTable::insert(conn, &sample_mail("early", "1", 3))?;
            let ids: Vec<String> = OutgoingTable::list(conn)?
                .into_iter()
                .map(|m| m.record.id)
                .collect();
            assert_eq!(ids, vec!["early", "late"]);
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
    }

    #[test]
    fn test_search_by_day_and_recipient() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            OutgoingTable::insert(conn, &sample_mail("a", "1", 3))?;
            OutgoingTable::insert(conn, &sample_mail("b", "2", 4))?;

            let filter = OutgoingFilter {
                date: Some("2026-02-04T17:45:00".to_string()),
                recipient: Some("fecture".to_string()),
                ..Default::default()
            };
            let rows = OutgoingTable::search(conn, &filter.criteria().unwrap())?;
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].id, "b");
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            OutgoingTable::insert(conn, &sample_mail("a", "1", 3))?;
            assert!(OutgoingTable::delete(conn, "a")?);
            assert!(OutgoingTable::find_by_id(conn, "a")?.is_none());
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
    }
}

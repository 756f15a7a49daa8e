//! Sequential numbering of records, one counter per kind.
//!
//! A kind's counter is seeded once from the highest number already stored
//! (parsed permissively, so legacy values like `"12/2023"` count as 12 and
//! non-numeric values as nothing). After that every creation increments the
//! counter inside the same transaction that inserts the record, so two
//! creations never share a number and numbers are never reused.

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::{DatabaseError, RecordTable};

/// Parses the leading integer of a string the way a lenient form parser does:
/// optional leading whitespace, an optional sign, then digits. Returns `None`
/// when no digit follows. Saturates instead of overflowing.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Highest number stored for a kind; 0 for an empty table or when no stored
/// number parses to a positive integer.
pub fn max_stored_number<T: RecordTable>(conn: &Connection) -> Result<i64, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM {}", T::NUMBER_COLUMN, T::TABLE))?;
    let numbers = stmt.query_map([], |r| r.get::<_, String>(0))?;

    let mut max = 0;
    for number in numbers {
        if let Some(n) = parse_leading_int(&number?) {
            max = max.max(n);
        }
    }
    Ok(max)
}

fn counter_value(conn: &Connection, kind: &str) -> Result<Option<i64>, DatabaseError> {
    let value = conn
        .query_row(
            "SELECT value FROM number_counters WHERE kind = ?1",
            params![kind],
            |r| r.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Returns the number the next creation of this kind will receive, without
/// consuming it.
pub fn peek_next_number<T: RecordTable>(conn: &Connection) -> Result<i64, DatabaseError> {
    let last = match counter_value(conn, T::KIND.as_str())? {
        Some(value) => value,
        None => max_stored_number::<T>(conn)?,
    };
    Ok(last.saturating_add(1))
}

/// Consumes and returns the next number of this kind.
///
/// Must run inside the transaction that inserts the numbered record.
pub fn take_next_number<T: RecordTable>(conn: &Connection) -> Result<i64, DatabaseError> {
    let kind = T::KIND.as_str();
    if counter_value(conn, kind)?.is_none() {
        let seed = max_stored_number::<T>(conn)?;
        log::debug!("Seeding {} counter at {}", kind, seed);
        conn.execute(
            "INSERT INTO number_counters (kind, value) VALUES (?1, ?2)",
            params![kind, seed],
        )?;
    }

    let next = conn.query_row(
        "UPDATE number_counters SET value = value + 1 WHERE kind = ?1 RETURNING value",
        params![kind],
        |r| r.get(0),
    )?;
    Ok(next)
}

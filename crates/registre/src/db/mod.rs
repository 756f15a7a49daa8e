//! Database module for persistent storage.
//!
//! Uses rusqlite (SQLite) with a thread-safe `Database` handle.
//! All access is serialized through a `Mutex<Connection>`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod decision_repo;
pub mod error;
pub mod incoming_repo;
pub mod migrations;
pub mod outgoing_repo;

pub use decision_repo::DecisionTable;
pub use error::DatabaseError;
pub use incoming_repo::IncomingTable;
pub use outgoing_repo::OutgoingTable;

use crate::error::ValidationError;
use crate::model::{RecordKind, Stored};
use crate::search::{Criteria, SearchFilter};

/// Thread-safe database handle wrapping a single rusqlite connection.
///
/// Cloning is cheap (inner `Arc`). All access is serialized through
/// a `Mutex`, which is fine for SQLite (which serializes writes anyway).
/// WAL mode is enabled for concurrent read performance.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) the database at the given path and runs all
    /// pending migrations.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        migrations::run_all(&conn)?;

        log::info!("Database opened at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory database for testing. Runs all migrations.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        migrations::run_all(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Provides locked access to the underlying connection.
    pub fn with_conn<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DatabaseError>,
    {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&conn)
    }
}

/// Returns the canonical database path: `~/.registre/data/registre.db`.
pub fn default_database_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".registre").join("data").join("registre.db"))
}

/// Storage binding of one record kind.
///
/// Implemented by a marker type per table so the registry can run the same
/// create/update/search flow over every kind.
pub trait RecordTable: Send + Sync + 'static {
    const KIND: RecordKind;
    /// Table holding the records.
    const TABLE: &'static str;
    /// Column holding the sequential number.
    const NUMBER_COLUMN: &'static str;

    type Record: Clone + Serialize + Send + 'static;
    type Form: DeserializeOwned + Send + 'static;
    type Filter: SearchFilter + DeserializeOwned + Default + Send + 'static;

    /// Builds a new record from a validated form.
    fn build(id: String, number: String, form: Self::Form) -> Result<Self::Record, ValidationError>;

    /// Merges the fields present in `form` into `record`.
    fn merge(record: &mut Self::Record, form: Self::Form) -> Result<(), ValidationError>;

    fn id(record: &Self::Record) -> &str;

    fn insert(conn: &Connection, row: &Stored<Self::Record>) -> Result<(), DatabaseError>;

    /// Overwrites the editable columns. Returns `false` when no row has this id.
    fn update(conn: &Connection, row: &Stored<Self::Record>) -> Result<bool, DatabaseError>;

    fn find_by_id(conn: &Connection, id: &str)
        -> Result<Option<Stored<Self::Record>>, DatabaseError>;

    /// All rows, oldest first.
    fn list(conn: &Connection) -> Result<Vec<Stored<Self::Record>>, DatabaseError>;

    /// Returns `false` when no row has this id.
    fn delete(conn: &Connection, id: &str) -> Result<bool, DatabaseError>;

    /// Projection rows matching the criteria, oldest first.
    fn search(conn: &Connection, criteria: &Criteria) -> Result<Vec<Self::Record>, DatabaseError>;
}

/// Runs a `SELECT ... {where}` built from `criteria` and maps every row.
pub(crate) fn select_where<T>(
    conn: &Connection,
    select: &str,
    order_by: &str,
    criteria: &Criteria,
    map: impl FnMut(&rusqlite::Row<'_>) -> Result<T, rusqlite::Error>,
) -> Result<Vec<T>, DatabaseError> {
    let (where_clause, param_values) = criteria.to_sql();
    let sql = format!("{} {} ORDER BY {}", select, where_clause, order_by);
    let params_ref: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_ref.as_slice(), map)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let count: u32 =
                conn.query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))?;
            assert!(count > 0);
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
    }

    #[test]
    fn test_open_file_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("test.db");
        let db = Database::open(&path).unwrap();
        db.with_conn(|conn| {
            let count: u32 =
                conn.query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))?;
            assert!(count > 0);
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        {
            let db = Database::open(&path).unwrap();
            db.with_conn(|conn| {
                conn.execute(
                    "INSERT INTO number_counters (kind, value) VALUES ('decision', 4)",
                    [],
                )?;
                Ok::<_, DatabaseError>(())
            })
            .unwrap();
        }
        let db = Database::open(&path).unwrap();
        let value: i64 = db
            .with_conn(|conn| {
                Ok::<_, DatabaseError>(conn.query_row(
                    "SELECT value FROM number_counters WHERE kind = 'decision'",
                    [],
                    |r| r.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(value, 4);
    }

    #[test]
    fn test_default_database_path() {
        let path = default_database_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.ends_with("registre.db"));
        assert!(path.to_string_lossy().contains(".registre"));
    }

    #[test]
    fn test_database_is_clone() {
        let db = Database::open_in_memory().unwrap();
        let db2 = db.clone();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO decisions (id, number, date, subject, created_at, updated_at)
                 VALUES ('d1', '1', '2026-01-01', 'x', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
                [],
            )?;
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
        db2.with_conn(|conn| {
            let count: u32 = conn.query_row("SELECT COUNT(*) FROM decisions", [], |r| r.get(0))?;
            assert_eq!(count, 1);
            Ok::<_, DatabaseError>(())
        })
        .unwrap();
    }
}

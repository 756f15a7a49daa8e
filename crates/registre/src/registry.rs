//! The record store service.
//!
//! [`Registry`] runs the create/update/search flow shared by every record
//! kind on top of a [`RecordTable`] binding. Numbering and insertion happen
//! in one transaction under the connection lock.

use std::path::Path;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{Database, DatabaseError, IncomingTable, OutgoingTable, RecordTable};
use crate::error::{RegistreError, Result};
use crate::model::{Courier, CourierForm, Stored};
use crate::numbering;
use crate::search::SearchFilter;

/// Handle to the registry. Cloning is cheap.
#[derive(Clone)]
pub struct Registry {
    db: Database,
}

impl Registry {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Creates a record with a fresh id and the next number of its kind.
    ///
    /// The number is only consumed when the record is stored.
    pub fn create<T: RecordTable>(&self, form: T::Form) -> Result<Stored<T::Record>> {
        let stored = self.db.with_conn(|conn| {
            let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;
            let number = numbering::take_next_number::<T>(&tx)?;
            let record = T::build(Uuid::new_v4().to_string(), number.to_string(), form)?;
            let now = Utc::now();
            let stored = Stored {
                record,
                created_at: now,
                updated_at: now,
            };
            T::insert(&tx, &stored)?;
            tx.commit().map_err(DatabaseError::from)?;
            Ok::<_, RegistreError>(stored)
        })?;

        info!(kind = %T::KIND, id = T::id(&stored.record), "Record created");
        Ok(stored)
    }

    pub fn get<T: RecordTable>(&self, id: &str) -> Result<Stored<T::Record>> {
        self.db
            .with_conn(|conn| T::find_by_id(conn, id))?
            .ok_or_else(|| RegistreError::not_found(T::KIND, id))
    }

    /// Merges the fields present in `form` into the stored record.
    pub fn update<T: RecordTable>(&self, id: &str, form: T::Form) -> Result<Stored<T::Record>> {
        let stored = self.db.with_conn(|conn| {
            let mut stored = T::find_by_id(conn, id)?
                .ok_or_else(|| RegistreError::not_found(T::KIND, id))?;
            T::merge(&mut stored.record, form)?;
            stored.updated_at = Utc::now();
            if !T::update(conn, &stored)? {
                return Err(RegistreError::not_found(T::KIND, id));
            }
            Ok(stored)
        })?;

        info!(kind = %T::KIND, id, "Record updated");
        Ok(stored)
    }

    pub fn list<T: RecordTable>(&self) -> Result<Vec<Stored<T::Record>>> {
        Ok(self.db.with_conn(T::list)?)
    }

    pub fn delete<T: RecordTable>(&self, id: &str) -> Result<()> {
        let removed = self.db.with_conn(|conn| T::delete(conn, id))?;
        if !removed {
            return Err(RegistreError::not_found(T::KIND, id));
        }
        info!(kind = %T::KIND, id, "Record deleted");
        Ok(())
    }

    pub fn search<T: RecordTable>(&self, filter: &T::Filter) -> Result<Vec<T::Record>> {
        let criteria = filter.criteria()?;
        let rows = self.db.with_conn(|conn| T::search(conn, &criteria))?;
        debug!(kind = %T::KIND, criteria = criteria.len(), matches = rows.len(), "Search");
        Ok(rows)
    }

    /// The number the next created record of this kind will receive.
    pub fn peek_next_number<T: RecordTable>(&self) -> Result<String> {
        let next = self.db.with_conn(numbering::peek_next_number::<T>)?;
        Ok(next.to_string())
    }

    pub fn create_courier(&self, form: CourierForm) -> Result<Courier> {
        Ok(match form {
            CourierForm::Incoming(form) => Courier::Incoming(self.create::<IncomingTable>(form)?),
            CourierForm::Outgoing(form) => Courier::Outgoing(self.create::<OutgoingTable>(form)?),
        })
    }

    /// Incoming and outgoing mail together, oldest first.
    pub fn list_couriers(&self) -> Result<Vec<Courier>> {
        let mut couriers: Vec<Courier> = self
            .list::<IncomingTable>()?
            .into_iter()
            .map(Courier::Incoming)
            .chain(self.list::<OutgoingTable>()?.into_iter().map(Courier::Outgoing))
            .collect();
        couriers.sort_by_key(Courier::created_at);
        Ok(couriers)
    }
}

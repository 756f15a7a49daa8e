//! Search contract shared by the three record kinds.
//!
//! A filter is turned into [`Criteria`]: a conjunction of case-sensitive
//! substring matches on text columns and exact calendar-day matches on date
//! columns. Blank values impose no constraint, so an empty filter selects
//! the whole collection.

use chrono::NaiveDate;
use rusqlite::types::ToSql;

use crate::error::ValidationError;
use crate::model::parse_day;

/// A single constraint on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// The column contains `needle` as a substring, case-sensitively.
    Contains {
        column: &'static str,
        needle: String,
    },
    /// The column holds exactly this calendar day.
    SameDay {
        column: &'static str,
        day: NaiveDate,
    },
}

/// An ANDed set of criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    items: Vec<Criterion>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a substring constraint unless the value is blank.
    pub fn contains(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(needle) = value.filter(|v| !v.trim().is_empty()) {
            self.items.push(Criterion::Contains {
                column,
                needle: needle.to_string(),
            });
        }
        self
    }

    /// Adds a calendar-day constraint unless the value is blank.
    ///
    /// `field` names the filter key in the error when the value is not a date.
    pub fn same_day(
        mut self,
        column: &'static str,
        field: &'static str,
        value: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if let Some(raw) = value.filter(|v| !v.trim().is_empty()) {
            let day = parse_day(raw).ok_or_else(|| ValidationError::InvalidDate {
                field,
                value: raw.to_string(),
            })?;
            self.items.push(Criterion::SameDay { column, day });
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.items.iter()
    }

    /// Renders the criteria as a `WHERE` clause with positional parameters.
    ///
    /// Substring matching uses `instr`, which is case-sensitive and treats
    /// `%` and `_` literally, unlike SQLite's `LIKE`.
    pub(crate) fn to_sql(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions = Vec::new();
        let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();

        for criterion in &self.items {
            match criterion {
                Criterion::Contains { column, needle } => {
                    conditions.push(format!("instr({}, ?{}) > 0", column, param_values.len() + 1));
                    param_values.push(Box::new(needle.clone()));
                }
                Criterion::SameDay { column, day } => {
                    conditions.push(format!("date({}) = ?{}", column, param_values.len() + 1));
                    param_values.push(Box::new(day.format("%Y-%m-%d").to_string()));
                }
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        (where_clause, param_values)
    }
}

/// A kind-specific filter that knows how to map itself onto storage columns.
pub trait SearchFilter {
    fn criteria(&self) -> Result<Criteria, ValidationError>;
}

//! Domain records of the registry.
//!
//! Each record kind comes as three shapes:
//! - the record itself (`IncomingMail`, ...), which is also the search projection
//! - a form (`IncomingForm`, ...) used both for creation and for partial updates
//! - a filter (`IncomingFilter`, ...) holding the optional search criteria
//!
//! Stored records are wrapped in [`Stored`], which adds the server timestamps.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

pub mod decision;
pub mod incoming;
pub mod outgoing;

pub use decision::{Decision, DecisionFields, DecisionFilter, DecisionForm};
pub use incoming::{IncomingFields, IncomingFilter, IncomingForm, IncomingMail};
pub use outgoing::{OutgoingFields, OutgoingFilter, OutgoingForm, OutgoingMail};

/// The three kinds of records kept by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Incoming,
    Outgoing,
    Decision,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [Self::Incoming, Self::Outgoing, Self::Decision];

    /// Stable key used in storage and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
            Self::Decision => "decision",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Incoming => "incoming mail",
            Self::Outgoing => "outgoing mail",
            Self::Decision => "decision",
        };
        f.write_str(label)
    }
}

/// Direction of a mail item. Accepts the legacy French route names as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourierType {
    #[serde(alias = "arrivee")]
    Incoming,
    #[serde(alias = "depart")]
    Outgoing,
}

impl CourierType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "incoming" | "arrivee" => Some(Self::Incoming),
            "outgoing" | "depart" => Some(Self::Outgoing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        RecordKind::from(*self).as_str()
    }
}

impl From<CourierType> for RecordKind {
    fn from(value: CourierType) -> Self {
        match value {
            CourierType::Incoming => RecordKind::Incoming,
            CourierType::Outgoing => RecordKind::Outgoing,
        }
    }
}

/// A persisted record together with its server timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    #[serde(flatten)]
    pub record: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A mail item of either direction, tagged with its `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Courier {
    Incoming(Stored<IncomingMail>),
    Outgoing(Stored<OutgoingMail>),
}

impl Courier {
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Incoming(mail) => mail.created_at,
            Self::Outgoing(mail) => mail.created_at,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Incoming(mail) => &mail.record.id,
            Self::Outgoing(mail) => &mail.record.id,
        }
    }
}

/// Creation payload of `POST /couriers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CourierForm {
    #[serde(alias = "arrivee")]
    Incoming(IncomingForm),
    #[serde(alias = "depart")]
    Outgoing(OutgoingForm),
}

/// Parses a calendar day, discarding any time of day.
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, RFC 3339 timestamps (the day is taken
/// in the timestamp's own offset) and naive `YYYY-MM-DDTHH:MM:SS` timestamps.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return Some(day);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.date())
}

/// Returns the value unless it is blank.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn required_text(
    value: Option<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    present(value).ok_or(ValidationError::MissingField { field })
}

pub(crate) fn required_day(
    value: Option<String>,
    field: &'static str,
) -> Result<NaiveDate, ValidationError> {
    let raw = required_text(value, field)?;
    parse_day(&raw).ok_or(ValidationError::InvalidDate { field, value: raw })
}

pub(crate) fn optional_day(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<NaiveDate>, ValidationError> {
    match present(value) {
        None => Ok(None),
        Some(raw) => parse_day(&raw)
            .map(Some)
            .ok_or(ValidationError::InvalidDate { field, value: raw }),
    }
}

/// Overwrites a required text field when the form carries a value for it.
pub(crate) fn merge_required_text(
    target: &mut String,
    value: Option<String>,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.is_some() {
        *target = required_text(value, field)?;
    }
    Ok(())
}

/// Overwrites an optional text field; a blank value clears it.
pub(crate) fn merge_optional_text(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = present(value);
    }
}

pub(crate) fn merge_required_day(
    target: &mut NaiveDate,
    value: Option<String>,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.is_some() {
        *target = required_day(value, field)?;
    }
    Ok(())
}

pub(crate) fn merge_optional_day(
    target: &mut Option<NaiveDate>,
    value: Option<String>,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.is_some() {
        *target = optional_day(value, field)?;
    }
    Ok(())
}

/// Deserializes a scalar JSON value (string, number or bool) into a string.
///
/// Forms and filters come from loosely typed UI code, which sends numbers
/// as JSON numbers or strings depending on the widget.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

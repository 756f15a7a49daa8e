//! Plain projections of records for the PDF and print renderers.
//!
//! [`ExportTable`] lists many records of one kind; [`DetailSheet`] describes
//! a single record. Both carry display strings only: labels come from
//! [`crate::i18n`], dates are rendered `DD/MM/YYYY`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::i18n::{field_label, Language, Message};
use crate::model::{Decision, IncomingMail, OutgoingMail, RecordKind};

/// Table cell placeholder for a missing date.
pub const MISSING_DATE: &str = "N/A";
/// Table cell placeholder for missing text.
pub const MISSING_TEXT: &str = "-";

const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn format_day(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// The raw value of one field, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Text(Option<&'a str>),
    Day(Option<NaiveDate>),
}

impl<'a> Cell<'a> {
    fn text(value: &'a str) -> Self {
        Self::Text(Some(value))
    }

    fn opt_text(value: &'a Option<String>) -> Self {
        Self::Text(value.as_deref())
    }

    fn render(&self, missing_text: &str, missing_date: &str) -> String {
        match self {
            Self::Text(Some(v)) if !v.trim().is_empty() => (*v).to_string(),
            Self::Text(_) => missing_text.to_string(),
            Self::Day(Some(day)) => format_day(*day),
            Self::Day(None) => missing_date.to_string(),
        }
    }
}

/// A record that can be laid out as a table row or a detail sheet.
pub trait Exportable {
    const KIND: RecordKind;

    /// Field keys in display order.
    const COLUMNS: &'static [&'static str];

    fn number(&self) -> &str;

    /// Value of the field named by one of [`Self::COLUMNS`].
    fn cell(&self, column: &str) -> Cell<'_>;
}

impl Exportable for IncomingMail {
    const KIND: RecordKind = RecordKind::Incoming;
    const COLUMNS: &'static [&'static str] = &[
        "bo_number",
        "arrival_date",
        "sender",
        "recipient",
        "subject",
        "nature",
        "orientation",
        "reference",
        "reference_number",
        "reference_date",
    ];

    fn number(&self) -> &str {
        &self.bo_number
    }

    fn cell(&self, column: &str) -> Cell<'_> {
        let f = &self.fields;
        match column {
            "bo_number" => Cell::text(&self.bo_number),
            "arrival_date" => Cell::Day(Some(f.arrival_date)),
            "sender" => Cell::text(&f.sender),
            "recipient" => Cell::text(&f.recipient),
            "subject" => Cell::text(&f.subject),
            "nature" => Cell::opt_text(&f.nature),
            "orientation" => Cell::opt_text(&f.orientation),
            "reference" => Cell::opt_text(&f.reference),
            "reference_number" => Cell::opt_text(&f.reference_number),
            "reference_date" => Cell::Day(f.reference_date),
            _ => Cell::Text(None),
        }
    }
}

impl Exportable for OutgoingMail {
    const KIND: RecordKind = RecordKind::Outgoing;
    const COLUMNS: &'static [&'static str] = &["number", "date", "sender", "recipient", "subject"];

    fn number(&self) -> &str {
        &self.number
    }

    fn cell(&self, column: &str) -> Cell<'_> {
        match column {
            "number" => Cell::text(&self.number),
            "date" => Cell::Day(Some(self.fields.date)),
            "sender" => Cell::text(&self.fields.sender),
            "recipient" => Cell::text(&self.fields.recipient),
            "subject" => Cell::text(&self.fields.subject),
            _ => Cell::Text(None),
        }
    }
}

impl Exportable for Decision {
    const KIND: RecordKind = RecordKind::Decision;
    const COLUMNS: &'static [&'static str] = &["number", "date", "subject", "observation"];

    fn number(&self) -> &str {
        &self.number
    }

    fn cell(&self, column: &str) -> Cell<'_> {
        match column {
            "number" => Cell::text(&self.number),
            "date" => Cell::Day(Some(self.fields.date)),
            "subject" => Cell::text(&self.fields.subject),
            "observation" => Cell::opt_text(&self.fields.observation),
            _ => Cell::Text(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub header: String,
}

/// A list of records of one kind, ready for tabular rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTable {
    pub title: String,
    pub language: Language,
    pub generated_on: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn build<'a, R, I>(records: I, lang: Language, today: NaiveDate) -> Self
    where
        R: Exportable + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let columns = R::COLUMNS
            .iter()
            .map(|key| Column {
                key: (*key).to_string(),
                header: field_label(key, lang).to_string(),
            })
            .collect();

        let rows = records
            .into_iter()
            .map(|record| {
                R::COLUMNS
                    .iter()
                    .map(|key| record.cell(key).render(MISSING_TEXT, MISSING_DATE))
                    .collect()
            })
            .collect();

        Self {
            title: list_title(R::KIND, lang).to_string(),
            language: lang,
            generated_on: format_day(today),
            columns,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn list_title(kind: RecordKind, lang: Language) -> &'static str {
    match (kind, lang) {
        (RecordKind::Incoming, Language::Fr) => "Liste des Courriers Arrivée",
        (RecordKind::Incoming, Language::Ar) => "قائمة المراسلات الواردة",
        (RecordKind::Outgoing, Language::Fr) => "Liste des Courriers Départ",
        (RecordKind::Outgoing, Language::Ar) => "قائمة المراسلات الصادرة",
        (RecordKind::Decision, Language::Fr) => "Liste des Décisions",
        (RecordKind::Decision, Language::Ar) => "قائمة القرارات",
    }
}

fn sheet_title(kind: RecordKind, lang: Language) -> &'static str {
    match (kind, lang) {
        (RecordKind::Decision, Language::Fr) => "Détails de la décision",
        (RecordKind::Decision, Language::Ar) => "تفاصيل القرار",
        (_, Language::Fr) => "Détails du courrier",
        (_, Language::Ar) => "تفاصيل المراسلة",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

/// One record laid out as label/value pairs for printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSheet {
    pub title: String,
    pub language: Language,
    pub number: String,
    pub rows: Vec<DetailRow>,
}

impl DetailSheet {
    pub fn build<R: Exportable>(record: &R, lang: Language) -> Self {
        let missing = Message::NotSpecified.text(lang);
        let rows = R::COLUMNS
            .iter()
            .map(|key| DetailRow {
                label: field_label(key, lang).to_string(),
                value: record.cell(key).render(missing, missing),
            })
            .collect();

        Self {
            title: sheet_title(R::KIND, lang).to_string(),
            language: lang,
            number: record.number().to_string(),
            rows,
        }
    }
}

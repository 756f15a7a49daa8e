//! Outgoing mail sent by the office.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{lenient_string, merge_required_day, merge_required_text, required_day, required_text};
use crate::error::ValidationError;

/// An outgoing mail item. This is also the 6-column search projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub id: String,
    pub number: String,
    #[serde(flatten)]
    pub fields: OutgoingFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingFields {
    pub date: NaiveDate,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingForm {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recipient: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: Option<String>,
}

impl OutgoingForm {
    pub fn into_fields(self) -> Result<OutgoingFields, ValidationError> {
        Ok(OutgoingFields {
            date: required_day(self.date, "date")?,
            sender: required_text(self.sender, "sender")?,
            recipient: required_text(self.recipient, "recipient")?,
            subject: required_text(self.subject, "subject")?,
        })
    }

    pub fn merge_into(self, fields: &mut OutgoingFields) -> Result<(), ValidationError> {
        let mut merged = fields.clone();
        merge_required_day(&mut merged.date, self.date, "date")?;
        merge_required_text(&mut merged.sender, self.sender, "sender")?;
        merge_required_text(&mut merged.recipient, self.recipient, "recipient")?;
        merge_required_text(&mut merged.subject, self.subject, "subject")?;
        *fields = merged;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingFilter {
    #[serde(default, alias = "numéro", alias = "numero", deserialize_with = "lenient_string")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, alias = "expéditeur", alias = "expediteur", deserialize_with = "lenient_string")]
    pub sender: Option<String>,
    #[serde(default, alias = "destinataire", deserialize_with = "lenient_string")]
    pub recipient: Option<String>,
    #[serde(default, alias = "objet", deserialize_with = "lenient_string")]
    pub subject: Option<String>,
}

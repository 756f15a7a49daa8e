//! Administrative decisions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    lenient_string, merge_optional_text, merge_required_day, merge_required_text, present,
    required_day, required_text,
};
use crate::error::ValidationError;

/// A decision record. This is also the 5-column search projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub number: String,
    #[serde(flatten)]
    pub fields: DecisionFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionFields {
    pub date: NaiveDate,
    pub subject: String,
    pub observation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionForm {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub observation: Option<String>,
}

impl DecisionForm {
    pub fn into_fields(self) -> Result<DecisionFields, ValidationError> {
        Ok(DecisionFields {
            date: required_day(self.date, "date")?,
            subject: required_text(self.subject, "subject")?,
            observation: present(self.observation),
        })
    }

    pub fn merge_into(self, fields: &mut DecisionFields) -> Result<(), ValidationError> {
        let mut merged = fields.clone();
        merge_required_day(&mut merged.date, self.date, "date")?;
        merge_required_text(&mut merged.subject, self.subject, "subject")?;
        merge_optional_text(&mut merged.observation, self.observation);
        *fields = merged;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionFilter {
    #[serde(default, alias = "numéro", alias = "numero", deserialize_with = "lenient_string")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, alias = "objet", deserialize_with = "lenient_string")]
    pub subject: Option<String>,
}

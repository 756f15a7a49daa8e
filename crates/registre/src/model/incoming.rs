//! Incoming mail registered by the "Bureau d'Ordre".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    lenient_string, merge_optional_day, merge_optional_text, merge_required_day,
    merge_required_text, optional_day, present, required_day, required_text,
};
use crate::error::ValidationError;

/// An incoming mail item. This is also the 11-column search projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingMail {
    pub id: String,
    pub bo_number: String,
    #[serde(flatten)]
    pub fields: IncomingFields,
}

/// The editable content of an incoming mail item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingFields {
    pub arrival_date: NaiveDate,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub nature: Option<String>,
    /// Department code the item is routed to.
    pub orientation: Option<String>,
    pub reference: Option<String>,
    pub reference_number: Option<String>,
    pub reference_date: Option<NaiveDate>,
}

/// Form payload for creating or updating incoming mail.
///
/// Every field is optional at the wire level; [`IncomingForm::into_fields`]
/// enforces the required ones on creation. The arrival date is read from
/// `arrival_date` or `date`; a body carrying both is rejected as malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomingForm {
    #[serde(default, alias = "date", deserialize_with = "lenient_string")]
    pub arrival_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recipient: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nature: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub orientation: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reference: Option<String>,
    #[serde(default, alias = "referenceNumber", deserialize_with = "lenient_string")]
    pub reference_number: Option<String>,
    #[serde(default, alias = "referenceDate", deserialize_with = "lenient_string")]
    pub reference_date: Option<String>,
}

impl IncomingForm {
    pub fn into_fields(self) -> Result<IncomingFields, ValidationError> {
        Ok(IncomingFields {
            arrival_date: required_day(self.arrival_date, "arrival_date")?,
            sender: required_text(self.sender, "sender")?,
            recipient: required_text(self.recipient, "recipient")?,
            subject: required_text(self.subject, "subject")?,
            nature: present(self.nature),
            orientation: present(self.orientation),
            reference: present(self.reference),
            reference_number: present(self.reference_number),
            reference_date: optional_day(self.reference_date, "reference_date")?,
        })
    }

    /// Applies the fields present in the form. On error `fields` is left untouched.
    pub fn merge_into(self, fields: &mut IncomingFields) -> Result<(), ValidationError> {
        let mut merged = fields.clone();
        merge_required_day(&mut merged.arrival_date, self.arrival_date, "arrival_date")?;
        merge_required_text(&mut merged.sender, self.sender, "sender")?;
        merge_required_text(&mut merged.recipient, self.recipient, "recipient")?;
        merge_required_text(&mut merged.subject, self.subject, "subject")?;
        merge_optional_text(&mut merged.nature, self.nature);
        merge_optional_text(&mut merged.orientation, self.orientation);
        merge_optional_text(&mut merged.reference, self.reference);
        merge_optional_text(&mut merged.reference_number, self.reference_number);
        merge_optional_day(&mut merged.reference_date, self.reference_date, "reference_date")?;
        *fields = merged;
        Ok(())
    }
}

/// Search criteria for incoming mail. Accepts the French keys sent by the UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomingFilter {
    #[serde(default, alias = "numéro", alias = "numero", deserialize_with = "lenient_string")]
    pub bo_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, alias = "expéditeur", alias = "expediteur", deserialize_with = "lenient_string")]
    pub sender: Option<String>,
    #[serde(default, alias = "destinataire", deserialize_with = "lenient_string")]
    pub recipient: Option<String>,
    #[serde(default, alias = "objet", deserialize_with = "lenient_string")]
    pub subject: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> IncomingForm {
        serde_json::from_value(json!({
            "date": "2024-03-05T09:00:00Z",
            "sender": "ACME",
            "recipient": "Mairie",
            "subject": "Demande",
            "nature": "",
            "referenceNumber": 42
        }))
        .unwrap()
    }

    #[test]
    fn test_form_into_fields() {
        let fields = form().into_fields().unwrap();
        assert_eq!(fields.arrival_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(fields.sender, "ACME");
        assert_eq!(fields.nature, None);
        assert_eq!(fields.reference_number.as_deref(), Some("42"));
        assert_eq!(fields.reference_date, None);
    }

    #[test]
    fn test_form_missing_required_field() {
        let mut f = form();
        f.recipient = None;
        let err = f.into_fields().unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "recipient" });
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let mut fields = form().into_fields().unwrap();
        let patch = IncomingForm {
            subject: Some("Relance".into()),
            orientation: Some("RH".into()),
            ..Default::default()
        };
        patch.merge_into(&mut fields).unwrap();
        assert_eq!(fields.subject, "Relance");
        assert_eq!(fields.orientation.as_deref(), Some("RH"));
        assert_eq!(fields.sender, "ACME");
        assert_eq!(fields.reference_number.as_deref(), Some("42"));
    }

    #[test]
    fn test_merge_failure_leaves_fields_untouched() {
        let mut fields = form().into_fields().unwrap();
        let before = fields.clone();
        let patch = IncomingForm {
            subject: Some("Relance".into()),
            reference_date: Some("not a date".into()),
            ..Default::default()
        };
        assert!(patch.merge_into(&mut fields).is_err());
        assert_eq!(fields, before);
    }

    #[test]
    fn test_filter_accepts_french_keys() {
        let filter: IncomingFilter = serde_json::from_value(json!({
            "numéro": 12,
            "expéditeur": "ACME",
            "objet": "foo",
            "unknown": "ignored"
        }))
        .unwrap();
        assert_eq!(filter.bo_number.as_deref(), Some("12"));
        assert_eq!(filter.sender.as_deref(), Some("ACME"));
        assert_eq!(filter.subject.as_deref(), Some("foo"));
        assert_eq!(filter.date, None);
    }

    #[test]
    fn test_filter_date_key_is_canonical() {
        let filter: IncomingFilter =
            serde_json::from_value(json!({ "arrival_date": "2024-03-05" })).unwrap();
        assert_eq!(filter.date, None);

        let filter: IncomingFilter =
            serde_json::from_value(json!({ "date": "2024-03-05" })).unwrap();
        assert_eq!(filter.date.as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_form_rejects_both_date_keys() {
        let result = serde_json::from_value::<IncomingForm>(json!({
            "date": "2024-03-05",
            "arrival_date": "2024-03-06"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_mail_serializes_flat() {
        let mail = IncomingMail {
            id: "m1".into(),
            bo_number: "1".into(),
            fields: form().into_fields().unwrap(),
        };
        let value = serde_json::to_value(&mail).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 11);
        assert_eq!(object["arrival_date"], "2024-03-05");
        assert_eq!(object["nature"], serde_json::Value::Null);
    }
}

//! Builders for request bodies and forms.

#![allow(dead_code)]

use serde_json::{json, Map, Value};

use registre::{DecisionForm, IncomingForm, OutgoingForm};

/// Builder for incoming mail payloads, prefilled with valid required fields.
pub struct IncomingBuilder {
    fields: Map<String, Value>,
}

impl IncomingBuilder {
    pub fn new() -> Self {
        let mut fields = Map::new();
        fields.insert("date".into(), json!("2026-01-05"));
        fields.insert("sender".into(), json!("ACME"));
        fields.insert("recipient".into(), json!("Mairie"));
        fields.insert("subject".into(), json!("Demande"));
        Self { fields }
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.fields.remove(key);
        self
    }

    /// Body for `POST /couriers`.
    pub fn courier(self) -> Value {
        let mut fields = self.fields;
        fields.insert("type".into(), json!("incoming"));
        Value::Object(fields)
    }

    pub fn body(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn form(self) -> IncomingForm {
        serde_json::from_value(self.body()).expect("Invalid incoming form")
    }
}

impl Default for IncomingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for outgoing mail payloads.
pub struct OutgoingBuilder {
    fields: Map<String, Value>,
}

impl OutgoingBuilder {
    pub fn new() -> Self {
        let mut fields = Map::new();
        fields.insert("date".into(), json!("2026-01-06"));
        fields.insert("sender".into(), json!("Mairie"));
        fields.insert("recipient".into(), json!("Préfecture"));
        fields.insert("subject".into(), json!("Rapport"));
        Self { fields }
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn courier(self) -> Value {
        let mut fields = self.fields;
        fields.insert("type".into(), json!("outgoing"));
        Value::Object(fields)
    }

    pub fn body(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn form(self) -> OutgoingForm {
        serde_json::from_value(self.body()).expect("Invalid outgoing form")
    }
}

impl Default for OutgoingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for decision payloads.
pub struct DecisionBuilder {
    fields: Map<String, Value>,
}

impl DecisionBuilder {
    pub fn new() -> Self {
        let mut fields = Map::new();
        fields.insert("date".into(), json!("2026-02-01"));
        fields.insert("subject".into(), json!("Budget"));
        Self { fields }
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn body(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn form(self) -> DecisionForm {
        serde_json::from_value(self.body()).expect("Invalid decision form")
    }
}

impl Default for DecisionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

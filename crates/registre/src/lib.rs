pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod i18n;
pub mod model;
pub mod numbering;
pub mod registry;
pub mod search;

pub use api::{cors_layer, router, ApiError, ErrorBody, HealthStatus};
pub use client::{ApiConfig, ClientError, RegistreClient};
pub use config::{load_config, load_config_or_default, Config};
pub use db::{Database, DatabaseError, DecisionTable, IncomingTable, OutgoingTable, RecordTable};
pub use error::{ConfigError, RegistreError, Result, ValidationError};
pub use export::{DetailSheet, ExportTable, Exportable};
pub use i18n::{field_label, Language, Message};
pub use model::{
    Courier, CourierForm, CourierType, Decision, DecisionFilter, DecisionForm, IncomingFilter,
    IncomingForm, IncomingMail, OutgoingFilter, OutgoingForm, OutgoingMail, RecordKind, Stored,
};
pub use registry::Registry;

//! HTTP API of the registry.
//!
//! Routes are grouped by resource:
//! - `health`: liveness check
//! - `couriers`: incoming and outgoing mail
//! - `decisions`: administrative decisions
//!
//! Everything is mounted under `/api`. SQLite work runs on the blocking pool.

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::config::CorsConfig;
use crate::db::RecordTable;
use crate::error::RegistreError;
use crate::export::{DetailSheet, ExportTable, Exportable};
use crate::i18n::Language;
use crate::registry::Registry;

pub mod couriers;
pub mod decisions;
pub mod error;
pub mod health;

pub use error::{ApiError, ErrorBody};
pub use health::HealthStatus;

/// Response of the `next-number` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextNumber {
    pub next_number: String,
}

/// `?lang=` of the export and print endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Language,
}

/// Builds the application router with every route under `/api`.
pub fn router(registry: Registry) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .merge(couriers::routes())
        .merge(decisions::routes());

    Router::new().nest("/api", api).with_state(registry)
}

/// CORS layer allowing the configured UI origins.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Runs a registry call on the blocking pool.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, RegistreError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            tracing::error!(error = %e, "Blocking task failed");
            Err(ApiError::Store)
        }
    }
}

/// Export projection of every record of one kind.
pub(crate) async fn export_table<T>(registry: Registry, lang: Language) -> Result<ExportTable, ApiError>
where
    T: RecordTable,
    T::Record: Exportable,
{
    let rows = blocking(move || registry.list::<T>()).await?;
    let records: Vec<T::Record> = rows.into_iter().map(|row| row.record).collect();
    let today = chrono::Local::now().date_naive();
    Ok(ExportTable::build(&records, lang, today))
}

/// Print projection of one record.
pub(crate) async fn detail_sheet<T>(
    registry: Registry,
    id: String,
    lang: Language,
) -> Result<DetailSheet, ApiError>
where
    T: RecordTable,
    T::Record: Exportable,
{
    let row = blocking(move || registry.get::<T>(&id)).await?;
    Ok(DetailSheet::build(&row.record, lang))
}

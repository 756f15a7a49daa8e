//! HTTP client for the registry API.
//!
//! Wraps every endpoint the UI calls. Searches check `/health` first and
//! fail with [`ClientError::Unavailable`] without querying when the server
//! is down. Non-2xx answers are decoded into [`ClientError::Api`].

use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::{ErrorBody, HealthStatus, NextNumber};
use crate::export::{DetailSheet, ExportTable};
use crate::i18n::Language;
use crate::model::{
    Courier, CourierForm, CourierType, Decision, DecisionFilter, DecisionForm, IncomingFilter,
    IncomingForm, IncomingMail, OutgoingFilter, OutgoingForm, OutgoingMail, RecordKind, Stored,
};

pub mod error;

pub use error::{Action, ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001/api";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoint paths, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub health: String,
    pub couriers: String,
    pub incoming_search: String,
    pub outgoing_search: String,
    pub decisions: String,
    pub decisions_search: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            health: "/health".to_string(),
            couriers: "/couriers".to_string(),
            incoming_search: "/couriers/arrivee/search".to_string(),
            outgoing_search: "/couriers/depart/search".to_string(),
            decisions: "/decisions".to_string(),
            decisions_search: "/decisions/search".to_string(),
        }
    }
}

/// Per-deployment client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

pub struct RegistreClient {
    http: Client,
    config: ApiConfig,
}

impl RegistreClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.url(path);
        debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    fn courier_path(&self, kind: CourierType) -> String {
        format!("{}/type/{}", self.config.endpoints.couriers, kind.as_str())
    }

    fn kind_path(&self, kind: RecordKind) -> String {
        match kind {
            RecordKind::Incoming => self.courier_path(CourierType::Incoming),
            RecordKind::Outgoing => self.courier_path(CourierType::Outgoing),
            RecordKind::Decision => self.config.endpoints.decisions.clone(),
        }
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .request(Method::GET, &self.config.endpoints.health)
            .send()
            .await?;
        decode(response).await
    }

    /// Fails with [`ClientError::Unavailable`] unless the server reports healthy.
    pub async fn ensure_available(&self) -> Result<()> {
        match self.health().await {
            Ok(status) if status.is_ok() => Ok(()),
            Ok(status) => Err(ClientError::Unavailable(format!(
                "health status '{}'",
                status.status
            ))),
            Err(e) => {
                warn!("Health check failed: {}", e);
                Err(ClientError::Unavailable(e.to_string()))
            }
        }
    }

    pub async fn create_courier(&self, form: &CourierForm) -> Result<Courier> {
        let response = self
            .request(Method::POST, &self.config.endpoints.couriers)
            .json(form)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn list_couriers(&self) -> Result<Vec<Courier>> {
        let response = self
            .request(Method::GET, &self.config.endpoints.couriers)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn list_by_type(&self, kind: CourierType) -> Result<Vec<Courier>> {
        let response = self
            .request(Method::GET, &self.courier_path(kind))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn get_courier(&self, kind: CourierType, id: &str) -> Result<Courier> {
        let path = format!("{}/{}", self.courier_path(kind), id);
        decode(self.request(Method::GET, &path).send().await?).await
    }

    pub async fn update_incoming(&self, id: &str, form: &IncomingForm) -> Result<Courier> {
        let path = format!("{}/{}", self.courier_path(CourierType::Incoming), id);
        decode(self.request(Method::PUT, &path).json(form).send().await?).await
    }

    pub async fn update_outgoing(&self, id: &str, form: &OutgoingForm) -> Result<Courier> {
        let path = format!("{}/{}", self.courier_path(CourierType::Outgoing), id);
        decode(self.request(Method::PUT, &path).json(form).send().await?).await
    }

    pub async fn delete_courier(&self, kind: CourierType, id: &str) -> Result<()> {
        let path = format!("{}/{}", self.courier_path(kind), id);
        expect_success(self.request(Method::DELETE, &path).send().await?).await
    }

    pub async fn search_incoming(&self, filter: &IncomingFilter) -> Result<Vec<IncomingMail>> {
        self.ensure_available().await?;
        let response = self
            .request(Method::POST, &self.config.endpoints.incoming_search)
            .json(filter)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn search_outgoing(&self, filter: &OutgoingFilter) -> Result<Vec<OutgoingMail>> {
        self.ensure_available().await?;
        let response = self
            .request(Method::POST, &self.config.endpoints.outgoing_search)
            .json(filter)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn create_decision(&self, form: &DecisionForm) -> Result<Stored<Decision>> {
        let response = self
            .request(Method::POST, &self.config.endpoints.decisions)
            .json(form)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn list_decisions(&self) -> Result<Vec<Stored<Decision>>> {
        let response = self
            .request(Method::GET, &self.config.endpoints.decisions)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn get_decision(&self, id: &str) -> Result<Stored<Decision>> {
        let path = format!("{}/{}", self.config.endpoints.decisions, id);
        decode(self.request(Method::GET, &path).send().await?).await
    }

    pub async fn update_decision(&self, id: &str, form: &DecisionForm) -> Result<Stored<Decision>> {
        let path = format!("{}/{}", self.config.endpoints.decisions, id);
        decode(self.request(Method::PUT, &path).json(form).send().await?).await
    }

    pub async fn delete_decision(&self, id: &str) -> Result<()> {
        let path = format!("{}/{}", self.config.endpoints.decisions, id);
        expect_success(self.request(Method::DELETE, &path).send().await?).await
    }

    pub async fn search_decisions(&self, filter: &DecisionFilter) -> Result<Vec<Decision>> {
        self.ensure_available().await?;
        let response = self
            .request(Method::POST, &self.config.endpoints.decisions_search)
            .json(filter)
            .send()
            .await?;
        decode(response).await
    }

    /// The number the next record of this kind will receive.
    pub async fn next_number(&self, kind: RecordKind) -> Result<String> {
        let path = format!("{}/next-number", self.kind_path(kind));
        let next: NextNumber = decode(self.request(Method::GET, &path).send().await?).await?;
        Ok(next.next_number)
    }

    pub async fn export(&self, kind: RecordKind, lang: Language) -> Result<ExportTable> {
        let path = format!("{}/export", self.kind_path(kind));
        let response = self
            .request(Method::GET, &path)
            .query(&[("lang", lang.code())])
            .send()
            .await?;
        decode(response).await
    }

    pub async fn print(&self, kind: RecordKind, id: &str, lang: Language) -> Result<DetailSheet> {
        let path = format!("{}/{}/print", self.kind_path(kind), id);
        let response = self
            .request(Method::GET, &path)
            .query(&[("lang", lang.code())])
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    Ok(response.json().await?)
}

async fn expect_success(response: Response) -> Result<()> {
    check_status(response).await.map(|_| ())
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let error = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => ClientError::Api {
            status: status.as_u16(),
            code: body.code,
            message: body.message,
            field: body.field,
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            code: status.canonical_reason().unwrap_or("ERROR").to_string(),
            message: text,
            field: None,
        },
    };
    debug!("Request failed: {}", error);
    Err(error)
}

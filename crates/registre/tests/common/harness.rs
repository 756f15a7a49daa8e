//! Test harness for isolated test execution.
//!
//! Each `TestHarness` owns a temporary directory holding its own SQLite
//! file, so tests never share numbering or records.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower::ServiceExt;

use registre::{router, ApiConfig, Registry, RegistreClient};

const BODY_LIMIT: usize = 1024 * 1024;

pub struct TestHarness {
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub registry: Registry,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("registre.db");
        let registry = Registry::open(&db_path).expect("Failed to open registry");
        Self {
            temp_dir,
            db_path,
            registry,
        }
    }

    pub fn app(&self) -> Router {
        router(self.registry.clone())
    }

    /// Sends one request through the router and returns the status and JSON body.
    ///
    /// An empty body decodes as `Value::Null`.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("Failed to build request");
        self.send_request(request).await
    }

    /// Sends a raw body with a JSON content type.
    pub async fn send_raw(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app()
            .oneshot(request)
            .await
            .expect("Router call failed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("Failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Serves the router on an ephemeral local port and returns a client for it.
    pub async fn spawn_server(&self) -> (SocketAddr, RegistreClient) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");
        let app = self.app();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        let client = RegistreClient::new(ApiConfig::with_base_url(format!("http://{}/api", addr)))
            .expect("Failed to build client");
        (addr, client)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

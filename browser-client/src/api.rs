//! Query proxy client.
//!
//! `ProxyApi` is the seam between the browser state machine and the service;
//! `HttpProxyClient` is the real implementation over HTTP.

use async_trait::async_trait;
use common::config::ClientConfig;
use common::errors::{AppError, AppResult};
use common::models::{ConnectionParameters, QueryRequest, QueryResult, TableDescriptor, TablesPayload};
use common::response::ApiResponse;
use serde::{de::DeserializeOwned, Serialize};

/// The three proxy operations.
#[async_trait]
pub trait ProxyApi: Send + Sync {
    /// Checks that a connection can be opened.
    async fn test_connection(&self, params: &ConnectionParameters) -> AppResult<()>;

    /// Lists user tables.
    async fn list_tables(&self, params: &ConnectionParameters) -> AppResult<Vec<TableDescriptor>>;

    /// Runs `sql` and returns its result.
    async fn execute_query(&self, params: &ConnectionParameters, sql: &str) -> AppResult<QueryResult>;
}

/// HTTP implementation of [`ProxyApi`].
#[derive(Debug, Clone)]
pub struct HttpProxyClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpProxyClient {
    /// Creates a client for the service at `config.api_url`.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Base URL in use.
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Posts `body` to `path` and decodes the envelope.
    ///
    /// Failure envelopes arrive with a 4xx status; they are decoded like any
    /// other response so the service's message reaches the user.
    async fn post<B, T>(&self, path: &str, body: &B, fallback: &str) -> AppResult<Option<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        tracing::debug!(url = %url, "calling proxy service");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("unexpected response from {} ({}): {}", url, status, e))
        })?;

        envelope.into_result(fallback)
    }
}

#[async_trait]
impl ProxyApi for HttpProxyClient {
    async fn test_connection(&self, params: &ConnectionParameters) -> AppResult<()> {
        self.post::<_, ()>("/api/test-connection", params, "Unknown error")
            .await
            .map(|_| ())
    }

    async fn list_tables(&self, params: &ConnectionParameters) -> AppResult<Vec<TableDescriptor>> {
        let payload: Option<TablesPayload> = self
            .post("/api/list-tables", params, "Failed to fetch tables")
            .await?;
        payload
            .map(|p| p.tables)
            .ok_or_else(|| AppError::ExternalService("Failed to fetch tables".to_string()))
    }

    async fn execute_query(&self, params: &ConnectionParameters, sql: &str) -> AppResult<QueryResult> {
        let request = QueryRequest::new(params.clone(), sql);
        let payload: Option<QueryResult> = self.post("/api/query", &request, "Query failed").await?;
        payload.ok_or_else(|| AppError::ExternalService("Query failed".to_string()))
    }
}

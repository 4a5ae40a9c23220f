//! HTTP job status store client.
//!
//! Speaks a PostgREST-style REST contract against a hosted relational
//! table: inserts return the created row, updates address rows through a
//! `job_id` equality filter. Writes that do not come back with exactly
//! one row are treated as failed (ambiguous) persistence.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use clipforge_models::{JobId, JobKind, JobRecord, JobStatus};

use crate::error::{StoreError, StoreResult};
use crate::metrics::record_request;

/// Store client configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the REST endpoint
    pub base_url: String,
    /// Table holding job status records
    pub table: String,
    /// API key sent with every request, when the store requires one
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl StoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        let base_url = std::env::var("JOB_STORE_URL").map_err(|_| {
            StoreError::config("JOB_STORE_URL must be set to reach the job status store")
        })?;

        if base_url.is_empty() {
            return Err(StoreError::config("JOB_STORE_URL cannot be empty"));
        }

        Ok(Self {
            base_url,
            table: std::env::var("JOB_STORE_TABLE").unwrap_or_else(|_| "job_statuses".to_string()),
            api_key: std::env::var("JOB_STORE_API_KEY").ok(),
            timeout: Duration::from_secs(
                std::env::var("JOB_STORE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            connect_timeout: Duration::from_secs(5),
        })
    }
}

/// Persistence contract for job status records.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Create a PENDING record and return its generated id.
    async fn create(&self, job_type: JobKind, input_payload: Value) -> StoreResult<JobId>;

    /// Write a new status, refreshing `updated_at`. Output details are
    /// attached only on COMPLETED, error messages only on FAILED or
    /// QUEUE_FAILED; transition legality is not enforced here.
    async fn update(
        &self,
        job_id: &JobId,
        status: JobStatus,
        output_details: Option<Value>,
        error_message: Option<String>,
    ) -> StoreResult<()>;
}

/// REST-backed job store.
pub struct HttpJobStore {
    http: Client,
    config: StoreConfig,
}

impl HttpJobStore {
    /// Create a new store client.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("clipforge-store/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StoreError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    fn table_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn row_filter_url(&self, job_id: &JobId) -> String {
        format!("{}?job_id=eq.{}", self.table_url(), job_id)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("Prefer", "return=representation");
        match &self.config.api_key {
            Some(key) => builder.header("apikey", key).bearer_auth(key),
            None => builder,
        }
    }

    /// Send a write and decode the returned representation, requiring
    /// exactly one row back.
    async fn execute_write(
        &self,
        operation: &'static str,
        builder: reqwest::RequestBuilder,
    ) -> StoreResult<Value> {
        let response = builder.send().await.map_err(|e| {
            record_request(operation, "network_error");
            StoreError::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            record_request(operation, "http_error");
            return Err(StoreError::request_failed(format!(
                "{} returned {}: {}",
                operation, status, body
            )));
        }

        let mut rows: Vec<Value> = serde_json::from_str(&body).map_err(|e| {
            record_request(operation, "bad_body");
            StoreError::invalid_response(format!("{} returned unparseable body: {}", operation, e))
        })?;

        if rows.len() != 1 {
            record_request(operation, "ambiguous");
            return Err(StoreError::persistence_failed(format!(
                "{} expected exactly one row back, got {}",
                operation,
                rows.len()
            )));
        }

        record_request(operation, "ok");
        Ok(rows.remove(0))
    }
}

#[async_trait]
impl JobStore for HttpJobStore {
    async fn create(&self, job_type: JobKind, input_payload: Value) -> StoreResult<JobId> {
        let record = JobRecord::new(JobId::new(), job_type, input_payload);
        debug!(job_id = %record.job_id, job_type = %job_type, "Creating job record");

        let builder = self.authorize(self.http.post(self.table_url()).json(&record));
        let row = self.execute_write("create", builder).await?;

        // The store's echo of the row is canonical.
        let id = row
            .get("job_id")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::invalid_response("created row missing job_id"))?;

        Ok(JobId::from_string(id))
    }

    async fn update(
        &self,
        job_id: &JobId,
        status: JobStatus,
        output_details: Option<Value>,
        error_message: Option<String>,
    ) -> StoreResult<()> {
        let mut patch = json!({
            "status": status,
            "updated_at": Utc::now(),
        });
        if let Some(output) = output_details {
            patch["output_details"] = output;
        }
        if let Some(error) = error_message {
            patch["error_message"] = Value::String(error);
        }

        debug!(job_id = %job_id, status = %status, "Updating job record");

        let builder = self.authorize(self.http.patch(self.row_filter_url(job_id)).json(&patch));
        self.execute_write("update", builder).await.map(|_| ())
    }
}

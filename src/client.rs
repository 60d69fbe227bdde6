//! API client seam
//!
//! The dispatcher and poller only talk to the [`Client`] trait. [`HttpClient`]
//! is the reqwest-backed implementation used by the `cs` binary; tests plug
//! in scripted clients.

use crate::{config::Profile, descriptor::Request};
use async_trait::async_trait;
use reqwest::{header::ACCEPT, header::HeaderMap, header::HeaderValue, Client as Http};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Failure talking to the remote API
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {text}")]
    Api { status: u16, text: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Identifier of a running asynchronous job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(pub String);

impl JobHandle {
    /// Extract the `jobid` an async submission answers with
    pub fn from_response(response: &Value) -> Option<Self> {
        response
            .get("jobid")
            .and_then(Value::as_str)
            .map(|id| JobHandle(id.to_string()))
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of an asynchronous job
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Pending,
    Succeeded(Value),
    Failed { code: i64, text: String },
}

#[async_trait]
pub trait Client: Send + Sync {
    async fn submit(&self, request: &Request) -> Result<Value, TransportError>;

    async fn query_status(&self, job: &JobHandle) -> Result<JobStatus, TransportError>;
}

/// HTTP client for CloudStack-style endpoints
///
/// Requests are sent as `GET <endpoint>?command=<name>&response=json&...`.
/// Requests are not signed.
pub struct HttpClient {
    pub endpoint: String,
    api_key: String,
    client: Http,
}

impl HttpClient {
    pub fn new(profile: &Profile) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Http::builder().default_headers(headers).build()?;
        Ok(HttpClient {
            endpoint: profile.endpoint.clone(),
            api_key: profile.key.clone(),
            client,
        })
    }

    async fn call(
        &self,
        command: &str,
        params: Vec<(String, String)>,
    ) -> Result<Value, TransportError> {
        let mut query = vec![
            ("command".to_string(), command.to_string()),
            ("response".to_string(), "json".to_string()),
        ];
        if !self.api_key.is_empty() {
            query.push(("apiKey".to_string(), self.api_key.clone()));
        }
        query.extend(params);

        debug!(command, endpoint = %self.endpoint, "sending request");
        let resp = self.client.get(&self.endpoint).query(&query).send().await?;
        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        let inner = unwrap_envelope(body);

        if !status.is_success() {
            let text = inner
                .get("errortext")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string());
            return Err(TransportError::Api {
                status: status.as_u16(),
                text,
            });
        }
        Ok(inner)
    }
}

/// Strip the single `<command>response` object the API wraps results in
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.len() == 1 => {
            let key = map.keys().next().cloned().unwrap_or_default();
            if key.ends_with("response") {
                map.remove(&key).unwrap_or(Value::Null)
            } else {
                Value::Object(map)
            }
        }
        other => other,
    }
}

/// Decode a `queryAsyncJobResult` answer
fn job_status(inner: &Value) -> Result<JobStatus, TransportError> {
    let status = inner
        .get("jobstatus")
        .and_then(Value::as_i64)
        .ok_or_else(|| TransportError::Decode("missing jobstatus".to_string()))?;
    let result = inner.get("jobresult").cloned().unwrap_or(Value::Null);
    match status {
        0 => Ok(JobStatus::Pending),
        1 => Ok(JobStatus::Succeeded(result)),
        2 => Ok(JobStatus::Failed {
            code: result.get("errorcode").and_then(Value::as_i64).unwrap_or(0),
            text: result
                .get("errortext")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        }),
        other => Err(TransportError::Decode(format!("unknown jobstatus {other}"))),
    }
}

#[async_trait]
impl Client for HttpClient {
    async fn submit(&self, request: &Request) -> Result<Value, TransportError> {
        self.call(request.command, request.query_pairs()).await
    }

    async fn query_status(&self, job: &JobHandle) -> Result<JobStatus, TransportError> {
        let inner = self
            .call(
                "queryAsyncJobResult",
                vec![("jobid".to_string(), job.0.clone())],
            )
            .await?;
        job_status(&inner)
    }
}

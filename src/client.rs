//! Analysis endpoint client
//!
//! The endpoint is opaque: it takes `{"text": ...}` and answers with a
//! summary plus a knowledge graph. [`AnalysisClient`] is the seam the
//! controller depends on; [`HttpAnalysisClient`] is the real transport.

use crate::config::FactGraphConfig;
use crate::error::{AnalysisFailure, Result};
use crate::types::{AnalysisRequest, AnalysisResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest error body excerpt carried into a notice
const MAX_DETAIL_CHARS: usize = 200;

/// One request/response exchange with the analysis endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> std::result::Result<AnalysisResult, AnalysisFailure>;
}

/// FastAPI-style error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// HTTP transport for the analysis endpoint
pub struct HttpAnalysisClient {
    client: Client,
    endpoint: String,
    request_timeout: Duration,
}

impl HttpAnalysisClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `endpoint` - Full URL the request is POSTed to
    /// * `connect_timeout` - Bound on establishing the connection
    /// * `request_timeout` - Bound on the whole exchange
    pub fn new(endpoint: impl Into<String>, connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            request_timeout,
        })
    }

    pub fn from_config(config: &FactGraphConfig) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            config.connect_timeout(),
            config.request_timeout(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> AnalysisFailure {
        if err.is_timeout() {
            AnalysisFailure::Timeout {
                after: self.request_timeout,
            }
        } else if err.is_decode() {
            AnalysisFailure::MalformedResponse(err.to_string())
        } else {
            AnalysisFailure::Unreachable(describe(&err))
        }
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, request: &AnalysisRequest) -> std::result::Result<AnalysisResult, AnalysisFailure> {
        debug!(
            "POST {} ({} chars)",
            self.endpoint,
            request.text.chars().count()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            let detail = error_detail(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("no detail").to_string());
            warn!("Analysis endpoint returned {}: {}", status, detail);
            return Err(AnalysisFailure::from_status(status.as_u16(), detail));
        }

        let result: AnalysisResult = serde_json::from_slice(&body)
            .map_err(|e| AnalysisFailure::MalformedResponse(e.to_string()))?;
        result.validate()?;

        debug!(
            "Analysis returned {} sentences, graph: {}",
            result.summary.len(),
            result.graph_data.is_some()
        );
        Ok(result)
    }
}

/// Pull a readable message out of an error body
fn error_detail(body: &[u8]) -> Option<String> {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return Some(match parsed.detail {
            serde_json::Value::String(s) => s,
            other => truncate(&other.to_string()),
        });
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(truncate(text))
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DETAIL_CHARS {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(MAX_DETAIL_CHARS).collect();
        cut.push('…');
        cut
    }
}

/// Error message including the innermost cause
fn describe(err: &reqwest::Error) -> String {
    let mut source = std::error::Error::source(err);
    let mut innermost = None;
    while let Some(cause) = source {
        innermost = Some(cause.to_string());
        source = cause.source();
    }
    match innermost {
        Some(cause) => format!("{} ({})", err, cause),
        None => err.to_string(),
    }
}

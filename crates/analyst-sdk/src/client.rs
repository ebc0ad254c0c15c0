//! Grounded Analyst client implementation.

use crate::error::SdkError;
use crate::wire::{AnalyzeRequest, AnalyzeResponse, ErrorResponse};
use analyst_domain::{AnalysisEndpoint, AnalysisResult, EndpointError, Query};
use reqwest::Url;
use tracing::debug;

/// Default analysis endpoint for a locally running backend
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/api/analyze";

/// HTTP client for the remote analysis endpoint
///
/// Each call is a single POST with no retry and no timeout; whatever the
/// endpoint does, the caller sees exactly one outcome.
#[derive(Debug, Clone)]
pub struct AnalystClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl AnalystClient {
    /// Create a client for the given endpoint URL
    pub fn new(endpoint: &str) -> Result<Self, SdkError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SdkError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;
        Self::with_http_client(endpoint, http)
    }

    /// Create a client that reuses an existing `reqwest::Client`
    pub fn with_http_client(endpoint: &str, http: reqwest::Client) -> Result<Self, SdkError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SdkError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        match endpoint.scheme() {
            "http" | "https" => Ok(Self { endpoint, http }),
            scheme => Err(SdkError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                scheme
            ))),
        }
    }

    /// The endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Post one query and decode the outcome
    ///
    /// # Errors
    ///
    /// - `EndpointError` for a non-success status with a JSON body
    /// - `ConnectionError` when the exchange itself fails
    /// - `DecodeError` when either body is not the expected JSON, including a
    ///   success body without an `analysis` field
    pub async fn analyze_query(&self, query: &Query) -> Result<AnalysisResult, SdkError> {
        debug!(endpoint = %self.endpoint, query_len = query.len(), "posting analysis request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&AnalyzeRequest {
                query: query.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "analysis response received");

        if status.is_success() {
            let parsed: AnalyzeResponse = serde_json::from_slice(&body)?;
            Ok(parsed.into_result())
        } else {
            let parsed: ErrorResponse = serde_json::from_slice(&body)?;
            Err(SdkError::EndpointError {
                status: status.as_u16(),
                message: parsed.error,
            })
        }
    }
}

impl AnalysisEndpoint for AnalystClient {
    async fn analyze(&self, query: &Query) -> Result<AnalysisResult, EndpointError> {
        self.analyze_query(query).await.map_err(EndpointError::from)
    }
}

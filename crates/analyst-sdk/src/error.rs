//! Error types for the Grounded Analyst SDK.

use analyst_domain::EndpointError;
use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// Endpoint URL could not be parsed
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// Connection error (network, DNS, refused, reset)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Endpoint answered with a non-success status and a JSON error body
    #[error("Endpoint error (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    EndpointError {
        /// HTTP status code
        status: u16,
        /// The body's `error` field
        message: Option<String>,
    },

    /// Response body was not the JSON we expected
    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            SdkError::InvalidEndpoint(e.to_string())
        } else if e.is_decode() {
            SdkError::DecodeError(e.to_string())
        } else {
            SdkError::ConnectionError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::DecodeError(format!("JSON parsing error: {}", e))
    }
}

impl From<SdkError> for EndpointError {
    fn from(e: SdkError) -> Self {
        match e {
            SdkError::EndpointError { status, message } => {
                EndpointError::Application { status, message }
            }
            other => EndpointError::Transport(other.to_string()),
        }
    }
}

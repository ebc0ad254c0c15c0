//! Trait definitions for external interactions
//!
//! The remote analysis service is opaque; this is the whole of what the
//! rest of the workspace knows about it.

use crate::{AnalysisResult, Query};
use std::future::Future;
use thiserror::Error;

/// Why an endpoint call did not produce an analysis
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// The endpoint answered with a non-success status and a well-formed error body
    #[error("analysis endpoint returned HTTP {status}")]
    Application {
        /// HTTP status code
        status: u16,
        /// The body's `error` field, if it had one
        message: Option<String>,
    },

    /// The exchange itself failed: unreachable endpoint, broken connection,
    /// or a body that could not be decoded
    #[error("transport failure: {0}")]
    Transport(String),
}

impl EndpointError {
    /// True for transport failures
    pub fn is_transport(&self) -> bool {
        matches!(self, EndpointError::Transport(_))
    }
}

/// A remote service that turns a query into an analysis
///
/// Implemented by the infrastructure layer (analyst-sdk)
pub trait AnalysisEndpoint {
    /// Send one query and wait for its outcome
    fn analyze(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<AnalysisResult, EndpointError>> + Send;
}


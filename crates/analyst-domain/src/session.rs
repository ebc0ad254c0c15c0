//! Session module - the request lifecycle state and its error payload

use crate::{AnalysisResult, EndpointError, Query, Source};
use serde::Serialize;

/// Shown when the endpoint reports a failure with a missing or blank `error` message
pub const APPLICATION_ERROR_FALLBACK: &str = "Could not connect to the analyst engine.";

/// Shown for any failure of the exchange itself
pub const TRANSPORT_ERROR_MESSAGE: &str =
    "A network error occurred. Check if the backend service is running and reachable.";

/// The message displayed for a failed request
///
/// The cause (application vs transport) is folded into the message text and
/// not kept separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    /// Human-readable message
    pub message: String,
}

impl ErrorInfo {
    /// Create an error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The fixed transport-failure error
    pub fn transport() -> Self {
        Self::new(TRANSPORT_ERROR_MESSAGE)
    }
}

impl From<&EndpointError> for ErrorInfo {
    fn from(error: &EndpointError) -> Self {
        match error {
            EndpointError::Application { message, .. } => match message {
                Some(message) if !message.trim().is_empty() => Self::new(message.clone()),
                _ => Self::new(APPLICATION_ERROR_FALLBACK),
            },
            EndpointError::Transport(_) => Self::transport(),
        }
    }
}

impl From<EndpointError> for ErrorInfo {
    fn from(error: EndpointError) -> Self {
        Self::from(&error)
    }
}

/// Phase of the request lifecycle
///
/// Exactly one variant is active. `Idle` exists only before the first
/// submission; afterwards the session moves between `InFlight` and the two
/// terminal states.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing submitted yet
    #[default]
    Idle,

    /// A request is outstanding
    InFlight {
        /// Text snapshot the request was sent with
        query: Query,
    },

    /// The last request returned an analysis
    Succeeded(AnalysisResult),

    /// The last request failed
    Failed(ErrorInfo),
}

impl SessionState {
    /// Short lowercase name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::InFlight { .. } => "in_flight",
            SessionState::Succeeded(_) => "succeeded",
            SessionState::Failed(_) => "failed",
        }
    }

    /// True while a request is outstanding
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SessionState::InFlight { .. })
    }

    /// True for `Succeeded` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Succeeded(_) | SessionState::Failed(_))
    }

    /// The analysis, present only in `Succeeded`
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            SessionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// The error, present only in `Failed`
    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            SessionState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Sources on display; empty in every state but `Succeeded`
    pub fn sources(&self) -> &[Source] {
        self.result().map(|r| r.sources.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let state = SessionState::default();
        assert_eq!(state, SessionState::Idle);
        assert!(!state.is_in_flight());
        assert!(!state.is_terminal());
        assert!(state.sources().is_empty());
    }

    #[test]
    fn test_sources_only_in_succeeded() {
        let ok = SessionState::Succeeded(AnalysisResult::new(
            "ok",
            vec![Source::new("https://a.com")],
        ));
        assert_eq!(ok.sources().len(), 1);

        let failed = SessionState::Failed(ErrorInfo::new("rate limited"));
        assert!(failed.sources().is_empty());
        assert_eq!(failed.error().unwrap().message, "rate limited");
    }

    #[test]
    fn test_application_error_uses_endpoint_message() {
        let error = EndpointError::Application {
            status: 429,
            message: Some("rate limited".to_string()),
        };
        assert_eq!(ErrorInfo::from(&error).message, "rate limited");
    }

    #[test]
    fn test_application_error_fallback() {
        let error = EndpointError::Application {
            status: 500,
            message: None,
        };
        assert_eq!(ErrorInfo::from(error).message, APPLICATION_ERROR_FALLBACK);
    }

    #[test]
    fn test_application_error_blank_message_uses_fallback() {
        for blank in ["", "   ", "\n"] {
            let error = EndpointError::Application {
                status: 500,
                message: Some(blank.to_string()),
            };
            assert_eq!(ErrorInfo::from(&error).message, APPLICATION_ERROR_FALLBACK);
        }
    }

    #[test]
    fn test_transport_error_hides_detail() {
        let error = EndpointError::Transport("connection refused".to_string());
        let info = ErrorInfo::from(&error);
        assert_eq!(info.message, TRANSPORT_ERROR_MESSAGE);
        assert_ne!(info.message, APPLICATION_ERROR_FALLBACK);
    }

    #[test]
    fn test_state_serializes_with_tag() {
        let json = serde_json::to_value(SessionState::Failed(ErrorInfo::new("boom"))).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["message"], "boom");

        let json = serde_json::to_value(SessionState::Idle).unwrap();
        assert_eq!(json["state"], "idle");
    }
}

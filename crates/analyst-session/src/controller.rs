//! Query session controller: owns the query text and the request lifecycle.
//!
//! Every accepted submission ends in exactly one of `Succeeded` or `Failed`.
//! The transition out of `InFlight` is tied to an [`InFlightGuard`], so a
//! panic while handling the outcome, or the `submit` future being dropped
//! mid-request, still settles the session instead of leaving it in flight.

use analyst_domain::{
    AnalysisEndpoint, AnalysisResult, EndpointError, ErrorInfo, Query, SessionState,
};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Notice shown when a blank query is submitted
pub const EMPTY_QUERY_NOTICE: &str = "Please enter a financial query to analyze.";

/// Notice shown when a submission arrives while a request is outstanding
pub const IN_FLIGHT_NOTICE: &str = "An analysis is already in progress.";

/// Why a submission was not dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    /// The query text is empty or whitespace only
    #[error("{}", EMPTY_QUERY_NOTICE)]
    EmptyQuery,

    /// A request is already outstanding
    #[error("{}", IN_FLIGHT_NOTICE)]
    InFlight,
}

impl SubmitRejected {
    /// The user-visible notice for this rejection
    pub fn notice(&self) -> &'static str {
        match self {
            SubmitRejected::EmptyQuery => EMPTY_QUERY_NOTICE,
            SubmitRejected::InFlight => IN_FLIGHT_NOTICE,
        }
    }
}

/// Read-only copy of everything the presentation layer may look at
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionSnapshot {
    /// Current contents of the query box
    pub query_text: String,

    /// Current lifecycle state
    pub state: SessionState,
}

/// Owns the pending query text and the session state for one page session.
///
/// State changes are published on a watch channel; see
/// [`QuerySessionController::subscribe`].
pub struct QuerySessionController<E> {
    endpoint: E,
    query_text: String,
    state: SessionState,
    publisher: watch::Sender<SessionSnapshot>,
}

impl<E: AnalysisEndpoint> QuerySessionController<E> {
    /// Create an idle controller with an empty query box
    pub fn new(endpoint: E) -> Self {
        let (publisher, _) = watch::channel(SessionSnapshot::default());
        Self {
            endpoint,
            query_text: String::new(),
            state: SessionState::Idle,
            publisher,
        }
    }

    /// The endpoint requests go to
    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Replace the pending query text
    ///
    /// Allowed in any state. A request already dispatched keeps the text it
    /// was sent with.
    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.query_text = text.into();
        self.publish();
    }

    /// Current contents of the query box
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    /// Current lifecycle state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// True while a request is outstanding
    pub fn is_in_flight(&self) -> bool {
        self.state.is_in_flight()
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            query_text: self.query_text.clone(),
            state: self.state.clone(),
        }
    }

    /// Receive a fresh snapshot after every state or text change
    ///
    /// The receiver starts out holding the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.publisher.subscribe()
    }

    /// Submit the current query text
    ///
    /// Blank text is rejected with [`SubmitRejected::EmptyQuery`] without
    /// touching the state or the network. Otherwise the previous result and
    /// its sources are dropped, the state becomes `InFlight`, exactly one
    /// request is sent, and the state settles to `Succeeded` or `Failed`.
    pub async fn submit(&mut self) -> Result<&SessionState, SubmitRejected> {
        let query = self.begin()?;

        info!(query_len = query.len(), "dispatching analysis request");
        let guard = InFlightGuard {
            state: &mut self.state,
            publisher: &self.publisher,
            query_text: &self.query_text,
            settled: false,
        };

        let outcome = self.endpoint.analyze(&query).await;
        guard.settle(outcome);

        Ok(&self.state)
    }

    /// Validate and move to `InFlight`, returning the text snapshot to send
    fn begin(&mut self) -> Result<Query, SubmitRejected> {
        if self.state.is_in_flight() {
            warn!("submit ignored: a request is already in flight");
            return Err(SubmitRejected::InFlight);
        }

        let query = Query::parse(&self.query_text).map_err(|_| {
            debug!("submit rejected: query text is blank");
            SubmitRejected::EmptyQuery
        })?;

        self.state = SessionState::InFlight {
            query: query.clone(),
        };
        self.publish();

        Ok(query)
    }

    fn publish(&self) {
        self.publisher.send_replace(self.snapshot());
    }
}

/// Settles an in-flight session exactly once.
///
/// [`InFlightGuard::settle`] applies the endpoint outcome. If the guard is
/// dropped without settling, the session fails with the transport message.
struct InFlightGuard<'a> {
    state: &'a mut SessionState,
    publisher: &'a watch::Sender<SessionSnapshot>,
    query_text: &'a str,
    settled: bool,
}

impl InFlightGuard<'_> {
    fn settle(mut self, outcome: Result<AnalysisResult, EndpointError>) {
        let next = match outcome {
            Ok(result) => {
                info!(sources = result.sources.len(), "analysis succeeded");
                SessionState::Succeeded(result)
            }
            Err(error) => {
                match &error {
                    EndpointError::Application { status, message } => {
                        warn!(status, message = message.as_deref(), "analysis endpoint reported an error")
                    }
                    EndpointError::Transport(detail) => {
                        warn!(detail = %detail, "analysis request failed in transport")
                    }
                }
                SessionState::Failed(ErrorInfo::from(error))
            }
        };

        self.finish(next);
    }

    fn finish(&mut self, next: SessionState) {
        *self.state = next;
        self.settled = true;
        self.publisher.send_replace(SessionSnapshot {
            query_text: self.query_text.to_string(),
            state: self.state.clone(),
        });
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("analysis request abandoned before an outcome was applied");
            self.finish(SessionState::Failed(ErrorInfo::transport()));
        }
    }
}

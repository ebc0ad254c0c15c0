//! Mock analysis endpoint for deterministic testing

use analyst_domain::{AnalysisEndpoint, AnalysisResult, EndpointError, Query};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

/// Mock endpoint that replays scripted outcomes without touching the network.
///
/// Scripted outcomes are consumed in order; once the script runs out every
/// call gets the default outcome. Clones share the script, the call log and
/// the gate.
///
/// # Examples
///
/// ```
/// use analyst_domain::{AnalysisEndpoint, AnalysisResult, Query};
/// use analyst_sdk::MockEndpoint;
///
/// # tokio_test_block_on(async {
/// let endpoint = MockEndpoint::new(AnalysisResult::narrative_only("ok"));
/// let query = Query::parse("x").unwrap();
/// let result = endpoint.analyze(&query).await.unwrap();
/// assert_eq!(result.narrative, "ok");
/// assert_eq!(endpoint.call_count(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockEndpoint {
    default_outcome: Result<AnalysisResult, EndpointError>,
    script: Arc<Mutex<VecDeque<Result<AnalysisResult, EndpointError>>>>,
    received: Arc<Mutex<Vec<String>>>,
    gate: Option<Arc<Notify>>,
}

impl MockEndpoint {
    /// Mock that answers every query with `result`
    pub fn new(result: AnalysisResult) -> Self {
        Self::with_outcome(Ok(result))
    }

    /// Mock that fails every query with `error`
    pub fn failing(error: EndpointError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<AnalysisResult, EndpointError>) -> Self {
        Self {
            default_outcome: outcome,
            script: Arc::new(Mutex::new(VecDeque::new())),
            received: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// Hold every call open until [`MockEndpoint::release`] is called once for it
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Let one held call finish
    ///
    /// A release issued before the call starts waiting is remembered.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Queue a success for the next unscripted call
    pub fn push_result(&self, result: AnalysisResult) {
        lock(&self.script).push_back(Ok(result));
    }

    /// Queue a failure for the next unscripted call
    pub fn push_error(&self, error: EndpointError) {
        lock(&self.script).push_back(Err(error));
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        lock(&self.received).len()
    }

    /// Query texts received, in call order
    pub fn received_queries(&self) -> Vec<String> {
        lock(&self.received).clone()
    }
}

impl Default for MockEndpoint {
    fn default() -> Self {
        Self::new(AnalysisResult::narrative_only("Default mock analysis"))
    }
}

impl AnalysisEndpoint for MockEndpoint {
    async fn analyze(&self, query: &Query) -> Result<AnalysisResult, EndpointError> {
        lock(&self.received).push(query.as_str().to_string());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let scripted = lock(&self.script).pop_front();
        scripted.unwrap_or_else(|| self.default_outcome.clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

//! Grounded Analyst Session
//!
//! The request lifecycle of one query page and the pure presentation layer
//! built on top of it.
//!
//! - [`controller`]: owns the query text and session state, submits queries
//! - [`view`]: maps a [`SessionSnapshot`] to a [`PageView`]
//! - [`markdown`]: formatted-text renderer used for narratives
//!
//! # Example
//!
//! ```
//! use analyst_domain::{AnalysisResult, Source};
//! use analyst_sdk::MockEndpoint;
//! use analyst_session::QuerySessionController;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let endpoint = MockEndpoint::new(AnalysisResult::new(
//!     "**Strong** quarter",
//!     vec![Source::new("https://a.com")],
//! ));
//! let mut controller = QuerySessionController::new(endpoint);
//!
//! controller.set_query_text("Summarize Tesla's last quarter");
//! controller.submit().await.unwrap();
//!
//! let page = controller.snapshot().view();
//! assert_eq!(page.sources.unwrap().links[0].href, "https://a.com");
//! # });
//! ```

#![warn(missing_docs)]

pub mod controller;
pub mod markdown;
pub mod view;

pub use controller::{
    QuerySessionController, SessionSnapshot, SubmitRejected, EMPTY_QUERY_NOTICE,
    IN_FLIGHT_NOTICE,
};
pub use markdown::Document;
pub use view::{render_page, PageView, ReportBody};

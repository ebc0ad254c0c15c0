//! Grounded Analyst Domain Layer
//!
//! Value objects and trait interfaces shared by every other crate in the
//! workspace. Nothing in here performs I/O.
//!
//! ## Key Concepts
//!
//! - **Query**: user-entered text, validated to be non-blank before submission
//! - **Source**: a citation record (at minimum a URI) backing a narrative
//! - **Analysis Result**: the narrative plus its ordered sources
//! - **Session State**: the request lifecycle phase (`Idle`, `InFlight`, `Succeeded`, `Failed`)
//!
//! ## Architecture
//!
//! - Pure data and classification logic only
//! - The remote endpoint is reached through the [`traits::AnalysisEndpoint`] trait;
//!   implementations live in `analyst-sdk`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod query;
pub mod session;
pub mod traits;

// Re-exports for convenience
pub use analysis::{AnalysisResult, Source};
pub use query::{EmptyQuery, Query};
pub use session::{ErrorInfo, SessionState, APPLICATION_ERROR_FALLBACK, TRANSPORT_ERROR_MESSAGE};
pub use traits::{AnalysisEndpoint, EndpointError};

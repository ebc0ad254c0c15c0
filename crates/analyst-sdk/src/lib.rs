//! Grounded Analyst Rust SDK
//!
//! Client library for the remote analysis endpoint, plus a mock endpoint for
//! tests.
//!
//! # Example
//!
//! ```no_run
//! use analyst_domain::Query;
//! use analyst_sdk::AnalystClient;
//!
//! # async fn run() -> Result<(), analyst_sdk::SdkError> {
//! let client = AnalystClient::new("http://127.0.0.1:5000/api/analyze")?;
//! let query = Query::parse("Summarize Tesla's last quarter").expect("non-blank");
//!
//! let result = client.analyze_query(&query).await?;
//! println!("{}", result.narrative);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod mock;
pub mod wire;

pub use client::{AnalystClient, DEFAULT_ENDPOINT};
pub use error::SdkError;
pub use mock::MockEndpoint;

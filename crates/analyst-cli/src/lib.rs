//! Grounded Analyst CLI library.
//!
//! This library hosts the query page in a terminal: configuration and
//! profiles, the one-shot `ask` command, the interactive REPL, and output
//! formatting of rendered pages.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Grounded Analyst CLI - Ask the senior analyst engine for grounded financial analysis.
#[derive(Debug, Parser)]
#[command(name = "analyst")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output and terminal hyperlinks
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Analysis endpoint URL, overriding the profile
    #[arg(short, long, global = true, env = "ANALYST_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Log more detail to stderr (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Styled terminal text (default)
    Text,
    /// The page as JSON
    Json,
    /// Narrative or error message only
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit one query and print the report
    Ask(AskArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),

    /// Enter the interactive query page
    Repl,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Query text; read from stdin when omitted
    pub query: Option<String>,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Analysis endpoint URL
        #[arg(short, long)]
        url: String,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::parse_from(["analyst"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_ask_command() {
        let cli = Cli::parse_from(["analyst", "ask", "Summarize Tesla's last quarter"]);
        match cli.command {
            Some(Command::Ask(args)) => {
                assert_eq!(args.query.as_deref(), Some("Summarize Tesla's last quarter"))
            }
            _ => panic!("Expected Ask command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "analyst",
            "ask",
            "x",
            "--format",
            "json",
            "--endpoint",
            "http://10.0.0.2:5000/api/analyze",
            "-vv",
        ]);
        assert_eq!(cli.format, Some(CliFormat::Json));
        assert_eq!(
            cli.endpoint.as_deref(),
            Some("http://10.0.0.2:5000/api/analyze")
        );
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_profile_set_command() {
        let cli = Cli::parse_from([
            "analyst",
            "profile",
            "set",
            "staging",
            "--url",
            "http://staging:5000/api/analyze",
        ]);
        match cli.command {
            Some(Command::Profile(ProfileArgs {
                action: ProfileAction::Set { name, url },
            })) => {
                assert_eq!(name, "staging");
                assert_eq!(url, "http://staging:5000/api/analyze");
            }
            _ => panic!("Expected profile set"),
        }
    }

    #[test]
    fn test_format_conversion() {
        let format: OutputFormat = CliFormat::Quiet.into();
        assert!(matches!(format, OutputFormat::Quiet));
    }
}

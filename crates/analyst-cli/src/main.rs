//! Grounded Analyst CLI - Command-line host for the grounded analysis query page.

use analyst_cli::commands;
use analyst_cli::repl;
use analyst_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` decides unless `-v` is given
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> analyst_cli::Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref().map(Path::new))?;

    // Profile override applies to this run only
    if let Some(profile_name) = cli.profile {
        config.use_profile_for_session(profile_name)?;
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;
    if !color_enabled {
        colored::control::set_override(false);
    }

    let formatter = Formatter::new(format, color_enabled);
    let endpoint_override = cli.endpoint.as_deref();

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&mut config, endpoint_override, &formatter).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Ask(args)) => {
            let url = config.endpoint_url(endpoint_override)?;
            commands::execute_ask(args, &url, &formatter).await
        }
        Some(Command::Profile(args)) => {
            commands::execute_profile(args, &mut config, &formatter).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

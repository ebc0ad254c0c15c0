//! Ask command implementation.

use crate::cli::AskArgs;
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use analyst_domain::AnalysisEndpoint;
use analyst_sdk::AnalystClient;
use analyst_session::{QuerySessionController, SessionSnapshot, SubmitRejected};
use std::future::Future;
use std::io::{IsTerminal, Read};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Exit code for a query rejected before dispatch
const EXIT_REJECTED: u8 = 2;

/// How a one-shot query ended
#[derive(Debug)]
pub enum AskOutcome {
    /// Not dispatched
    Rejected(SubmitRejected),
    /// Dispatched and settled
    Settled(SessionSnapshot),
}

/// Execute the ask command.
pub async fn execute_ask(
    args: AskArgs,
    endpoint_url: &str,
    formatter: &Formatter,
) -> Result<ExitCode> {
    let text = match args.query {
        Some(text) => text,
        None => read_stdin()?,
    };

    debug!(endpoint = %endpoint_url, "submitting one-shot query");
    let client = AnalystClient::new(endpoint_url)?;

    match ask(client, text, formatter).await {
        AskOutcome::Rejected(rejection) => {
            eprintln!("{}", formatter.rejected(&rejection));
            Ok(ExitCode::from(EXIT_REJECTED))
        }
        AskOutcome::Settled(snapshot) => {
            println!("{}", formatter.format_page(&snapshot.view())?);
            if snapshot.state.error().is_some() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Run one query through a fresh session
pub async fn ask<E: AnalysisEndpoint>(
    endpoint: E,
    text: String,
    formatter: &Formatter,
) -> AskOutcome {
    let mut controller = QuerySessionController::new(endpoint);
    controller.set_query_text(text);

    match submit_with_progress(&mut controller, formatter).await {
        Ok(()) => AskOutcome::Settled(controller.snapshot()),
        Err(rejection) => AskOutcome::Rejected(rejection),
    }
}

/// Submit the controller's query, animating the busy indicator on stderr.
///
/// Ctrl-C abandons the request; the session then settles as a transport
/// failure.
pub async fn submit_with_progress<E: AnalysisEndpoint>(
    controller: &mut QuerySessionController<E>,
    formatter: &Formatter,
) -> std::result::Result<(), SubmitRejected> {
    let show_spinner =
        formatter.format() == OutputFormat::Text && std::io::stderr().is_terminal();
    let mut updates = controller.subscribe();

    let spinner = async {
        if !show_spinner || updates.wait_for(|s| s.state.is_in_flight()).await.is_err() {
            return std::future::pending::<()>().await;
        }
        let mut ticks = tokio::time::interval(Duration::from_millis(80));
        let mut tick = 0usize;
        loop {
            ticks.tick().await;
            eprint!("\r{}", formatter.spinner_frame(tick));
            tick = tick.wrapping_add(1);
        }
    };

    let outcome = tokio::select! {
        outcome = controller.submit() => outcome.map(|_| ()),
        () = interrupted(tokio::signal::ctrl_c()) => {
            info!("query interrupted");
            Ok(())
        }
        () = spinner => Ok(()),
    };

    if show_spinner {
        eprint!("\r\x1b[2K");
    }
    outcome
}

/// Resolve when `signal` reports an interrupt
///
/// If the handler could not be installed this never resolves, so the request
/// is left to finish.
async fn interrupted(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        warn!(error = %e, "Ctrl-C handler unavailable; queries cannot be abandoned");
        std::future::pending::<()>().await;
    }
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| CliError::InvalidInput(format!("Failed to read query from stdin: {}", e)))?;
    Ok(text.trim_end_matches(['\n', '\r']).to_string())
}

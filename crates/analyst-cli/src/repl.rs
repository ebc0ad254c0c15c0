//! Interactive REPL: one query page session in the terminal.
//!
//! Each input line becomes the query text and is submitted. Lines starting
//! with `:` are page commands.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use analyst_sdk::AnalystClient;
use analyst_session::QuerySessionController;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::debug;

/// Run the interactive REPL.
pub async fn run_repl(
    config: &mut Config,
    endpoint_override: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    println!(
        "{}",
        formatter.info("Grounded Analyst - Type a financial query, ':help' for commands, ':quit' to exit")
    );
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut controller = new_session(config, endpoint_override)?;
    println!("{}", formatter.format_page(&controller.snapshot().view())?);
    println!();

    loop {
        match editor.readline("analyst> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.as_str()).ok();
                }

                match parse_repl_line(&line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => print_help(formatter),
                    Ok(ReplCommand::Show) => {
                        println!("{}", formatter.format_page(&controller.snapshot().view())?);
                    }
                    Ok(ReplCommand::Profile(args)) => {
                        let switched = matches!(args.action, ProfileAction::Switch { .. });
                        if let Err(e) = commands::execute_profile(args, config, formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        } else if switched && endpoint_override.is_none() {
                            // A new endpoint starts a new page session
                            controller = new_session(config, endpoint_override)?;
                        }
                    }
                    Ok(ReplCommand::Query(text)) => {
                        controller.set_query_text(text);
                        match commands::submit_with_progress(&mut controller, formatter).await {
                            Ok(()) => {
                                println!(
                                    "{}",
                                    formatter.format_page(&controller.snapshot().view())?
                                );
                            }
                            Err(rejection) => eprintln!("{}", formatter.rejected(&rejection)),
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use ':quit' to exit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

fn new_session(
    config: &Config,
    endpoint_override: Option<&str>,
) -> Result<QuerySessionController<AnalystClient>> {
    let url = config.endpoint_url(endpoint_override)?;
    debug!(endpoint = %url, "starting page session");
    Ok(QuerySessionController::new(AnalystClient::new(&url)?))
}

/// REPL command type.
#[derive(Debug)]
enum ReplCommand {
    Exit,
    Help,
    Show,
    Profile(ProfileArgs),
    /// Text to submit, verbatim
    Query(String),
}

/// Parse a REPL input line.
fn parse_repl_line(line: &str) -> Result<ReplCommand> {
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return Ok(ReplCommand::Query(line.to_string()));
    };

    let parts: Vec<&str> = command.split_whitespace().collect();
    match parts.first().copied() {
        Some("quit" | "exit" | "q") => Ok(ReplCommand::Exit),
        Some("help" | "?") => Ok(ReplCommand::Help),
        Some("show") => Ok(ReplCommand::Show),
        Some("profile") => parse_profile_command(&parts[1..]),
        Some(other) => Err(CliError::InvalidInput(format!(
            "Unknown command: :{}. Type ':help' for available commands.",
            other
        ))),
        None => Err(CliError::InvalidInput(
            "Empty command. Type ':help' for available commands.".to_string(),
        )),
    }
}

fn parse_profile_command(args: &[&str]) -> Result<ReplCommand> {
    let action = match args {
        [] | ["show"] => ProfileAction::Show,
        ["list"] => ProfileAction::List,
        ["switch", name] => ProfileAction::Switch {
            name: name.to_string(),
        },
        ["switch", ..] => {
            return Err(CliError::InvalidInput(
                "Usage: :profile switch <name>".to_string(),
            ))
        }
        [other, ..] => {
            return Err(CliError::InvalidInput(format!(
                "Unknown profile action: {}",
                other
            )))
        }
    };

    Ok(ReplCommand::Profile(ProfileArgs { action }))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::home_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <query>                        - Submit a financial query for analysis");
    println!("  :show                          - Show the current report again");
    println!("  :profile [list|show|switch]    - Manage profiles");
    println!("  :help, :?                      - Show this help");
    println!("  :quit, :exit, :q               - Exit REPL");
    println!();
    println!("  Ctrl-C while a query is running abandons it.");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_is_query_verbatim() {
        match parse_repl_line("  Summarize Tesla ") {
            Ok(ReplCommand::Query(text)) => assert_eq!(text, "  Summarize Tesla "),
            other => panic!("Expected query, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_line_is_query() {
        // Blank text still goes through submit so the notice is shown
        assert!(matches!(
            parse_repl_line("   "),
            Ok(ReplCommand::Query(_))
        ));
    }

    #[test]
    fn test_page_commands() {
        assert!(matches!(parse_repl_line(":q"), Ok(ReplCommand::Exit)));
        assert!(matches!(parse_repl_line(" :help"), Ok(ReplCommand::Help)));
        assert!(matches!(parse_repl_line(":show"), Ok(ReplCommand::Show)));
        assert!(parse_repl_line(":bogus").is_err());
        assert!(parse_repl_line(":").is_err());
    }

    #[test]
    fn test_profile_commands() {
        match parse_repl_line(":profile switch staging") {
            Ok(ReplCommand::Profile(ProfileArgs {
                action: ProfileAction::Switch { name },
            })) => assert_eq!(name, "staging"),
            other => panic!("Expected profile switch, got {:?}", other),
        }
        assert!(matches!(
            parse_repl_line(":profile"),
            Ok(ReplCommand::Profile(ProfileArgs {
                action: ProfileAction::Show
            }))
        ));
        assert!(parse_repl_line(":profile switch").is_err());
    }
}

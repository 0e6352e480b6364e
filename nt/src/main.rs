//! newtool - CLI entry point

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use newtool::agents::AgentRuntime;
use newtool::cli::{Cli, Command};
use newtool::config::Config;
use newtool::llm::{Message, create_client};
use newtool::repl::{self, render_markdown};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("newtool")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("newtool.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Problem worth reporting from loading `.env`; a missing file is not one
fn dotenv_problem(result: Result<PathBuf, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env may hold the API key; reported once logging is up
    let dotenv_error = dotenv_problem(dotenvy::dotenv());

    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    if let Some(e) = dotenv_error {
        warn!(error = %e, "Failed to load .env");
        eprintln!("Warning: Failed to load .env: {}", e);
    }

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(user) = &cli.user {
        config.user.user_id = user.clone();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    config.validate()?;

    info!(model = %config.llm.model, user_id = %config.user.user_id, "newtool loaded config");

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let runtime = AgentRuntime::from_config(&config, llm)?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => repl::run_interactive(&config, runtime, None).await,
        Some(Command::Chat { initial }) => repl::run_interactive(&config, runtime, initial).await,
        Some(Command::Ask { prompt }) => cmd_ask(&runtime, &prompt).await,
    }
}

/// One non-interactive turn
async fn cmd_ask(runtime: &AgentRuntime, prompt: &str) -> Result<()> {
    debug!(prompt_len = prompt.len(), "cmd_ask: called");
    let mut transcript: Vec<Message> = Vec::new();
    let answer = runtime.turn(&mut transcript, prompt).await?;
    print!("{}", render_markdown(&answer));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dotenv_is_not_reported() {
        let missing = dotenvy::Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "no .env"));
        assert!(dotenv_problem(Err(missing)).is_none());
        assert!(dotenv_problem(Ok(PathBuf::from(".env"))).is_none());
    }

    #[test]
    fn test_malformed_dotenv_is_reported() {
        let malformed = dotenvy::Error::LineParse("GOOGLE_API_KEY".to_string(), 14);
        assert!(matches!(dotenv_problem(Err(malformed)), Some(dotenvy::Error::LineParse(..))));

        let denied = dotenvy::Error::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        assert!(dotenv_problem(Err(denied)).is_some());
    }
}

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use serde::Serialize;

use lessonstore::cli::{Cli, Command};
use lessonstore::{LearningStore, SessionAction, SessionOutcome, Status};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let store = LearningStore::open_with_lessons_dir(&cli.data_dir, &cli.lessons_dir)
        .context("Failed to open lesson store")?;

    info!("lessonstore opened at {}", store.data_dir().display());

    match cli.command {
        Command::Progress { user_id } => {
            let summary = store.progress.progress_summary(&user_id)?;
            if cli.json {
                return print_json(&summary);
            }
            if summary.tools.is_empty() {
                println!("No progress recorded yet for {}", user_id.cyan());
            }
            for (tool, progress) in &summary.tools {
                println!(
                    "{} {}",
                    tool.bold().cyan(),
                    format!("(started {})", progress.started.format("%Y-%m-%d %H:%M")).dimmed()
                );
                for m in &progress.milestones {
                    let mark = if m.completed { "✓".green() } else { "·".yellow() };
                    println!(
                        "  {} {} {}",
                        mark,
                        m.milestone,
                        m.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed()
                    );
                }
            }
        }
        Command::Session { user_id, tool } => {
            let outcome = store.sessions.apply(&user_id, &tool, SessionAction::GetCurrent)?;
            if cli.json {
                return print_json(&outcome);
            }
            match outcome {
                SessionOutcome::Current(current) => match current.session {
                    Some(session) => {
                        println!("Session: {} / {}", session.user_id.cyan(), session.tool_name.cyan());
                        println!("  Started: {}", session.started.format("%Y-%m-%d %H:%M"));
                        println!("  Current module: {}", session.current_module);
                        for done in &session.modules_completed {
                            println!("  {} {} (module {})", "✓".green(), done.module_name, done.module_number);
                        }
                    }
                    None => println!("No active session"),
                },
                other => print_json(&other)?,
            }
        }
        Command::Lessons { tool: None } => {
            let folders = store.lessons.list_folders()?;
            if cli.json {
                return print_json(&folders);
            }
            if folders.is_empty() {
                println!("No lesson folders found");
            }
            for folder in folders {
                println!("{}", folder);
            }
        }
        Command::Lessons { tool: Some(tool) } => match store.lessons.list_files(&tool)? {
            Some(files) if cli.json => print_json(&files)?,
            Some(files) => {
                for file in files {
                    println!("{}", file);
                }
            }
            None => {
                eprintln!("{} No lesson folder for {}", "✗".red(), tool);
                std::process::exit(1);
            }
        },
        Command::Show { tool, file } => {
            let outcome = store.lessons.read_file(&tool, &file)?;
            if cli.json {
                return print_json(&outcome);
            }
            match (outcome.status, outcome.content) {
                (Status::Success, Some(content)) => println!("{}", content),
                _ => {
                    eprintln!("{} {}", "✗".red(), outcome.message);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

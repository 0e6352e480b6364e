//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// newtool - multi-agent learning assistant
#[derive(Parser, Debug)]
#[command(
    name = "nt",
    version,
    about = "Multi-agent learning assistant: research, roadmaps and module-by-module lessons for new tools"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Learner id, overriding `user.user-id`
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Data directory, overriding `storage.data-dir`
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to execute (defaults to chat)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive assistant
    Chat {
        /// First message to send before the prompt appears
        initial: Option<String>,
    },

    /// Run one turn and print the answer
    Ask {
        /// Message for the assistant
        #[arg(required = true)]
        prompt: String,
    },
}

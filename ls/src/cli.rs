//! CLI argument parsing for lessonstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nt-ls")]
#[command(author, version, about = "Inspect newtool lessons, progress and sessions", long_about = None)]
pub struct Cli {
    /// Directory holding progress/session files and the lessons folder
    #[arg(short, long, global = true, default_value = ".")]
    pub data_dir: PathBuf,

    /// Lessons directory, relative to the data directory
    #[arg(long, global = true, default_value = crate::DEFAULT_LESSONS_DIR)]
    pub lessons_dir: PathBuf,

    /// Print raw JSON outcomes
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a user's progress summary
    Progress {
        /// User identifier
        #[arg(required = true)]
        user_id: String,
    },

    /// Show the learning session for a user and tool
    Session {
        /// User identifier
        #[arg(required = true)]
        user_id: String,

        /// Tool name (any spelling that slugs the same)
        #[arg(required = true)]
        tool: String,
    },

    /// List lesson folders, or the files of one tool
    Lessons {
        /// Tool name
        tool: Option<String>,
    },

    /// Print one lesson file
    Show {
        /// Tool name
        #[arg(required = true)]
        tool: String,

        /// File name inside the tool folder (e.g. module_1.md)
        #[arg(required = true)]
        file: String,
    },
}

//! Interactive REPL
//!
//! Reads lines with rustyline, hands them to the orchestrator and renders the
//! answers.

mod render;
mod session;

pub use render::render_markdown;
pub use session::{Input, ReplSession, classify_input};

use eyre::Result;
use tracing::debug;

use crate::agents::AgentRuntime;
use crate::config::Config;

/// Run the interactive REPL
pub async fn run_interactive(config: &Config, runtime: AgentRuntime, initial: Option<String>) -> Result<()> {
    debug!(has_initial = initial.is_some(), "run_interactive: called");
    let mut session = ReplSession::new(runtime, &config.user.app_name, &config.user.user_id);
    session.run(initial).await
}

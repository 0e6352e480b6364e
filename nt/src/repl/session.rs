//! REPL session management

use std::io::{self, Write};

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::render::render_markdown;
use crate::agents::{AgentEvent, AgentRuntime, MAIN_AGENT};
use crate::llm::Message;

/// What a line typed at the prompt means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Help,
    Exit,
    Prompt(String),
}

/// Classify a line read from the prompt
pub fn classify_input(line: &str) -> Input {
    let input = line.trim();
    if input.is_empty() {
        return Input::Empty;
    }
    match input.to_lowercase().as_str() {
        "exit" | "quit" => Input::Exit,
        "help" => Input::Help,
        _ => Input::Prompt(input.to_string()),
    }
}

/// Interactive session with the orchestrator
pub struct ReplSession {
    runtime: AgentRuntime,
    transcript: Vec<Message>,
    events: mpsc::UnboundedReceiver<AgentEvent>,
    app_name: String,
    user_id: String,
    lessons_dir: String,
}

impl ReplSession {
    pub fn new(runtime: AgentRuntime, app_name: impl Into<String>, user_id: impl Into<String>) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let runtime = runtime.with_events(tx);
        let lessons_dir = runtime.store().lessons.root().display().to_string();
        Self {
            runtime,
            transcript: Vec::new(),
            events,
            app_name: app_name.into(),
            user_id: user_id.into(),
            lessons_dir,
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self, initial: Option<String>) -> Result<()> {
        self.print_welcome();

        if let Some(prompt) = initial {
            println!("{} {}", "You:".bright_green(), prompt);
            self.process_user_input(&prompt).await;
        }

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", "You:".bright_green()));

            match readline {
                Ok(line) => match classify_input(&line) {
                    Input::Empty => continue,
                    Input::Help => self.print_help(),
                    Input::Exit => break,
                    Input::Prompt(prompt) => {
                        let _ = rl.add_history_entry(&prompt);
                        self.process_user_input(&prompt).await;
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("\n👋 Goodbye! Keep learning, keep growing! 🚀");
        Ok(())
    }

    fn print_welcome(&self) {
        let rule = "=".repeat(70);
        println!("{}", rule);
        println!("{}", format!("🚀 {} - AI Learning Assistant", self.app_name).bright_cyan().bold());
        println!("{}", rule);
        println!("Learner: {}", self.user_id.yellow());
        println!("💾 Lessons are saved to {}/<tool>/", self.lessons_dir);
        println!();
        println!(
            "✅ System ready! Type {} for commands or {} to quit.",
            "help".yellow(),
            "exit".yellow()
        );
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "📖 Available Commands:".bright_cyan());
        println!("  • {:22} Research a tool and create a learning roadmap", "learn <tool name>".yellow());
        println!("  • {:22} Generate a module (lesson, examples, quiz)", "start module 1".yellow());
        println!("  • {:22} Check your learning progress", "progress".yellow());
        println!("  • {:22} Show this help message", "help".yellow());
        println!("  • {:22} Quit the assistant", "exit".yellow());
        println!();
        println!("💡 Tip: All lessons are saved to {}/<tool>/", self.lessons_dir);
        println!();
    }

    /// Run one orchestrator turn, printing progress as it happens
    ///
    /// Errors are reported and the session carries on.
    async fn process_user_input(&mut self, input: &str) {
        debug!(input_len = input.len(), "ReplSession::process_user_input: called");
        println!();
        println!("{}", "🤖 Assistant:".bright_blue().bold());
        println!("{}", "-".repeat(70).dimmed());

        let streaming = self.runtime.streaming();
        let result = {
            let turn = self.runtime.turn(&mut self.transcript, input);
            tokio::pin!(turn);
            loop {
                tokio::select! {
                    result = &mut turn => break result,
                    Some(event) = self.events.recv() => print_event(&event),
                }
            }
        };
        while let Ok(event) = self.events.try_recv() {
            print_event(&event);
        }

        match result {
            Ok(answer) => {
                info!(answer_len = answer.len(), "turn complete");
                if streaming {
                    println!();
                } else {
                    print!("{}", render_markdown(&answer));
                }
            }
            Err(e) => {
                warn!(error = %e, "turn failed");
                println!("{} {:#}", "❌ Error:".red(), e);
                println!("Please try again or type 'help' for assistance.");
            }
        }
        println!("{}", "-".repeat(70).dimmed());
        println!();
    }
}

/// Print one progress event
fn print_event(event: &AgentEvent) {
    match event {
        AgentEvent::ToolCall { agent, tool } => {
            let line = if agent == MAIN_AGENT {
                format!("[{}]", tool)
            } else {
                format!("[{} → {}]", agent, tool)
            };
            println!("{}", line.dimmed());
        }
        AgentEvent::ToolDone {
            agent,
            tool,
            is_error: true,
        } => {
            println!("{}", format!("[{} failed in {}]", tool, agent).red());
        }
        AgentEvent::TextDelta(text) => {
            print!("{}", text);
            let _ = io::stdout().flush();
        }
        AgentEvent::RoundsExhausted { agent } => {
            println!("{}", format!("[{} ran out of tool rounds]", agent).yellow());
        }
        AgentEvent::Thinking { .. } | AgentEvent::ToolDone { .. } | AgentEvent::Finished { .. } => {}
    }
}

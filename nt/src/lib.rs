//! newtool - multi-agent learning assistant
//!
//! An orchestrator agent talks with the learner and delegates to seven
//! specialists (research, planning, teaching, examples, quizzes, progress
//! tracking, notifications). Everything it produces is written through the
//! `lessonstore` crate.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and Gemini implementation
//! - [`agents`] - agent roster, instructions and runtime
//! - [`tools`] - tools the agents call
//! - [`memory`] - in-process conversation memory
//! - [`repl`] - interactive terminal loop
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod agents;
pub mod cli;
pub mod config;
pub mod llm;
pub mod memory;
pub mod repl;
pub mod tools;

pub use agents::{AgentEvent, AgentRoster, AgentRuntime, AgentSpec};
pub use config::Config;
pub use llm::{LlmClient, create_client};
pub use memory::MemoryStore;

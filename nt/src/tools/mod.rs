//! Tool system for the learning agents
//!
//! Tools expose the lesson, progress and session stores (and delegation to
//! specialists) to the model. Every tool answers with a JSON outcome document;
//! failures are `{status: "error", error_message}` results, never panics.

mod args;
mod context;
mod error;
mod executor;
mod traits;

pub mod builtin;

pub use context::{AgentSpawner, AgentSpawnerRef, Delegation, ToolContext};
pub use error::ToolError;
pub use executor::ToolExecutor;
pub use traits::{Tool, ToolResult};

#[cfg(test)]
pub(crate) use context::test_support;

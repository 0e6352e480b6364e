//! Tool trait definition

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use lessonstore::{ErrorOutcome, StoreError};

use super::context::ToolContext;

/// A tool that can be called by the LLM
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the function call name)
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult;
}

/// Result of a tool execution
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }

    /// Serialize an outcome document as the result
    pub fn outcome<T: Serialize>(outcome: &T) -> Self {
        match serde_json::to_string(outcome) {
            Ok(json) => Self::success(json),
            Err(e) => Self::error_outcome(format!("Failed to serialize result: {}", e)),
        }
    }

    /// `{status: "error", error_message}` result for a failed store operation
    pub fn store_error(action: &str, err: &StoreError) -> Self {
        debug!(%action, error = %err, "ToolResult::store_error: called");
        let outcome = ErrorOutcome::from_error(action, err);
        Self {
            content: serde_json::to_string(&outcome).unwrap_or_else(|_| outcome.error_message.clone()),
            is_error: true,
        }
    }

    /// `{status: "error", error_message}` result for any other failure
    pub fn error_outcome(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::error(serde_json::json!({ "status": "error", "error_message": message }).to_string())
    }

    /// Parse the content as JSON (outcome documents always parse)
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.content).ok()
    }
}

//! Tool error types

use thiserror::Error;

use lessonstore::StoreError;

use super::ToolResult;

/// Errors that can occur during tool execution
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{name} is required")]
    MissingArgument { name: &'static str },

    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Tool not found: {name}")]
    UnknownTool { name: String },

    #[error("Tool {tool} is not available to {agent}")]
    NotPermitted { tool: String, agent: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Delegation failed: {0}")]
    Delegation(String),
}

impl ToolError {
    /// Convert into an error outcome result
    ///
    /// `action` is used to phrase store failures ("Failed to save file: ...").
    pub fn into_result(self, action: &str) -> ToolResult {
        match &self {
            ToolError::Store(err) => ToolResult::store_error(action, err),
            _ => ToolResult::error_outcome(self.to_string()),
        }
    }
}

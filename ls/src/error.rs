//! Store error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt JSON in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid filename '{name}': {reason}")]
    InvalidFilename { name: String, reason: &'static str },

    #[error("No active session found. Start a new session first.")]
    NoActiveSession { user_id: String, tool_name: String },

    #[error("Unknown action: {action}")]
    UnknownAction { action: String },
}

impl StoreError {
    /// Wrap an io::Error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for conditions caused by the caller rather than the filesystem
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidFilename { .. } | StoreError::NoActiveSession { .. } | StoreError::UnknownAction { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_message_includes_path() {
        let err = StoreError::io(
            "/tmp/lessons/x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/lessons/x"));
        assert!(msg.contains("denied"));
        assert!(!err.is_caller_error());
    }

    #[test]
    fn test_unknown_action_message() {
        let err = StoreError::UnknownAction {
            action: "frobnicate".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown action: frobnicate");
        assert!(err.is_caller_error());
    }
}

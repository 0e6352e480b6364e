//! Structured operation results
//!
//! Every store operation reports a `status` field. Failures are never raised
//! to the agent calling the tool; they become an [`ErrorOutcome`].

use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Status tag carried by every outcome document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Created,
    Exists,
    NotFound,
    Error,
}

/// `{status: "error", error_message}` result for a failed operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutcome {
    pub status: Status,
    pub error_message: String,
}

impl ErrorOutcome {
    /// Build an error outcome from a store error
    ///
    /// `action` prefixes filesystem failures ("Failed to save file: ...");
    /// caller errors such as an unknown session action are reported verbatim.
    pub fn from_error(action: &str, err: &StoreError) -> Self {
        let error_message = if err.is_caller_error() {
            err.to_string()
        } else {
            format!("Failed to {}: {}", action, err)
        };
        Self {
            status: Status::Error,
            error_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Status::NotFound).unwrap(), "\"not_found\"");
        assert_eq!(serde_json::to_string(&Status::Exists).unwrap(), "\"exists\"");
    }

    #[test]
    fn test_error_outcome_prefixes_io_failures() {
        let err = StoreError::io("/x", std::io::Error::other("disk full"));
        let outcome = ErrorOutcome::from_error("save file", &err);
        assert_eq!(outcome.status, Status::Error);
        assert!(outcome.error_message.starts_with("Failed to save file:"));
    }

    #[test]
    fn test_error_outcome_keeps_caller_errors_verbatim() {
        let err = StoreError::UnknownAction {
            action: "rewind".to_string(),
        };
        let value = serde_json::to_value(ErrorOutcome::from_error("manage session", &err)).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error_message"], "Unknown action: rewind");
    }
}

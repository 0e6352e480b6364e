//! Progress tools - record milestones and summarize them

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::tools::args::{optional_bool, required_str};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Append a milestone to a learner's progress file
pub struct TrackProgressTool;

#[async_trait]
impl Tool for TrackProgressTool {
    fn name(&self) -> &str {
        "track_progress"
    }

    fn description(&self) -> &str {
        "Record a learning milestone for a user on a tool, e.g. 'Completed Module 1: Basics'. \
         Milestones are appended; nothing is ever removed."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "Learner id; defaults to the current learner"
                },
                "tool_name": {
                    "type": "string",
                    "description": "Name of the tool or technology"
                },
                "milestone": {
                    "type": "string",
                    "description": "What was achieved"
                },
                "completed": {
                    "type": "boolean",
                    "description": "Whether the milestone is complete (true when omitted)"
                }
            },
            "required": ["tool_name", "milestone"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "TrackProgressTool::execute: called");
        let args = required_str(&input, "tool_name").and_then(|t| Ok((t, required_str(&input, "milestone")?)));
        let (tool_name, milestone) = match args {
            Ok(args) => args,
            Err(e) => return e.into_result("track progress"),
        };
        let user_id = ctx.user_for(&input);
        let completed = optional_bool(&input, "completed", true);

        match ctx.store.progress.track_progress(user_id, tool_name, milestone, completed) {
            Ok(outcome) => {
                info!(%user_id, %tool_name, %milestone, total = outcome.total_milestones, "milestone tracked");
                ToolResult::outcome(&outcome)
            }
            Err(e) => ToolError::from(e).into_result("track progress"),
        }
    }
}

/// Summarize everything recorded for a learner
pub struct GetProgressSummaryTool;

#[async_trait]
impl Tool for GetProgressSummaryTool {
    fn name(&self) -> &str {
        "get_progress_summary"
    }

    fn description(&self) -> &str {
        "Get every tool a user is learning with its recorded milestones."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "Learner id; defaults to the current learner"
                }
            }
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "GetProgressSummaryTool::execute: called");
        let user_id = ctx.user_for(&input);

        match ctx.store.progress.progress_summary(user_id) {
            Ok(summary) => ToolResult::outcome(&summary),
            Err(e) => ToolError::from(e).into_result("get progress"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::temp_context;
    use serde_json::json;

    #[tokio::test]
    async fn test_track_uses_session_user_by_default() {
        let (temp, ctx) = temp_context();
        let result = TrackProgressTool
            .execute(json!({"tool_name": "FastAPI", "milestone": "Started"}), &ctx)
            .await;

        assert!(!result.is_error);
        assert_eq!(result.json().unwrap()["total_milestones"], 1);
        assert!(temp.path().join("progress_learner_001.json").is_file());
    }

    #[tokio::test]
    async fn test_track_then_summary() {
        let (_temp, ctx) = temp_context();
        for milestone in ["Started", "Finished module 1"] {
            TrackProgressTool
                .execute(
                    json!({"user_id": "bob", "tool_name": "Rust", "milestone": milestone, "completed": false}),
                    &ctx,
                )
                .await;
        }

        let summary = GetProgressSummaryTool.execute(json!({"user_id": "bob"}), &ctx).await;
        let json = summary.json().unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["tools_count"], 1);
        let milestones = json["tools"]["Rust"]["milestones"].as_array().unwrap();
        assert_eq!(milestones.len(), 2);
        assert_eq!(milestones[1]["completed"], false);
    }

    #[tokio::test]
    async fn test_summary_without_progress() {
        let (_temp, ctx) = temp_context();
        let summary = GetProgressSummaryTool.execute(json!({}), &ctx).await;

        assert!(!summary.is_error);
        let json = summary.json().unwrap();
        assert_eq!(json["message"], "No progress recorded yet");
        assert_eq!(json["tools_count"], 0);
    }

    #[tokio::test]
    async fn test_track_requires_milestone() {
        let (_temp, ctx) = temp_context();
        let result = TrackProgressTool.execute(json!({"tool_name": "Rust"}), &ctx).await;
        assert!(result.is_error);
        assert_eq!(result.json().unwrap()["error_message"], "milestone is required");
    }

    #[tokio::test]
    async fn test_track_rejects_user_id_escape() {
        let (temp, ctx) = temp_context();
        let result = TrackProgressTool
            .execute(json!({"user_id": "../u", "tool_name": "FastAPI", "milestone": "Started"}), &ctx)
            .await;

        assert!(result.is_error);
        assert_eq!(result.json().unwrap()["status"], "error");
        assert!(std::fs::read_dir(temp.path()).unwrap().next().is_none());
    }
}

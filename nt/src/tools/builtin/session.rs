//! Learning session tool - module-by-module walkthrough state

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use lessonstore::SessionAction;

use crate::tools::args::{optional_str, required_str};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

pub struct ManageLearningSessionTool;

#[async_trait]
impl Tool for ManageLearningSessionTool {
    fn name(&self) -> &str {
        "manage_learning_session"
    }

    fn description(&self) -> &str {
        "Manage a step-by-step learning session for a user on a tool. Actions: \
         'start' begins a new session at module 0, 'next_module' moves to the next module, \
         'complete_module' records the current module as done, 'get_current' returns the session."
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
                "action": {
                    "type": "string",
                    "enum": ["start", "next_module", "complete_module", "get_current"],
                    "description": "What to do with the session"
                },
                "module_name": {
                    "type": "string",
                    "description": "Name of the completed module (complete_module only)"
                }
            },
            "required": ["tool_name", "action"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "ManageLearningSessionTool::execute: called");
        let args = required_str(&input, "tool_name").and_then(|t| Ok((t, required_str(&input, "action")?)));
        let (tool_name, action) = match args {
            Ok(args) => args,
            Err(e) => return e.into_result("manage session"),
        };
        let user_id = ctx.user_for(&input);

        let action = match SessionAction::parse(action, optional_str(&input, "module_name")) {
            Ok(action) => action,
            Err(e) => return ToolError::from(e).into_result("manage session"),
        };

        match ctx.store.sessions.apply(user_id, tool_name, action.clone()) {
            Ok(outcome) => {
                info!(%user_id, %tool_name, action = action.as_str(), "session updated");
                ToolResult::outcome(&outcome)
            }
            Err(e) => ToolError::from(e).into_result("manage session"),
        }
    }
}

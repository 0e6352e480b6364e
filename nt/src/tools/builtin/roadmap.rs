//! Save roadmap tool - writes `roadmap.md` with a generated header

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::tools::args::{required_str, required_text};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

pub struct SaveLearningRoadmapTool;

#[async_trait]
impl Tool for SaveLearningRoadmapTool {
    fn name(&self) -> &str {
        "save_learning_roadmap"
    }

    fn description(&self) -> &str {
        "Save a learning roadmap as roadmap.md in the tool's lesson folder, \
         with a title and generation timestamp added above it."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "tool_name": {
                    "type": "string",
                    "description": "Name of the tool or technology"
                },
                "roadmap": {
                    "type": "string",
                    "description": "The complete roadmap as markdown"
                }
            },
            "required": ["tool_name", "roadmap"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(tool_name = ?input.get("tool_name"), "SaveLearningRoadmapTool::execute: called");
        let args = required_str(&input, "tool_name").and_then(|t| Ok((t, required_text(&input, "roadmap")?)));
        let (tool_name, roadmap) = match args {
            Ok(args) => args,
            Err(e) => return e.into_result("save roadmap"),
        };

        match ctx.store.lessons.save_roadmap(tool_name, roadmap) {
            Ok(outcome) => {
                info!(%tool_name, "roadmap saved");
                ToolResult::outcome(&outcome)
            }
            Err(e) => ToolError::from(e).into_result("save roadmap"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::temp_context;
    use serde_json::json;

    #[tokio::test]
    async fn test_roadmap_has_header() {
        let (temp, ctx) = temp_context();
        let result = SaveLearningRoadmapTool
            .execute(json!({"tool_name": "FastAPI", "roadmap": "1. Basics"}), &ctx)
            .await;

        assert!(!result.is_error);
        let text = std::fs::read_to_string(temp.path().join("lessons/fastapi/roadmap.md")).unwrap();
        assert!(text.starts_with("# Learning Roadmap: FastAPI\n\nGenerated: "));
        assert!(text.ends_with("1. Basics"));
    }
}

//! Assemble module tool - combines lesson, examples and quiz into `module_{n}.md`

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use lessonstore::{ModuleParts, assemble_module};

use crate::tools::args::{required_str, required_text, required_u32};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

pub struct AssembleModuleFileTool;

#[async_trait]
impl Tool for AssembleModuleFileTool {
    fn name(&self) -> &str {
        "assemble_module_file"
    }

    fn description(&self) -> &str {
        "Combine the lesson, code examples and quiz for one module into a single \
         module_{n}.md file in the tool's lesson folder. Returns the absolute path of the file."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "tool_name": {
                    "type": "string",
                    "description": "Name of the tool or technology"
                },
                "module_number": {
                    "type": "integer",
                    "description": "Module number, starting at 1"
                },
                "lesson": {
                    "type": "string",
                    "description": "Lesson markdown from teacher_agent"
                },
                "examples": {
                    "type": "string",
                    "description": "Code examples markdown from example_agent"
                },
                "quiz": {
                    "type": "string",
                    "description": "Quiz markdown from quiz_agent"
                }
            },
            "required": ["tool_name", "module_number", "lesson", "examples", "quiz"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(
            tool_name = ?input.get("tool_name"),
            module_number = ?input.get("module_number"),
            "AssembleModuleFileTool::execute: called"
        );
        let (tool_name, module_number, parts) = match parse_args(&input) {
            Ok(args) => args,
            Err(e) => return e.into_result("assemble module"),
        };

        match assemble_module(&ctx.store.lessons, tool_name, module_number, &parts) {
            Ok(outcome) => {
                info!(%tool_name, module_number, path = %outcome.absolute_path.display(), "module assembled");
                ToolResult::outcome(&outcome)
            }
            Err(e) => ToolError::from(e).into_result("assemble module"),
        }
    }
}

fn parse_args(input: &Value) -> Result<(&str, u32, ModuleParts<'_>), ToolError> {
    Ok((
        required_str(input, "tool_name")?,
        required_u32(input, "module_number")?,
        ModuleParts {
            lesson: required_text(input, "lesson")?,
            examples: required_text(input, "examples")?,
            quiz: required_text(input, "quiz")?,
        },
    ))
}

//! Lesson folder tools - create, save to and read from `lessons/{slug}/`

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::tools::args::{required_str, required_text};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Create (or find) the lesson folder for a tool
pub struct CreateToolFolderTool;

#[async_trait]
impl Tool for CreateToolFolderTool {
    fn name(&self) -> &str {
        "create_tool_folder"
    }

    fn description(&self) -> &str {
        "Create the lesson folder for a tool or technology. If the folder already exists, \
         returns status 'exists' and lists the files already in it. Call this first for any new tool."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "tool_name": {
                    "type": "string",
                    "description": "Name of the tool or technology, e.g. 'FastAPI'"
                }
            },
            "required": ["tool_name"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "CreateToolFolderTool::execute: called");
        let tool_name = match required_str(&input, "tool_name") {
            Ok(t) => t,
            Err(e) => return e.into_result("create folder"),
        };

        match ctx.store.lessons.create_folder(tool_name) {
            Ok(outcome) => {
                info!(%tool_name, status = ?outcome.status, "lesson folder ready");
                ToolResult::outcome(&outcome)
            }
            Err(e) => ToolError::from(e).into_result("create folder"),
        }
    }
}

/// Write a file into a tool's lesson folder
pub struct SaveToToolFolderTool;

#[async_trait]
impl Tool for SaveToToolFolderTool {
    fn name(&self) -> &str {
        "save_to_tool_folder"
    }

    fn description(&self) -> &str {
        "Save content to a file in the tool's lesson folder, e.g. research.md or roadmap.md. \
         Overwrites any existing file with the same name."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "tool_name": {
                    "type": "string",
                    "description": "Name of the tool or technology"
                },
                "filename": {
                    "type": "string",
                    "description": "File name inside the folder, e.g. 'research.md'"
                },
                "content": {
                    "type": "string",
                    "description": "Markdown content to write"
                }
            },
            "required": ["tool_name", "filename", "content"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(filename = ?input.get("filename"), "SaveToToolFolderTool::execute: called");
        let args = required_str(&input, "tool_name").and_then(|tool_name| {
            let filename = required_str(&input, "filename")?;
            let content = required_text(&input, "content")?;
            Ok((tool_name, filename, content))
        });
        let (tool_name, filename, content) = match args {
            Ok(args) => args,
            Err(e) => return e.into_result("save file"),
        };

        match ctx.store.lessons.save_file(tool_name, filename, content) {
            Ok(outcome) => {
                info!(%tool_name, %filename, "lesson file saved");
                ToolResult::outcome(&outcome)
            }
            Err(e) => ToolError::from(e).into_result("save file"),
        }
    }
}

/// Read a file from a tool's lesson folder
pub struct ReadFromToolFolderTool;

#[async_trait]
impl Tool for ReadFromToolFolderTool {
    fn name(&self) -> &str {
        "read_from_tool_folder"
    }

    fn description(&self) -> &str {
        "Read a file from the tool's lesson folder. A missing file returns status 'not_found' \
         with null content; use this to check for existing research or roadmaps."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "tool_name": {
                    "type": "string",
                    "description": "Name of the tool or technology"
                },
                "filename": {
                    "type": "string",
                    "description": "File name inside the folder, e.g. 'roadmap.md'"
                }
            },
            "required": ["tool_name", "filename"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "ReadFromToolFolderTool::execute: called");
        let args = required_str(&input, "tool_name")
            .and_then(|tool_name| Ok((tool_name, required_str(&input, "filename")?)));
        let (tool_name, filename) = match args {
            Ok(args) => args,
            Err(e) => return e.into_result("read file"),
        };

        match ctx.store.lessons.read_file(tool_name, filename) {
            Ok(outcome) => ToolResult::outcome(&outcome),
            Err(e) => ToolError::from(e).into_result("read file"),
        }
    }
}

//! Load memory tool - keyword search over this session's memory

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::tools::args::required_str;
use crate::tools::{Tool, ToolContext, ToolResult};

pub struct LoadMemoryTool;

#[async_trait]
impl Tool for LoadMemoryTool {
    fn name(&self) -> &str {
        "load_memory"
    }

    fn description(&self) -> &str {
        "Search earlier conversation in this session. Returns every remembered message \
         sharing at least one word with the query."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Words to look for, e.g. 'FastAPI module progress'"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "LoadMemoryTool::execute: called");
        let query = match required_str(&input, "query") {
            Ok(q) => q,
            Err(e) => return e.into_result("load memory"),
        };

        ToolResult::outcome(&ctx.memory.load(query).await)
    }
}

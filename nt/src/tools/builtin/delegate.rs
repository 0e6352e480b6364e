//! Delegate tool - hand a request to a specialist agent
//!
//! One instance per specialist; the tool name is the specialist's name. The
//! specialist starts from an empty transcript, so the request must carry all
//! the context it needs.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::tools::args::required_str;
use crate::tools::{Delegation, Tool, ToolContext, ToolError, ToolResult};

pub struct DelegateTool {
    agent: String,
    description: String,
}

impl DelegateTool {
    pub fn new(agent: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            description: description.into(),
        }
    }
}

#[async_trait]
impl Tool for DelegateTool {
    fn name(&self) -> &str {
        &self.agent
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "request": {
                    "type": "string",
                    "description": "Complete, self-contained request for the specialist"
                }
            },
            "required": ["request"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(agent = %self.agent, parent = %ctx.agent, "DelegateTool::execute: called");

        let Some(spawner) = &ctx.spawner else {
            debug!(agent = %self.agent, "DelegateTool::execute: no spawner in this context");
            return ToolError::Delegation(format!("{} is not available from {}", self.agent, ctx.agent))
                .into_result("delegate");
        };

        let request = match required_str(&input, "request") {
            Ok(r) => r,
            Err(e) => return e.into_result("delegate"),
        };

        let delegation = Delegation {
            agent: self.agent.clone(),
            request: request.to_string(),
            parent: ctx.agent.clone(),
        };

        info!(agent = %self.agent, parent = %ctx.agent, request_len = request.len(), "delegating to specialist");
        match spawner.spawn(delegation).await {
            Ok(answer) => {
                debug!(agent = %self.agent, answer_len = answer.len(), "DelegateTool::execute: specialist finished");
                ToolResult::success(answer)
            }
            Err(e) => ToolError::Delegation(format!("{}: {}", self.agent, e)).into_result("delegate"),
        }
    }
}

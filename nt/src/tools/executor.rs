//! ToolExecutor - manages tool execution for the agents

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::llm::{ToolCall, ToolDefinition};

use super::builtin::{
    AssembleModuleFileTool, CreatePracticeQuizTool, CreateToolFolderTool, DelegateTool, GetProgressSummaryTool,
    LoadMemoryTool, ManageLearningSessionTool, ReadFromToolFolderTool, SaveLearningRoadmapTool, SaveToToolFolderTool,
    TrackProgressTool,
};
use super::{Tool, ToolContext, ToolError, ToolResult};

/// Registry of every tool; agents see the subset their spec names
pub struct ToolExecutor {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolExecutor {
    /// Create executor with every built-in function tool (no delegation tools)
    pub fn standard() -> Self {
        debug!("ToolExecutor::standard: called");
        let mut executor = Self::empty();

        // Lesson folder tools
        executor.add_tool(Arc::new(CreateToolFolderTool));
        executor.add_tool(Arc::new(SaveToToolFolderTool));
        executor.add_tool(Arc::new(ReadFromToolFolderTool));
        executor.add_tool(Arc::new(SaveLearningRoadmapTool));
        executor.add_tool(Arc::new(AssembleModuleFileTool));

        // Progress and session state
        executor.add_tool(Arc::new(TrackProgressTool));
        executor.add_tool(Arc::new(GetProgressSummaryTool));
        executor.add_tool(Arc::new(ManageLearningSessionTool));

        // Helpers
        executor.add_tool(Arc::new(CreatePracticeQuizTool));
        executor.add_tool(Arc::new(LoadMemoryTool));

        executor
    }

    /// Create an empty executor (for testing)
    pub fn empty() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Add a tool to the executor
    pub fn add_tool(&mut self, tool: Arc<dyn Tool>) {
        debug!(tool_name = %tool.name(), "ToolExecutor::add_tool: called");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Add a delegation tool that runs `agent_name`
    pub fn add_delegate(&mut self, agent_name: &str, description: &str) {
        self.add_tool(Arc::new(DelegateTool::new(agent_name, description)));
    }

    /// Get definitions for a subset of tools by name, in the order given
    pub fn definitions_for(&self, tool_names: &[String]) -> Vec<ToolDefinition> {
        debug!(?tool_names, "ToolExecutor::definitions_for: called");
        tool_names
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.input_schema()))
            .collect()
    }

    /// Execute a tool call
    pub async fn execute(&self, tool_call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        debug!(
            tool_name = %tool_call.name,
            tool_id = %tool_call.id,
            agent = %ctx.agent,
            "ToolExecutor::execute: called"
        );
        match self.tools.get(&tool_call.name) {
            Some(tool) => tool.execute(tool_call.input.clone(), ctx).await,
            None => ToolError::UnknownTool {
                name: tool_call.name.clone(),
            }
            .into_result("run tool"),
        }
    }

    /// Execute a tool call only if `allowed` names it
    pub async fn execute_allowed(&self, tool_call: &ToolCall, allowed: &[String], ctx: &ToolContext) -> ToolResult {
        if !allowed.iter().any(|name| name == &tool_call.name) {
            debug!(tool_name = %tool_call.name, agent = %ctx.agent, "ToolExecutor::execute_allowed: not permitted");
            return ToolError::NotPermitted {
                tool: tool_call.name.clone(),
                agent: ctx.agent.clone(),
            }
            .into_result("run tool");
        }
        self.execute(tool_call, ctx).await
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::standard()
    }
}

//! ToolContext - execution context for tools

use std::sync::Arc;
use tracing::debug;

use lessonstore::LearningStore;

use crate::memory::MemoryStore;

/// A request from one agent to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    /// Specialist to run
    pub agent: String,

    /// Self-contained request text; the specialist sees nothing else
    pub request: String,

    /// Agent that asked
    pub parent: String,
}

/// Trait for running specialist agents - allows dependency injection
#[async_trait::async_trait]
pub trait AgentSpawner: Send + Sync {
    /// Run the specialist to completion and return its final answer
    async fn spawn(&self, delegation: Delegation) -> eyre::Result<String>;
}

/// Type alias for shared agent spawner
pub type AgentSpawnerRef = Arc<dyn AgentSpawner>;

/// Execution context for tools - scoped to one agent run
///
/// Specialists get a context without a spawner, so delegation cannot nest.
#[derive(Clone)]
pub struct ToolContext {
    /// Lesson, progress and session stores
    pub store: Arc<LearningStore>,

    /// Session memory
    pub memory: Arc<MemoryStore>,

    /// Learner the tools act for, unless a call names another
    pub user_id: String,

    /// Agent currently running
    pub agent: String,

    /// Optional callback for delegating to specialists
    pub spawner: Option<AgentSpawnerRef>,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(
        store: Arc<LearningStore>,
        memory: Arc<MemoryStore>,
        user_id: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        let user_id = user_id.into();
        let agent = agent.into();
        debug!(%user_id, %agent, "ToolContext::new: called");
        Self {
            store,
            memory,
            user_id,
            agent,
            spawner: None,
        }
    }

    /// Builder method to set the agent spawner
    pub fn with_spawner(mut self, spawner: AgentSpawnerRef) -> Self {
        debug!(%self.agent, "ToolContext::with_spawner: called");
        self.spawner = Some(spawner);
        self
    }

    /// User id from the call input, falling back to the session's learner
    pub fn user_for<'a>(&'a self, input: &'a serde_json::Value) -> &'a str {
        super::args::optional_str(input, "user_id").unwrap_or(&self.user_id)
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("data_dir", &self.store.data_dir())
            .field("user_id", &self.user_id)
            .field("agent", &self.agent)
            .field("can_delegate", &self.spawner.is_some())
            .finish()
    }
}

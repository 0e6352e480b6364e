//! AgentRuntime - runs agents against the LLM with their tools
//!
//! One run: send the transcript and tool declarations, execute requested tool
//! calls, feed the results back, repeat until the model answers in text. After
//! `max_tool_rounds` rounds it asks once more with tools disabled.
//!
//! The orchestrator's transcript is owned by the caller and spans REPL turns.
//! Specialists start from a single user message every time and get no spawner,
//! so they cannot delegate further.

use std::sync::Arc;

use eyre::{Context, Result, eyre};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use lessonstore::LearningStore;

use super::roster::{AgentRoster, AgentSpec, MAIN_AGENT};
use crate::config::Config;
use crate::llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, Message, StreamChunk, TokenUsage, ToolCall,
    ToolDefinition,
};
use crate::memory::MemoryStore;
use crate::tools::{AgentSpawner, Delegation, ToolContext, ToolExecutor, ToolResult};

const FORCE_FINAL_PROMPT: &str = "You have used every tool round available for this request. \
     Do not call any more tools. Reply now with your final answer based on what you have so far.";

/// Progress notifications for display
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// Request sent for `round` (1-based)
    Thinking { agent: String, round: u32 },

    /// A tool (or specialist) is about to run
    ToolCall { agent: String, tool: String },

    /// A tool returned
    ToolDone { agent: String, tool: String, is_error: bool },

    /// Streamed answer text of the orchestrator
    TextDelta(String),

    /// Round limit hit; a final answer was requested without tools
    RoundsExhausted { agent: String },

    /// Agent produced its final answer
    Finished { agent: String, usage: TokenUsage },
}

/// Sender half of the event channel
pub type EventSender = mpsc::UnboundedSender<AgentEvent>;

/// Runs the orchestrator and its specialists
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct AgentRuntime {
    llm: Arc<dyn LlmClient>,
    roster: Arc<AgentRoster>,
    tools: Arc<ToolExecutor>,
    store: Arc<LearningStore>,
    memory: Arc<MemoryStore>,
    user_id: String,
    max_tool_rounds: u32,
    max_tokens: u32,
    preload: bool,
    stream: bool,
    events: Option<EventSender>,
}

impl AgentRuntime {
    /// Open the stores and build the roster and tool registry from config
    pub fn from_config(config: &Config, llm: Arc<dyn LlmClient>) -> Result<Self> {
        debug!(data_dir = ?config.storage.data_dir, "AgentRuntime::from_config: called");
        let store = LearningStore::open_with_lessons_dir(&config.storage.data_dir, &config.storage.lessons_dir)
            .context("Failed to open learning store")?;
        let roster = AgentRoster::build(config)?;

        let mut tools = ToolExecutor::standard();
        for specialist in roster.specialists() {
            tools.add_delegate(&specialist.name, &specialist.description);
        }

        Ok(Self {
            llm,
            roster: Arc::new(roster),
            tools: Arc::new(tools),
            store: Arc::new(store),
            memory: Arc::new(MemoryStore::new()),
            user_id: config.user.user_id.clone(),
            max_tool_rounds: config.agents.max_tool_rounds.max(1),
            max_tokens: config.llm.max_tokens,
            preload: config.memory.preload,
            stream: config.display.stream,
            events: None,
        })
    }

    /// Builder method to send progress events to `events`
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn roster(&self) -> &AgentRoster {
        &self.roster
    }

    pub fn store(&self) -> &LearningStore {
        &self.store
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn streaming(&self) -> bool {
        self.stream
    }

    /// Run one orchestrator turn on `transcript`
    ///
    /// On success the transcript gains the user message, every tool exchange
    /// and the answer, and the turn is recorded in memory. On failure the
    /// transcript is left as it was.
    pub async fn turn(&self, transcript: &mut Vec<Message>, input: &str) -> Result<String> {
        debug!(input_len = input.len(), history = transcript.len(), "AgentRuntime::turn: called");
        let spec = self.roster.main();

        let mut instruction = spec.instruction.clone();
        if self.preload
            && let Some(section) = self.memory.preload_section(input).await
        {
            debug!("AgentRuntime::turn: preloading memories");
            instruction.push_str(&section);
        }

        let spawner = Arc::new(SpecialistSpawner { runtime: self.clone() });
        let ctx = ToolContext::new(
            Arc::clone(&self.store),
            Arc::clone(&self.memory),
            self.user_id.clone(),
            MAIN_AGENT,
        )
        .with_spawner(spawner);

        let mut working = transcript.clone();
        working.push(Message::user(input));
        let answer = self.run_agent(spec, &instruction, &mut working, &ctx, self.stream).await?;

        *transcript = working;
        self.memory.record_turn(input, &spec.name, &answer).await;
        Ok(answer)
    }

    /// Run a specialist on a self-contained request
    pub async fn run_specialist(&self, delegation: &Delegation) -> Result<String> {
        debug!(agent = %delegation.agent, parent = %delegation.parent, "AgentRuntime::run_specialist: called");
        let spec = self
            .roster
            .specialist(&delegation.agent)
            .ok_or_else(|| eyre!("Unknown specialist: {}", delegation.agent))?;

        let ctx = ToolContext::new(
            Arc::clone(&self.store),
            Arc::clone(&self.memory),
            self.user_id.clone(),
            spec.name.clone(),
        );
        let mut messages = vec![Message::user(delegation.request.clone())];
        self.run_agent(spec, &spec.instruction, &mut messages, &ctx, false).await
    }

    /// The tool loop for one agent; appends every exchange to `messages`
    async fn run_agent(
        &self,
        spec: &AgentSpec,
        instruction: &str,
        messages: &mut Vec<Message>,
        ctx: &ToolContext,
        stream: bool,
    ) -> Result<String> {
        info!(agent = %spec.name, tools = spec.tools.len(), "agent run started");
        let definitions = self.tools.definitions_for(&spec.tools);
        let mut usage = TokenUsage::default();

        for round in 1..=self.max_tool_rounds {
            self.emit(AgentEvent::Thinking {
                agent: spec.name.clone(),
                round,
            });

            let request = self.request(spec, instruction, messages, definitions.clone(), spec.web_search);
            let response = self
                .send(request, stream)
                .await
                .with_context(|| format!("{} request failed", spec.name))?;
            usage.add(response.usage);

            debug!(
                agent = %spec.name,
                round,
                stop_reason = ?response.stop_reason,
                tool_calls = response.tool_calls.len(),
                "AgentRuntime::run_agent: got response"
            );
            messages.push(response_to_message(&response));

            if response.tool_calls.is_empty() {
                return Ok(self.finish(spec, &response, usage));
            }

            let results = self.execute_tools(spec, &response.tool_calls, ctx).await;
            messages.push(format_tool_results(&results));
        }

        warn!(agent = %spec.name, rounds = self.max_tool_rounds, "tool rounds exhausted, forcing final answer");
        self.emit(AgentEvent::RoundsExhausted {
            agent: spec.name.clone(),
        });
        messages.push(Message::user(FORCE_FINAL_PROMPT));

        let request = self.request(spec, instruction, messages, Vec::new(), false);
        let response = self
            .send(request, stream)
            .await
            .with_context(|| format!("{} final answer request failed", spec.name))?;
        usage.add(response.usage);

        // Tool calls are ignored here; there is no round left to run them
        let text = response.content.clone().unwrap_or_default();
        messages.push(Message::assistant(text));
        Ok(self.finish(spec, &response, usage))
    }

    fn request(
        &self,
        spec: &AgentSpec,
        instruction: &str,
        messages: &[Message],
        tools: Vec<ToolDefinition>,
        web_search: bool,
    ) -> CompletionRequest {
        CompletionRequest {
            system_prompt: instruction.to_string(),
            messages: messages.to_vec(),
            tools,
            max_tokens: self.max_tokens,
            web_search,
            model: spec.model.clone(),
        }
    }

    /// One LLM call, streaming text deltas as events when asked
    async fn send(&self, request: CompletionRequest, stream: bool) -> Result<CompletionResponse> {
        if !stream {
            return Ok(self.llm.complete(request).await?);
        }

        let (chunk_tx, mut chunk_rx) = mpsc::channel(64);
        let events = self.events.clone();
        let forward = tokio::spawn(async move {
            while let Some(chunk) = chunk_rx.recv().await {
                if let StreamChunk::TextDelta(text) = chunk
                    && let Some(events) = &events
                {
                    let _ = events.send(AgentEvent::TextDelta(text));
                }
            }
        });

        let result = self.llm.stream(request, chunk_tx).await;
        if let Err(e) = forward.await {
            debug!(error = %e, "AgentRuntime::send: forwarder task failed");
        }
        Ok(result?)
    }

    async fn execute_tools(
        &self,
        spec: &AgentSpec,
        calls: &[ToolCall],
        ctx: &ToolContext,
    ) -> Vec<(ToolCall, ToolResult)> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            info!(agent = %spec.name, tool = %call.name, "executing tool");
            self.emit(AgentEvent::ToolCall {
                agent: spec.name.clone(),
                tool: call.name.clone(),
            });

            let result = self.tools.execute_allowed(call, &spec.tools, ctx).await;

            if result.is_error {
                warn!(agent = %spec.name, tool = %call.name, "tool returned an error");
            }
            self.emit(AgentEvent::ToolDone {
                agent: spec.name.clone(),
                tool: call.name.clone(),
                is_error: result.is_error,
            });
            results.push((call.clone(), result));
        }
        results
    }

    fn finish(&self, spec: &AgentSpec, response: &CompletionResponse, usage: TokenUsage) -> String {
        info!(
            agent = %spec.name,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "agent run finished"
        );
        self.emit(AgentEvent::Finished {
            agent: spec.name.clone(),
            usage,
        });
        response.content.as_deref().unwrap_or("").trim().to_string()
    }

    fn emit(&self, event: AgentEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

/// Runs specialists for the orchestrator's delegation tools
struct SpecialistSpawner {
    runtime: AgentRuntime,
}

#[async_trait::async_trait]
impl AgentSpawner for SpecialistSpawner {
    async fn spawn(&self, delegation: Delegation) -> Result<String> {
        self.runtime.run_specialist(&delegation).await
    }
}

/// Convert LLM response to message for conversation history
fn response_to_message(response: &CompletionResponse) -> Message {
    let mut blocks = Vec::new();

    if let Some(text) = &response.content
        && !text.is_empty()
    {
        blocks.push(ContentBlock::text(text));
    }

    for call in &response.tool_calls {
        blocks.push(ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.input.clone(),
        });
    }

    Message::assistant_blocks(blocks)
}

/// Format tool results as a user message
fn format_tool_results(results: &[(ToolCall, ToolResult)]) -> Message {
    let blocks = results
        .iter()
        .map(|(call, result)| ContentBlock::tool_result(&call.id, &call.name, &result.content, result.is_error))
        .collect();

    Message::user_blocks(blocks)
}

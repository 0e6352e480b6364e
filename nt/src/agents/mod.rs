//! Agents - roster, instructions and the runtime that drives them

mod prompts;
mod roster;
mod runtime;

pub use prompts::{PromptContext, PromptRenderer, get_embedded};
pub use roster::{AgentRoster, AgentSpec, MAIN_AGENT};
pub use runtime::{AgentEvent, AgentRuntime, EventSender};

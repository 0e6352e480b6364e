//! Agent roster - every agent the assistant can run
//!
//! Built once at startup from `Config` and passed by reference.

use std::collections::BTreeMap;
use tracing::debug;

use eyre::Result;

use super::prompts::{PromptContext, PromptRenderer};
use crate::config::Config;

/// Name of the orchestrator
pub const MAIN_AGENT: &str = "main_agent";

/// One agent: instruction, model and the tools it may call
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub name: String,

    /// Shown to the orchestrator as the delegation tool description
    pub description: String,

    /// Rendered system instruction
    pub instruction: String,

    /// Model override; `None` uses the client default
    pub model: Option<String>,

    /// Function tools the agent may call (delegation tools included)
    pub tools: Vec<String>,

    /// Enable provider web search
    pub web_search: bool,
}

/// Static part of an agent definition
struct Blueprint {
    name: &'static str,
    prompt: &'static str,
    description: &'static str,
    tools: &'static [&'static str],
    web_search: bool,
}

const SPECIALISTS: &[Blueprint] = &[
    Blueprint {
        name: "researcher_agent",
        prompt: "researcher",
        description: "Research specialist that finds comprehensive information about a tool or technology \
                      using web search. Returns markdown findings.",
        tools: &[],
        web_search: true,
    },
    Blueprint {
        name: "planner_agent",
        prompt: "planner",
        description: "Learning plan architect that turns research into a structured learning roadmap. \
                      Include the research in the request.",
        tools: &[],
        web_search: false,
    },
    Blueprint {
        name: "teacher_agent",
        prompt: "teacher",
        description: "Expert educator that writes the lesson for one module. \
                      Include the research, the roadmap and the module number in the request.",
        tools: &[],
        web_search: false,
    },
    Blueprint {
        name: "example_agent",
        prompt: "example",
        description: "Code example specialist that writes practical, well-commented examples for one module. \
                      Include the research and the module topic in the request.",
        tools: &[],
        web_search: false,
    },
    Blueprint {
        name: "quiz_agent",
        prompt: "quiz",
        description: "Quiz generator that writes a graded quiz for one module. \
                      Include the research and the module topic in the request.",
        tools: &["create_practice_quiz"],
        web_search: false,
    },
    Blueprint {
        name: "tracker_agent",
        prompt: "tracker",
        description: "Progress tracking and motivation specialist. Records milestones and summarizes progress.",
        tools: &["track_progress", "get_progress_summary", "load_memory"],
        web_search: false,
    },
    Blueprint {
        name: "notifier_agent",
        prompt: "notifier",
        description: "Notification specialist that writes short achievement, reminder and tip messages.",
        tools: &[],
        web_search: false,
    },
];

const MAIN_TOOLS: &[&str] = &[
    "create_tool_folder",
    "save_to_tool_folder",
    "read_from_tool_folder",
    "save_learning_roadmap",
    "assemble_module_file",
    "manage_learning_session",
];

const MAIN_DESCRIPTION: &str = "Master orchestrator for the learning assistant.";

/// The orchestrator and its specialists
#[derive(Debug, Clone)]
pub struct AgentRoster {
    main: AgentSpec,
    specialists: BTreeMap<String, AgentSpec>,
}

impl AgentRoster {
    /// Render every instruction and apply per-agent model overrides
    pub fn build(config: &Config) -> Result<Self> {
        debug!(user_id = %config.user.user_id, "AgentRoster::build: called");
        let renderer = PromptRenderer::new();
        let context = PromptContext {
            user_id: config.user.user_id.clone(),
            lessons_dir: config.storage.lessons_dir.display().to_string(),
            app_name: config.user.app_name.clone(),
        };
        let model_for = |name: &str| config.agents.models.get(name).cloned();

        let mut specialists = BTreeMap::new();
        for bp in SPECIALISTS {
            let spec = AgentSpec {
                name: bp.name.to_string(),
                description: bp.description.to_string(),
                instruction: renderer.render(bp.prompt, &context)?,
                model: model_for(bp.name),
                tools: bp.tools.iter().map(|t| t.to_string()).collect(),
                web_search: bp.web_search,
            };
            specialists.insert(spec.name.clone(), spec);
        }

        let tools = MAIN_TOOLS
            .iter()
            .map(|t| t.to_string())
            .chain(SPECIALISTS.iter().map(|bp| bp.name.to_string()))
            .collect();

        let main = AgentSpec {
            name: MAIN_AGENT.to_string(),
            description: MAIN_DESCRIPTION.to_string(),
            instruction: renderer.render("main", &context)?,
            model: model_for(MAIN_AGENT),
            tools,
            web_search: false,
        };

        Ok(Self { main, specialists })
    }

    /// The orchestrator
    pub fn main(&self) -> &AgentSpec {
        &self.main
    }

    /// A specialist by name
    pub fn specialist(&self, name: &str) -> Option<&AgentSpec> {
        self.specialists.get(name)
    }

    /// Specialists in name order
    pub fn specialists(&self) -> impl Iterator<Item = &AgentSpec> {
        self.specialists.values()
    }

    /// Any agent by name
    pub fn get(&self, name: &str) -> Option<&AgentSpec> {
        if name == self.main.name {
            Some(&self.main)
        } else {
            self.specialist(name)
        }
    }
}

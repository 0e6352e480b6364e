//! Agent instructions
//!
//! Compiled into the binary from .pmt files and rendered with Handlebars.

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

/// Orchestrator instruction
pub const MAIN: &str = include_str!("../../prompts/main.pmt");
pub const RESEARCHER: &str = include_str!("../../prompts/researcher.pmt");
pub const PLANNER: &str = include_str!("../../prompts/planner.pmt");
pub const TEACHER: &str = include_str!("../../prompts/teacher.pmt");
pub const EXAMPLE: &str = include_str!("../../prompts/example.pmt");
pub const QUIZ: &str = include_str!("../../prompts/quiz.pmt");
pub const TRACKER: &str = include_str!("../../prompts/tracker.pmt");
pub const NOTIFIER: &str = include_str!("../../prompts/notifier.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "main" => Some(MAIN),
        "researcher" => Some(RESEARCHER),
        "planner" => Some(PLANNER),
        "teacher" => Some(TEACHER),
        "example" => Some(EXAMPLE),
        "quiz" => Some(QUIZ),
        "tracker" => Some(TRACKER),
        "notifier" => Some(NOTIFIER),
        _ => {
            debug!(%name, "get_embedded: no match found");
            None
        }
    }
}

/// Values substituted into instructions
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub user_id: String,
    pub lessons_dir: String,
    pub app_name: String,
}

/// Renders embedded instructions
pub struct PromptRenderer {
    hbs: Handlebars<'static>,
}

impl PromptRenderer {
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        // Instructions are markdown, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// Render the embedded prompt `name` with `context`
    pub fn render(&self, name: &str, context: &PromptContext) -> Result<String> {
        debug!(%name, "PromptRenderer::render: called");
        let template = get_embedded(name).ok_or_else(|| eyre!("Prompt template not found: {}", name))?;
        self.hbs
            .render_template(template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", name, e))
    }
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PromptContext {
        PromptContext {
            user_id: "learner_001".to_string(),
            lessons_dir: "lessons".to_string(),
            app_name: "newToolNoProblem".to_string(),
        }
    }

    #[test]
    fn test_every_agent_prompt_is_embedded() {
        for name in ["main", "researcher", "planner", "teacher", "example", "quiz", "tracker", "notifier"] {
            assert!(get_embedded(name).is_some_and(|p| !p.trim().is_empty()), "{}", name);
        }
        assert!(get_embedded("unknown-template").is_none());
    }

    #[test]
    fn test_render_substitutes_without_escaping() {
        let renderer = PromptRenderer::new();
        let ctx = PromptContext {
            user_id: "o'brien & co".to_string(),
            ..context()
        };

        let main = renderer.render("main", &ctx).unwrap();
        assert!(main.contains("newToolNoProblem"));
        assert!(main.contains("o'brien & co"));
        assert!(!main.contains("{{"));
    }

    #[test]
    fn test_render_unknown_prompt_fails() {
        let err = PromptRenderer::new().render("nope", &context()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}

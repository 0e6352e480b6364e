//! Practice quiz template tool

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use lessonstore::Status;

use crate::tools::args::{optional_str, required_str};
use crate::tools::{Tool, ToolContext, ToolResult};

const QUESTION_COUNT: u32 = 5;
const PASSING_SCORE: u32 = 70;

/// Skeleton the quiz agent fills with questions
#[derive(Debug, Clone, Serialize)]
pub struct QuizTemplate {
    pub topic: String,
    pub difficulty: String,
    pub questions: Vec<Value>,
    pub total_questions: u32,
    pub time_limit_minutes: u32,
    pub passing_score: u32,
    pub created_at: DateTime<Local>,
}

impl QuizTemplate {
    pub fn new(topic: &str, difficulty: &str) -> Self {
        Self {
            topic: topic.to_string(),
            difficulty: difficulty.to_string(),
            questions: Vec::new(),
            total_questions: QUESTION_COUNT,
            time_limit_minutes: if difficulty == "beginner" { 10 } else { 20 },
            passing_score: PASSING_SCORE,
            created_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct QuizOutcome {
    status: Status,
    quiz_template: QuizTemplate,
    message: String,
}

pub struct CreatePracticeQuizTool;

#[async_trait]
impl Tool for CreatePracticeQuizTool {
    fn name(&self) -> &str {
        "create_practice_quiz"
    }

    fn description(&self) -> &str {
        "Create a practice quiz template for a topic: question count, time limit and passing score. \
         Fill in the questions yourself."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "Quiz topic, e.g. 'FastAPI routing'"
                },
                "difficulty": {
                    "type": "string",
                    "enum": ["beginner", "intermediate", "advanced"],
                    "description": "Difficulty level (beginner when omitted)"
                }
            },
            "required": ["topic"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        debug!(?input, "CreatePracticeQuizTool::execute: called");
        let topic = match required_str(&input, "topic") {
            Ok(t) => t,
            Err(e) => return e.into_result("create quiz"),
        };
        let difficulty = optional_str(&input, "difficulty").unwrap_or("beginner");

        ToolResult::outcome(&QuizOutcome {
            status: Status::Success,
            message: format!("Quiz template created for '{}' at {} level", topic, difficulty),
            quiz_template: QuizTemplate::new(topic, difficulty),
        })
    }
}

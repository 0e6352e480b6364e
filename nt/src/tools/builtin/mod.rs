//! Built-in tools for the learning agents

mod assemble;
mod delegate;
mod folder;
mod memory;
mod progress;
mod quiz;
mod roadmap;
mod session;

pub use assemble::AssembleModuleFileTool;
pub use delegate::DelegateTool;
pub use folder::{CreateToolFolderTool, ReadFromToolFolderTool, SaveToToolFolderTool};
pub use memory::LoadMemoryTool;
pub use progress::{GetProgressSummaryTool, TrackProgressTool};
pub use quiz::{CreatePracticeQuizTool, QuizTemplate};
pub use roadmap::SaveLearningRoadmapTool;
pub use session::ManageLearningSessionTool;

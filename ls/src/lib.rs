//! LessonStore - file-backed learning state
//!
//! Persists everything the learning assistant produces or tracks as plain
//! files under a data directory. Each entity is an independent flat file;
//! every mutation reads the whole document and writes the whole document back.
//!
//! # Layout
//!
//! ```text
//! {data_dir}/
//! ├── progress_{user_id}.json            # ProgressRecord
//! ├── session_{user_id}_{slug}.json      # SessionRecord
//! └── lessons/
//!     └── {slug}/
//!         ├── research.md
//!         ├── roadmap.md
//!         └── module_{n}.md
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lessonstore::{LearningStore, SessionAction};
//!
//! let store = LearningStore::open(".")?;
//! store.lessons.create_folder("FastAPI")?;
//! store.progress.track_progress("learner_001", "FastAPI", "Started learning FastAPI", true)?;
//! store.sessions.apply("learner_001", "FastAPI", SessionAction::Start)?;
//! ```

mod assembler;
pub mod cli;
mod error;
mod json;
mod lessons;
mod outcome;
mod progress;
mod session;
mod slug;
mod store;

pub use assembler::{AssembledModule, ModuleParts, assemble_module, render_module};
pub use error::StoreError;
pub use lessons::{FolderOutcome, LessonFolders, ReadOutcome, SaveOutcome};
pub use outcome::{ErrorOutcome, Status};
pub use progress::{MilestoneEntry, ProgressRecord, ProgressStore, ProgressSummary, ToolProgress, TrackOutcome};
pub use session::{
    AdvanceOutcome, CompleteOutcome, CurrentOutcome, ModuleCompletion, SessionAction, SessionOutcome, SessionRecord,
    SessionStatus, SessionStore, StartOutcome,
};
pub use slug::{safe_slug, slugify, validate_component};
pub use store::LearningStore;

/// Default name of the lessons directory under the data directory
pub const DEFAULT_LESSONS_DIR: &str = "lessons";

/// Timestamp format used in generated markdown footers
pub const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M";

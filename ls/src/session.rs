//! Module walkthrough sessions
//!
//! One session file per (user, tool). The state machine is open-ended:
//! `start` creates (or replaces) a record, `next_module` bumps the counter,
//! `complete_module` annotates history. No sequencing is enforced here; the
//! orchestrator decides what order to call them in.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

use crate::json::{read_json, write_json};
use crate::progress::ensure_dir;
use crate::slug::{safe_slug, validate_component};
use crate::{Status, StoreError};

/// Session lifecycle status; only `in_progress` is ever written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleCompletion {
    pub module_number: u32,
    pub module_name: String,
    pub completed_at: DateTime<Local>,
}

/// Stored as `session_{user_id}_{slug}.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
    pub tool_name: String,
    pub started: DateTime<Local>,
    pub current_module: u32,
    pub modules_completed: Vec<ModuleCompletion>,
    pub status: SessionStatus,
}

/// What to do with a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Start,
    NextModule,
    CompleteModule { module_name: Option<String> },
    GetCurrent,
}

impl SessionAction {
    /// Parse an action name, attaching the module name for `complete_module`
    ///
    /// An empty module name counts as absent.
    pub fn parse(action: &str, module_name: Option<&str>) -> Result<Self, StoreError> {
        let mut parsed: Self = action.parse()?;
        if let SessionAction::CompleteModule { module_name: slot } = &mut parsed {
            *slot = module_name.filter(|n| !n.is_empty()).map(str::to_string);
        }
        Ok(parsed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionAction::Start => "start",
            SessionAction::NextModule => "next_module",
            SessionAction::CompleteModule { .. } => "complete_module",
            SessionAction::GetCurrent => "get_current",
        }
    }
}

impl FromStr for SessionAction {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(SessionAction::Start),
            "next_module" => Ok(SessionAction::NextModule),
            "complete_module" => Ok(SessionAction::CompleteModule { module_name: None }),
            "get_current" => Ok(SessionAction::GetCurrent),
            other => Err(StoreError::UnknownAction {
                action: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SessionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartOutcome {
    pub status: Status,
    pub message: String,
    pub session: SessionRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceOutcome {
    pub status: Status,
    pub message: String,
    pub current_module: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteOutcome {
    pub status: Status,
    pub message: String,
    pub modules_completed: usize,
}

/// `session` is `null` when nothing has been started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentOutcome {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub session: Option<SessionRecord>,
}

/// Result of applying a [`SessionAction`]
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SessionOutcome {
    Started(StartOutcome),
    Advanced(AdvanceOutcome),
    Completed(CompleteOutcome),
    Current(CurrentOutcome),
}

/// Session store rooted at the data directory
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the session file for (user, tool)
    pub fn path_for(&self, user_id: &str, tool_name: &str) -> Result<PathBuf, StoreError> {
        validate_component(user_id)?;
        let slug = safe_slug(tool_name)?;
        Ok(self.dir.join(format!("session_{}_{}.json", user_id, slug)))
    }

    /// Load the session for (user, tool), if any
    pub fn load(&self, user_id: &str, tool_name: &str) -> Result<Option<SessionRecord>, StoreError> {
        read_json(&self.path_for(user_id, tool_name)?)
    }

    /// Apply one action to the (user, tool) session
    pub fn apply(&self, user_id: &str, tool_name: &str, action: SessionAction) -> Result<SessionOutcome, StoreError> {
        debug!(%user_id, %tool_name, %action, "SessionStore::apply: called");
        let path = self.path_for(user_id, tool_name)?;

        match action {
            SessionAction::Start => {
                let session = SessionRecord {
                    user_id: user_id.to_string(),
                    tool_name: tool_name.to_string(),
                    started: Local::now(),
                    current_module: 0,
                    modules_completed: Vec::new(),
                    status: SessionStatus::InProgress,
                };
                ensure_dir(&self.dir)?;
                write_json(&path, &session)?;
                info!(%user_id, %tool_name, "Started learning session");
                Ok(SessionOutcome::Started(StartOutcome {
                    status: Status::Success,
                    message: format!("Started learning session for {}", tool_name),
                    session,
                }))
            }
            SessionAction::NextModule => {
                let mut session = self.require(user_id, tool_name)?;
                session.current_module += 1;
                write_json(&path, &session)?;
                info!(%user_id, %tool_name, current_module = session.current_module, "Advanced session");
                Ok(SessionOutcome::Advanced(AdvanceOutcome {
                    status: Status::Success,
                    message: format!("Advanced to module {}", session.current_module),
                    current_module: session.current_module,
                }))
            }
            SessionAction::CompleteModule { module_name } => {
                let mut session = self.require(user_id, tool_name)?;
                let module_number = session.current_module;
                session.modules_completed.push(ModuleCompletion {
                    module_number,
                    module_name: module_name.unwrap_or_else(|| format!("Module {}", module_number)),
                    completed_at: Local::now(),
                });
                write_json(&path, &session)?;
                info!(%user_id, %tool_name, module_number, "Completed module");
                Ok(SessionOutcome::Completed(CompleteOutcome {
                    status: Status::Success,
                    message: format!("Module {} completed!", module_number),
                    modules_completed: session.modules_completed.len(),
                }))
            }
            SessionAction::GetCurrent => {
                let session = self.load(user_id, tool_name)?;
                let message = session.is_none().then(|| "No active session".to_string());
                Ok(SessionOutcome::Current(CurrentOutcome {
                    status: Status::Success,
                    message,
                    session,
                }))
            }
        }
    }

    fn require(&self, user_id: &str, tool_name: &str) -> Result<SessionRecord, StoreError> {
        self.load(user_id, tool_name)?.ok_or_else(|| {
            debug!(%user_id, %tool_name, "SessionStore::require: no session");
            StoreError::NoActiveSession {
                user_id: user_id.to_string(),
                tool_name: tool_name.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn current(store: &SessionStore) -> SessionRecord {
        store.load("u1", "FastAPI").unwrap().unwrap()
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(SessionAction::parse("start", None).unwrap(), SessionAction::Start);
        assert_eq!(
            SessionAction::parse("complete_module", Some("Routing")).unwrap(),
            SessionAction::CompleteModule {
                module_name: Some("Routing".to_string())
            }
        );
        assert_eq!(
            SessionAction::parse("complete_module", Some("")).unwrap(),
            SessionAction::CompleteModule { module_name: None }
        );
        assert_eq!(
            SessionAction::parse("next_module", Some("ignored")).unwrap(),
            SessionAction::NextModule
        );
        assert!(matches!(
            SessionAction::parse("frobnicate", None),
            Err(StoreError::UnknownAction { .. })
        ));
    }

    #[test]
    fn test_start_sets_module_zero() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path());

        let outcome = store.apply("u1", "FastAPI", SessionAction::Start).unwrap();
        match outcome {
            SessionOutcome::Started(s) => {
                assert_eq!(s.session.current_module, 0);
                assert!(s.session.modules_completed.is_empty());
                assert_eq!(s.session.status, SessionStatus::InProgress);
            }
            other => panic!("Expected Started, got {:?}", other),
        }
        assert!(temp.path().join("session_u1_fastapi.json").exists());
    }

    #[test]
    fn test_next_module_increments_by_one() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path());
        store.apply("u1", "FastAPI", SessionAction::Start).unwrap();

        for expected in 1..=3 {
            match store.apply("u1", "FastAPI", SessionAction::NextModule).unwrap() {
                SessionOutcome::Advanced(a) => assert_eq!(a.current_module, expected),
                other => panic!("Expected Advanced, got {:?}", other),
            }
        }
        assert_eq!(current(&store).current_module, 3);
    }

    #[test]
    fn test_complete_tags_current_module() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path());
        store.apply("u1", "FastAPI", SessionAction::Start).unwrap();
        store.apply("u1", "FastAPI", SessionAction::NextModule).unwrap();
        store
            .apply(
                "u1",
                "FastAPI",
                SessionAction::CompleteModule {
                    module_name: Some("Fundamentals".to_string()),
                },
            )
            .unwrap();
        store.apply("u1", "FastAPI", SessionAction::NextModule).unwrap();
        store
            .apply("u1", "FastAPI", SessionAction::CompleteModule { module_name: None })
            .unwrap();

        let session = current(&store);
        assert_eq!(session.modules_completed.len(), 2);
        assert_eq!(session.modules_completed[0].module_number, 1);
        assert_eq!(session.modules_completed[0].module_name, "Fundamentals");
        assert_eq!(session.modules_completed[1].module_number, 2);
        assert_eq!(session.modules_completed[1].module_name, "Module 2");
    }

    #[test]
    fn test_complete_same_module_twice_is_allowed() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path());
        store.apply("u1", "FastAPI", SessionAction::Start).unwrap();

        for _ in 0..2 {
            store
                .apply("u1", "FastAPI", SessionAction::CompleteModule { module_name: None })
                .unwrap();
        }
        let numbers: Vec<_> = current(&store).modules_completed.iter().map(|m| m.module_number).collect();
        assert_eq!(numbers, vec![0, 0]);
    }

    #[test]
    fn test_missing_session_is_error_without_file() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path());

        let next = store.apply("u1", "FastAPI", SessionAction::NextModule);
        assert!(matches!(next, Err(StoreError::NoActiveSession { .. })));

        let complete = store.apply("u1", "FastAPI", SessionAction::CompleteModule { module_name: None });
        assert!(matches!(complete, Err(StoreError::NoActiveSession { .. })));

        assert!(!store.path_for("u1", "FastAPI").unwrap().exists());
    }

    #[test]
    fn test_get_current_without_session_is_null() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path());

        let outcome = store.apply("u1", "FastAPI", SessionAction::GetCurrent).unwrap();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "success");
        assert!(value["session"].is_null());
        assert_eq!(value["message"], "No active session");
    }

    #[test]
    fn test_start_overwrites_existing_session() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path());
        store.apply("u1", "FastAPI", SessionAction::Start).unwrap();
        store.apply("u1", "FastAPI", SessionAction::NextModule).unwrap();

        store.apply("u1", "FastAPI", SessionAction::Start).unwrap();
        assert_eq!(current(&store).current_module, 0);
    }

    #[test]
    fn test_session_file_uses_full_slug() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path());
        store.apply("u1", "Lang-Chain", SessionAction::Start).unwrap();

        assert!(temp.path().join("session_u1_lang_chain.json").exists());
        assert!(store.load("u1", "lang chain").unwrap().is_some());
    }

    #[test]
    fn test_serialized_record_shape() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path());
        store.apply("u1", "FastAPI", SessionAction::Start).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path_for("u1", "FastAPI").unwrap()).unwrap()).unwrap();
        assert_eq!(raw["status"], "in_progress");
        assert_eq!(raw["tool_name"], "FastAPI");
        assert_eq!(raw["current_module"], 0);
        assert!(raw["modules_completed"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_escaping_user_and_tool() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("data"));

        let bad_user = store.apply("../u", "FastAPI", SessionAction::Start);
        assert!(matches!(bad_user, Err(StoreError::InvalidFilename { .. })));
        let bad_tool = store.apply("u1", "../../x", SessionAction::Start);
        assert!(matches!(bad_tool, Err(StoreError::InvalidFilename { .. })));
        let bad_read = store.apply("u1", "a/b", SessionAction::GetCurrent);
        assert!(matches!(bad_read, Err(StoreError::InvalidFilename { .. })));

        assert!(!temp.path().join("data").exists());
    }
}

//! Per-user milestone tracking

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::json::{read_json, write_json};
use crate::slug::validate_component;
use crate::{Status, StoreError};

/// All progress for one user, stored as `progress_{user_id}.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: String,
    pub tools: BTreeMap<String, ToolProgress>,
}

impl ProgressRecord {
    /// Empty record for a user with no progress yet
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            tools: BTreeMap::new(),
        }
    }
}

/// Progress on one tool; milestones are append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolProgress {
    pub started: DateTime<Local>,
    pub milestones: Vec<MilestoneEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneEntry {
    pub milestone: String,
    pub completed: bool,
    pub timestamp: DateTime<Local>,
}

/// Result of `track_progress`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackOutcome {
    pub status: Status,
    pub message: String,
    pub total_milestones: usize,
}

/// Result of `progress_summary`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub tools_count: usize,
    pub tools: BTreeMap<String, ToolProgress>,
}

/// Progress store rooted at the data directory
#[derive(Debug, Clone)]
pub struct ProgressStore {
    dir: PathBuf,
}

impl ProgressStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of a user's progress file; rejects user ids that are not a plain name
    pub fn path_for(&self, user_id: &str) -> Result<PathBuf, StoreError> {
        validate_component(user_id)?;
        Ok(self.dir.join(format!("progress_{}.json", user_id)))
    }

    /// Load a user's record, if any
    pub fn load(&self, user_id: &str) -> Result<Option<ProgressRecord>, StoreError> {
        read_json(&self.path_for(user_id)?)
    }

    /// Append one milestone under `tool_name`, creating the record and tool entry as needed
    pub fn track_progress(
        &self,
        user_id: &str,
        tool_name: &str,
        milestone: &str,
        completed: bool,
    ) -> Result<TrackOutcome, StoreError> {
        debug!(%user_id, %tool_name, %milestone, completed, "ProgressStore::track_progress: called");
        let path = self.path_for(user_id)?;
        let mut record = read_json(&path)?.unwrap_or_else(|| ProgressRecord::new(user_id));

        let now = Local::now();
        let tool = record.tools.entry(tool_name.to_string()).or_insert_with(|| {
            debug!(%tool_name, "ProgressStore::track_progress: new tool entry");
            ToolProgress {
                started: now,
                milestones: Vec::new(),
            }
        });
        tool.milestones.push(MilestoneEntry {
            milestone: milestone.to_string(),
            completed,
            timestamp: now,
        });
        let total_milestones = tool.milestones.len();

        ensure_dir(&self.dir)?;
        write_json(&path, &record)?;

        info!(%user_id, %tool_name, total_milestones, "Tracked milestone");
        Ok(TrackOutcome {
            status: Status::Success,
            message: format!("Progress tracked: {}", milestone),
            total_milestones,
        })
    }

    /// Summary of everything a user has tracked
    pub fn progress_summary(&self, user_id: &str) -> Result<ProgressSummary, StoreError> {
        debug!(%user_id, "ProgressStore::progress_summary: called");
        match self.load(user_id)? {
            Some(record) => Ok(ProgressSummary {
                status: Status::Success,
                user_id: Some(record.user_id),
                message: None,
                tools_count: record.tools.len(),
                tools: record.tools,
            }),
            None => {
                debug!("ProgressStore::progress_summary: no record");
                Ok(ProgressSummary {
                    status: Status::Success,
                    user_id: None,
                    message: Some("No progress recorded yet".to_string()),
                    tools_count: 0,
                    tools: BTreeMap::new(),
                })
            }
        }
    }
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))
}

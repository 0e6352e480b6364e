//! LearningStore - the three stores opened over one data directory

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{DEFAULT_LESSONS_DIR, LessonFolders, ProgressStore, SessionStore, StoreError};

/// Progress, session and lesson stores sharing a data directory
#[derive(Debug, Clone)]
pub struct LearningStore {
    data_dir: PathBuf,
    pub lessons: LessonFolders,
    pub progress: ProgressStore,
    pub sessions: SessionStore,
}

impl LearningStore {
    /// Open a store with lessons under `{data_dir}/lessons`
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_lessons_dir(data_dir, DEFAULT_LESSONS_DIR)
    }

    /// Open a store with a custom lessons directory name (or absolute path)
    ///
    /// Paths are made absolute so outcomes report locations the user can open.
    /// Nothing is created on disk until the first write.
    pub fn open_with_lessons_dir(
        data_dir: impl AsRef<Path>,
        lessons_dir: impl AsRef<Path>,
    ) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        let data_dir = std::path::absolute(data_dir).map_err(|e| StoreError::io(data_dir, e))?;
        let lessons_root = data_dir.join(lessons_dir);
        debug!(?data_dir, ?lessons_root, "LearningStore::open: called");

        Ok(Self {
            lessons: LessonFolders::new(lessons_root),
            progress: ProgressStore::new(&data_dir),
            sessions: SessionStore::new(&data_dir),
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

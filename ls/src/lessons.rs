//! Per-tool lesson folders
//!
//! Generated artifacts live in `lessons/{slug}/`. The orchestrator is the only
//! writer; files are overwritten unconditionally.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::slug::{safe_slug, validate_component};
use crate::{GENERATED_FORMAT, Status, StoreError};

/// Result of `create_folder`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderOutcome {
    pub status: Status,
    pub message: String,
    pub folder_path: PathBuf,
    pub existing_files: Vec<String>,
}

/// Result of a file save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub status: Status,
    pub message: String,
    pub file_path: PathBuf,
}

/// Result of a file read; a missing file is `not_found`, not an error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadOutcome {
    pub status: Status,
    pub message: String,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

/// Lesson folder store rooted at the lessons directory
#[derive(Debug, Clone)]
pub struct LessonFolders {
    root: PathBuf,
    label: String,
}

impl LessonFolders {
    /// Create a store rooted at `root` (created lazily on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let label = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| crate::DEFAULT_LESSONS_DIR.to_string());
        debug!(?root, %label, "LessonFolders::new: called");
        Self { root, label }
    }

    /// Root lessons directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder for a tool, whether or not it exists yet
    pub fn folder_path(&self, tool_name: &str) -> Result<PathBuf, StoreError> {
        Ok(self.root.join(safe_slug(tool_name)?))
    }

    /// Create the tool folder if missing, reporting what is already there
    pub fn create_folder(&self, tool_name: &str) -> Result<FolderOutcome, StoreError> {
        debug!(%tool_name, "LessonFolders::create_folder: called");
        let slug = safe_slug(tool_name)?;
        let folder_path = self.root.join(&slug);

        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        if folder_path.exists() {
            debug!(?folder_path, "LessonFolders::create_folder: folder exists");
            let existing_files = list_dir_names(&folder_path)?;
            return Ok(FolderOutcome {
                status: Status::Exists,
                message: format!("Folder '{}/{}' already exists", self.label, slug),
                folder_path,
                existing_files,
            });
        }

        fs::create_dir_all(&folder_path).map_err(|e| StoreError::io(&folder_path, e))?;
        info!(?folder_path, "Created lesson folder");
        Ok(FolderOutcome {
            status: Status::Created,
            message: format!("Created new folder '{}/{}'", self.label, slug),
            folder_path,
            existing_files: Vec::new(),
        })
    }

    /// Write `content` to `filename` inside the tool folder
    pub fn save_file(&self, tool_name: &str, filename: &str, content: &str) -> Result<SaveOutcome, StoreError> {
        debug!(%tool_name, %filename, content_len = content.len(), "LessonFolders::save_file: called");
        validate_component(filename)?;
        let slug = safe_slug(tool_name)?;
        let folder_path = self.root.join(&slug);

        fs::create_dir_all(&folder_path).map_err(|e| StoreError::io(&folder_path, e))?;

        let file_path = folder_path.join(filename);
        fs::write(&file_path, content).map_err(|e| StoreError::io(&file_path, e))?;

        info!(?file_path, bytes = content.len(), "Saved lesson file");
        Ok(SaveOutcome {
            status: Status::Success,
            message: format!("Saved '{}' to {}/{}/", filename, self.label, slug),
            file_path,
        })
    }

    /// Read `filename` from the tool folder
    pub fn read_file(&self, tool_name: &str, filename: &str) -> Result<ReadOutcome, StoreError> {
        debug!(%tool_name, %filename, "LessonFolders::read_file: called");
        validate_component(filename)?;
        let slug = safe_slug(tool_name)?;
        let file_path = self.root.join(&slug).join(filename);

        match fs::read_to_string(&file_path) {
            Ok(content) => Ok(ReadOutcome {
                status: Status::Success,
                message: format!("Read '{}' from {}/{}/", filename, self.label, slug),
                content: Some(content),
                file_path: Some(file_path),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?file_path, "LessonFolders::read_file: not found");
                Ok(ReadOutcome {
                    status: Status::NotFound,
                    message: format!("File '{}' not found in {}/{}/", filename, self.label, slug),
                    content: None,
                    file_path: None,
                })
            }
            Err(e) => Err(StoreError::io(&file_path, e)),
        }
    }

    /// Save a roadmap as `roadmap.md` with a title and generation date
    pub fn save_roadmap(&self, tool_name: &str, roadmap: &str) -> Result<SaveOutcome, StoreError> {
        debug!(%tool_name, "LessonFolders::save_roadmap: called");
        let document = format!(
            "# Learning Roadmap: {}\n\nGenerated: {}\n\n{}",
            tool_name,
            chrono::Local::now().format(GENERATED_FORMAT),
            roadmap
        );
        self.save_file(tool_name, "roadmap.md", &document)
    }

    /// Slugs of all existing tool folders, sorted
    pub fn list_folders(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut folders = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))? {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            if entry.path().is_dir() {
                folders.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        folders.sort();
        Ok(folders)
    }

    /// Files in a tool folder, or `None` if the folder does not exist
    pub fn list_files(&self, tool_name: &str) -> Result<Option<Vec<String>>, StoreError> {
        let folder_path = self.folder_path(tool_name)?;
        if !folder_path.is_dir() {
            return Ok(None);
        }
        list_dir_names(&folder_path).map(Some)
    }
}

fn list_dir_names(path: &Path) -> Result<Vec<String>, StoreError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| StoreError::io(path, e))? {
        let entry = entry.map_err(|e| StoreError::io(path, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

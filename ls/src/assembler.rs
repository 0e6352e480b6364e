//! Combine lesson, examples and quiz into one module document

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::lessons::{LessonFolders, SaveOutcome};
use crate::{GENERATED_FORMAT, Status, StoreError};

/// The three generated blobs that make up a module
#[derive(Debug, Clone, Default)]
pub struct ModuleParts<'a> {
    pub lesson: &'a str,
    pub examples: &'a str,
    pub quiz: &'a str,
}

/// Save result plus the absolute path of the module file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledModule {
    pub status: Status,
    pub message: String,
    pub file_path: PathBuf,
    pub absolute_path: PathBuf,
}

/// Render the module markdown with a generation footer
pub fn render_module(module_number: u32, parts: &ModuleParts<'_>) -> String {
    format!(
        "# Module {n}\n\n\
         ## 📚 Lesson\n\n{lesson}\n\n---\n\n\
         ## 💻 Code Examples\n\n{examples}\n\n---\n\n\
         ## 📝 Quiz\n\n{quiz}\n\n---\n\n\
         *Generated: {generated}*\n",
        n = module_number,
        lesson = parts.lesson,
        examples = parts.examples,
        quiz = parts.quiz,
        generated = chrono::Local::now().format(GENERATED_FORMAT),
    )
}

/// Render and save `module_{n}.md` in the tool folder
pub fn assemble_module(
    folders: &LessonFolders,
    tool_name: &str,
    module_number: u32,
    parts: &ModuleParts<'_>,
) -> Result<AssembledModule, StoreError> {
    debug!(%tool_name, module_number, "assemble_module: called");
    let document = render_module(module_number, parts);
    let filename = format!("module_{}.md", module_number);

    let SaveOutcome {
        status,
        message,
        file_path,
    } = folders.save_file(tool_name, &filename, &document)?;

    let absolute_path = std::path::absolute(&file_path).map_err(|e| StoreError::io(&file_path, e))?;

    Ok(AssembledModule {
        status,
        message,
        file_path,
        absolute_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sections_in_order() {
        let temp = TempDir::new().unwrap();
        let folders = LessonFolders::new(temp.path().join("lessons"));

        let parts = ModuleParts {
            lesson: "L",
            examples: "E",
            quiz: "Q",
        };
        let outcome = assemble_module(&folders, "Demo", 1, &parts).unwrap();
        assert_eq!(outcome.status, Status::Success);

        let content = std::fs::read_to_string(temp.path().join("lessons/demo/module_1.md")).unwrap();
        assert!(content.starts_with("# Module 1\n\n"));

        let lesson = content.find("## 📚 Lesson\n\nL").unwrap();
        let examples = content.find("## 💻 Code Examples\n\nE").unwrap();
        let quiz = content.find("## 📝 Quiz\n\nQ").unwrap();
        assert!(lesson < examples && examples < quiz);
        assert!(content.contains("*Generated: "));
    }

    #[test]
    fn test_absolute_path_points_at_saved_file() {
        let temp = TempDir::new().unwrap();
        let folders = LessonFolders::new(temp.path().join("lessons"));

        let outcome = assemble_module(&folders, "Lang Chain", 3, &ModuleParts::default()).unwrap();
        assert!(outcome.absolute_path.is_absolute());
        assert!(outcome.absolute_path.ends_with("lessons/lang_chain/module_3.md"));
        assert!(outcome.absolute_path.exists());
    }

    #[test]
    fn test_empty_parts_render_empty_sections() {
        let doc = render_module(2, &ModuleParts::default());
        assert!(doc.contains("## 📚 Lesson\n\n\n\n---"));
        assert!(doc.contains("## 📝 Quiz\n\n\n\n---"));
    }
}

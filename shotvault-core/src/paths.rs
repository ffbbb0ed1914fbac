//! Output-path composition.
//!
//! Pure template substitution over the convention table plus a resolved
//! version number. Directories are created as they are derived; filenames are
//! returned without extension, which the caller appends from the actual
//! source file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::convention::{
    ConventionTable, FRAME_NUMBER, FileKind, SEQ_CODE, SHOT_CODE, VERSION_NUMBER,
    VersionConvention,
};
use crate::error::{PublishError, Result};

/// The parent sequence code: the shot code minus its trailing 4 characters.
pub fn sequence_code(shot_code: &str) -> &str {
    let cut = shot_code.len().saturating_sub(4);
    shot_code.get(..cut).unwrap_or("")
}

#[derive(Debug, Clone, Copy)]
pub struct PublishPathBuilder<'a> {
    table: &'a ConventionTable,
}

impl<'a> PublishPathBuilder<'a> {
    pub fn new(table: &'a ConventionTable) -> Self {
        Self { table }
    }

    /// The shot's output directory, rendered from the configured segments
    /// with `{SEQ_CODE}`/`{SHOT_CODE}` filled in. Created if absent.
    pub fn output_dir(&self, shot_code: &str) -> Result<PathBuf> {
        let seq_code = sequence_code(shot_code);
        let mut path = PathBuf::new();
        for segment in self.table.output_dir_segments() {
            path.push(segment.replace(SEQ_CODE, seq_code).replace(SHOT_CODE, shot_code));
        }
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// The task directory beneath the output directory. Created if absent.
    pub fn task_dir(&self, output_dir: &Path, convention: &VersionConvention) -> Result<PathBuf> {
        let mut path = output_dir.to_path_buf();
        for segment in &convention.parent_dir {
            path.push(segment);
        }
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// The version directory for `version`. Identical to the task directory
    /// when the convention has no per-version subdirectory; created if absent
    /// otherwise.
    pub fn version_dir(
        &self,
        task_dir: &Path,
        convention: &VersionConvention,
        version: &str,
    ) -> Result<PathBuf> {
        match &convention.version_dir {
            None => Ok(task_dir.to_path_buf()),
            Some(template) => {
                let path = task_dir.join(template.replace(VERSION_NUMBER, version));
                fs::create_dir_all(&path)?;
                Ok(path)
            }
        }
    }

    /// Filename (no extension) for `kind`, with shot code, version number and
    /// the frame label (when given) substituted into the kind's template.
    pub fn file_name(
        &self,
        convention: &VersionConvention,
        kind: FileKind,
        shot_code: &str,
        version: &str,
        frame: Option<&str>,
    ) -> Result<String> {
        let template =
            convention
                .filename_template(kind)
                .ok_or_else(|| PublishError::MissingTemplate {
                    task: convention.task.clone(),
                    kind: kind.as_str(),
                })?;
        let mut name = template
            .replace(SHOT_CODE, shot_code)
            .replace(VERSION_NUMBER, version);
        if let Some(frame) = frame {
            name = name.replace(FRAME_NUMBER, frame);
        }
        Ok(name)
    }
}

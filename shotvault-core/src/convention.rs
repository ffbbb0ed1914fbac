//! The per-task naming convention table.
//!
//! A [`VersionConvention`] is plain immutable data: directory segments,
//! filename templates, and allowed-extension sets, all consulted read-only by
//! the rest of the engine. The table is loaded once at startup (see the
//! `shotvault-config` crate) and passed by reference; nothing here varies by
//! task beyond data-driven template substitution.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::{PublishError, Result};

/// Placeholder substituted with the shot code in templates.
pub const SHOT_CODE: &str = "{SHOT_CODE}";
/// Placeholder substituted with the 3-digit version number.
pub const VERSION_NUMBER: &str = "{VERSION_NUMBER}";
/// Placeholder substituted with the zero-padded frame label.
pub const FRAME_NUMBER: &str = "{FRAME_NUMBER}";
/// Placeholder substituted with the parent sequence code.
pub const SEQ_CODE: &str = "{SEQ_CODE}";

/// Content kind a convention names files for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Image,
    Movie,
    File,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Movie => "movie",
            FileKind::File => "file",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(FileKind::Image),
            "movie" => Some(FileKind::Movie),
            "file" => Some(FileKind::File),
            _ => None,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which role a submitted file plays in a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindRole {
    Original,
    Proxy,
}

impl KindRole {
    pub fn as_str(self) -> &'static str {
        match self {
            KindRole::Original => "original",
            KindRole::Proxy => "proxy",
        }
    }
}

/// Filename templates per content kind. A template contains `{FRAME_NUMBER}`
/// exactly when its kind is frame-indexed.
#[derive(Debug, Clone, Default)]
pub struct FilenameTemplates {
    pub image: Option<String>,
    pub movie: Option<String>,
    pub file: Option<String>,
}

impl FilenameTemplates {
    pub fn get(&self, kind: FileKind) -> Option<&str> {
        match kind {
            FileKind::Image => self.image.as_deref(),
            FileKind::Movie => self.movie.as_deref(),
            FileKind::File => self.file.as_deref(),
        }
    }
}

/// Allowed extensions per kind category, lowercased, without dots.
#[derive(Debug, Clone, Default)]
pub struct ExtensionSets {
    pub image: Vec<String>,
    pub movie: Vec<String>,
    pub file: Vec<String>,
}

impl ExtensionSets {
    pub fn get(&self, kind: FileKind) -> &[String] {
        match kind {
            FileKind::Image => &self.image,
            FileKind::Movie => &self.movie,
            FileKind::File => &self.file,
        }
    }
}

/// The naming/layout convention for one task.
#[derive(Debug, Clone)]
pub struct VersionConvention {
    /// Task this convention belongs to.
    pub task: String,
    /// Path segments between the shot's output directory and the task
    /// directory.
    pub parent_dir: Vec<String>,
    /// Per-version subdirectory template containing `{VERSION_NUMBER}`.
    /// Absent means versions are distinguished by filename suffix instead.
    pub version_dir: Option<String>,
    /// Kind of the primary published file.
    pub original: FileKind,
    /// Kind of the preview proxy.
    pub proxy: FileKind,
    pub templates: FilenameTemplates,
    pub extensions: ExtensionSets,
}

impl VersionConvention {
    pub fn filename_template(&self, kind: FileKind) -> Option<&str> {
        self.templates.get(kind)
    }

    pub fn allowed_extensions(&self, kind: FileKind) -> &[String] {
        self.extensions.get(kind)
    }

    pub fn kind_for(&self, role: KindRole) -> FileKind {
        match role {
            KindRole::Original => self.original,
            KindRole::Proxy => self.proxy,
        }
    }

    /// A task is frame-indexed when its original-kind filename template
    /// carries the frame-number placeholder. This drives sequence
    /// classification in the orchestrator.
    pub fn is_frame_indexed(&self) -> bool {
        self.filename_template(self.original)
            .is_some_and(|template| template.contains(FRAME_NUMBER))
    }
}

/// Checks a submitted file's extension against the set its role allows.
pub fn match_extension(
    convention: &VersionConvention,
    role: KindRole,
    path: &Path,
) -> Result<()> {
    let kind = convention.kind_for(role);
    let allowed = convention.allowed_extensions(kind);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    if !allowed.iter().any(|a| a.eq_ignore_ascii_case(&extension)) {
        return Err(PublishError::UnsupportedExtension {
            role: role.as_str(),
            task: convention.task.clone(),
            extension,
            allowed: allowed.join(", "),
        });
    }
    Ok(())
}

/// All task conventions plus the global output-directory template, keyed by
/// task name. Built once from configuration; read-only afterwards.
#[derive(Debug, Clone)]
pub struct ConventionTable {
    output_dir: Vec<String>,
    tasks: HashMap<String, VersionConvention>,
}

impl ConventionTable {
    pub fn new(output_dir: Vec<String>, tasks: HashMap<String, VersionConvention>) -> Self {
        Self { output_dir, tasks }
    }

    /// Ordered segments of the output-directory template, with `{SEQ_CODE}`
    /// and `{SHOT_CODE}` placeholders.
    pub fn output_dir_segments(&self) -> &[String] {
        &self.output_dir
    }

    pub fn convention(&self, task: &str) -> Result<&VersionConvention> {
        self.tasks
            .get(task)
            .ok_or_else(|| PublishError::UnknownTask(task.to_string()))
    }

    pub fn task_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tasks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

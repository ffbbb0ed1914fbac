//! Raw configuration models and their conversion into engine types.
//!
//! The TOML file mirrors these structs one to one; [`RawConfig::into_config`]
//! validates the table and produces the immutable
//! [`shotvault_core::ConventionTable`] the engine runs against.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use shotvault_core::convention::{
    ConventionTable, ExtensionSets, FRAME_NUMBER, FileKind, FilenameTemplates, VERSION_NUMBER,
    VersionConvention,
};

#[derive(Debug, Deserialize)]
pub struct RawConfig {
    /// Ordered output-directory segments with `{SEQ_CODE}`/`{SHOT_CODE}`
    /// placeholders.
    pub output_dir: Vec<String>,
    #[serde(default)]
    pub ffmpeg: FfmpegSettings,
    #[serde(default)]
    pub tasks: BTreeMap<String, RawTaskConvention>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FfmpegSettings {
    #[serde(default = "default_ffmpeg_path")]
    pub path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl FfmpegSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FfmpegSettings {
    fn default() -> Self {
        Self {
            path: default_ffmpeg_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

#[derive(Debug, Deserialize)]
pub struct RawTaskConvention {
    #[serde(default)]
    pub parent_dir: Vec<String>,
    pub version_dir: Option<String>,
    pub original: String,
    pub proxy: String,
    pub image: Option<String>,
    pub movie: Option<String>,
    pub file: Option<String>,
    #[serde(default)]
    pub image_ext: Vec<String>,
    #[serde(default)]
    pub movie_ext: Vec<String>,
    #[serde(default)]
    pub file_ext: Vec<String>,
}

/// Validated configuration: the convention table plus transcoder settings.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub table: ConventionTable,
    pub ffmpeg: FfmpegSettings,
}

impl RawConfig {
    pub fn into_config(self) -> Result<PublishConfig, ConfigError> {
        if self.output_dir.is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }

        let mut tasks = HashMap::new();
        for (name, raw) in self.tasks {
            let convention = raw.into_convention(&name)?;
            tasks.insert(name, convention);
        }

        Ok(PublishConfig {
            table: ConventionTable::new(self.output_dir, tasks),
            ffmpeg: self.ffmpeg,
        })
    }
}

impl RawTaskConvention {
    fn into_convention(self, task: &str) -> Result<VersionConvention, ConfigError> {
        let original = parse_kind(task, &self.original)?;
        let proxy = parse_kind(task, &self.proxy)?;

        if let Some(template) = &self.version_dir
            && !template.contains(VERSION_NUMBER)
        {
            return Err(ConfigError::BadVersionDirTemplate {
                task: task.to_string(),
            });
        }

        let templates = FilenameTemplates {
            image: self.image,
            movie: self.movie,
            file: self.file,
        };
        let extensions = ExtensionSets {
            image: lowercase_all(self.image_ext),
            movie: lowercase_all(self.movie_ext),
            file: lowercase_all(self.file_ext),
        };

        for kind in [original, proxy] {
            if templates.get(kind).is_none() {
                return Err(ConfigError::MissingTemplate {
                    task: task.to_string(),
                    kind: kind.as_str().to_string(),
                });
            }
            if extensions.get(kind).is_empty() {
                return Err(ConfigError::EmptyExtensions {
                    task: task.to_string(),
                    kind: kind.as_str().to_string(),
                });
            }
        }

        // Only the original kind may be frame-indexed; a proxy is always a
        // single rendered file.
        if templates
            .get(proxy)
            .is_some_and(|template| template.contains(FRAME_NUMBER))
            && proxy != original
        {
            return Err(ConfigError::FrameIndexedProxy {
                task: task.to_string(),
            });
        }

        Ok(VersionConvention {
            task: task.to_string(),
            parent_dir: self.parent_dir,
            version_dir: self.version_dir,
            original,
            proxy,
            templates,
            extensions,
        })
    }
}

fn parse_kind(task: &str, value: &str) -> Result<FileKind, ConfigError> {
    FileKind::parse(value).ok_or_else(|| ConfigError::UnknownKind {
        task: task.to_string(),
        kind: value.to_string(),
    })
}

fn lowercase_all(extensions: Vec<String>) -> Vec<String> {
    extensions
        .into_iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect()
}

/// Loader errors. Parse and validation problems carry enough context to point
/// at the offending task.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse config file {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("output_dir must have at least one segment")]
    EmptyOutputDir,

    #[error("task {task}: unknown file kind `{kind}`")]
    UnknownKind { task: String, kind: String },

    #[error("task {task}: missing `{kind}` filename template")]
    MissingTemplate { task: String, kind: String },

    #[error("task {task}: `{kind}` extension list is empty")]
    EmptyExtensions { task: String, kind: String },

    #[error("task {task}: version_dir template must contain {{VERSION_NUMBER}}")]
    BadVersionDirTemplate { task: String },

    #[error("task {task}: proxy template must not contain {{FRAME_NUMBER}}")]
    FrameIndexedProxy { task: String },
}

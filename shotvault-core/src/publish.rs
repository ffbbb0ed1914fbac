//! Publish orchestration.
//!
//! One publish is a straight sequence of fallible steps: validate the
//! submission, classify it (single file vs. image sequence), resolve the
//! output location and next version, normalize the sequence, optionally
//! encode a proxy, copy the source material into place, and emit the payload
//! the tracking layer needs. Every step is awaited in order; there is no
//! internal parallelism and no rollback of partial copies on failure.
//!
//! Re-running the same submission creates a new version: the resolver reads
//! the current maximum before the write, so existing versions are never
//! overwritten. That read-then-write is not atomic across processes;
//! concurrent publishes to one task must be serialized by the caller.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tracing::{debug, info};

use crate::convention::{ConventionTable, FileKind, KindRole, VersionConvention, match_extension};
use crate::error::{PublishError, Result};
use crate::mime::{DEFAULT_MIME, mime_type};
use crate::paths::PublishPathBuilder;
use crate::proxy::ProxyEncoder;
use crate::sanitize::sanitize_path;
use crate::sequence::{SequenceDescriptor, find_sequence_in_dir, normalize_sequence};
use crate::version::next_version;

/// One publish submission.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub shot_code: String,
    pub task_name: String,
    /// Path to the original asset: a single file, one frame of a sequence, or
    /// a directory holding the sequence.
    pub original_path: String,
    /// Explicit preview movie. When absent and `auto_proxy` is set, sequences
    /// get one encoded from the frames.
    pub proxy_path: Option<String>,
    pub auto_proxy: bool,
}

/// The record handed to the tracking layer after a publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishResult {
    pub version_number: String,
    pub shot_code: String,
    pub task_name: String,
    /// Primary output file: the proxy when one exists, else the single-file
    /// copy. Absent for a frames-only publish with no proxy.
    pub movie_path: Option<PathBuf>,
    /// Version directory holding the copied frames, for sequence publishes.
    pub frames_directory: Option<PathBuf>,
    pub mime_type: String,
}

#[derive(Debug)]
pub struct PublishOrchestrator<'a> {
    table: &'a ConventionTable,
    encoder: ProxyEncoder,
}

impl<'a> PublishOrchestrator<'a> {
    pub fn new(table: &'a ConventionTable) -> Self {
        Self {
            table,
            encoder: ProxyEncoder::default(),
        }
    }

    pub fn with_encoder(table: &'a ConventionTable, encoder: ProxyEncoder) -> Self {
        Self { table, encoder }
    }

    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishResult> {
        let original = PathBuf::from(sanitize_path(&request.original_path));
        let explicit_proxy = request
            .proxy_path
            .as_deref()
            .map(sanitize_path)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        if !path_or_parent_exists(&original) {
            return Err(PublishError::NotFound { path: original });
        }

        let convention = self.table.convention(&request.task_name)?;
        let is_sequence = is_sequence_submission(convention, &original);
        debug!(
            shot = %request.shot_code,
            task = %request.task_name,
            is_sequence,
            "classified submission"
        );

        if !is_sequence {
            match_extension(convention, KindRole::Original, &original)?;
        }

        let builder = PublishPathBuilder::new(self.table);
        let output_dir = builder.output_dir(&request.shot_code)?;
        let task_dir = builder.task_dir(&output_dir, convention)?;
        let version = next_version(convention, &task_dir)?;
        let version_dir = builder.version_dir(&task_dir, convention, &version)?;

        let sequence = if is_sequence {
            Some(self.resolve_sequence(convention, &original)?)
        } else {
            None
        };

        let mut proxy_path = explicit_proxy;
        if let Some(descriptor) = &sequence
            && proxy_path.is_none()
            && request.auto_proxy
        {
            info!("no proxy supplied, encoding one from the sequence");
            let movie_name = builder.file_name(
                convention,
                FileKind::Movie,
                &request.shot_code,
                &version,
                None,
            )?;
            let output = version_dir.join(format!("{movie_name}.mp4"));
            proxy_path = Some(self.encoder.encode(descriptor, &output).await?);
        }

        if let Some(proxy) = &proxy_path {
            match_extension(convention, KindRole::Proxy, proxy)?;
        }

        let mut primary_output: Option<PathBuf> = None;
        let mut frames_directory = None;

        if let Some(descriptor) = &sequence {
            frames_directory = Some(version_dir.clone());
            for (label, source) in &descriptor.frames {
                let name = builder.file_name(
                    convention,
                    FileKind::Image,
                    &request.shot_code,
                    &version,
                    Some(label),
                )?;
                let destination = version_dir.join(format!("{name}.{}", descriptor.extension));
                fs::copy(source, &destination).await?;
            }
            info!(
                count = descriptor.len(),
                dir = %version_dir.display(),
                "copied sequence frames"
            );
        } else {
            let name = builder.file_name(
                convention,
                convention.original,
                &request.shot_code,
                &version,
                None,
            )?;
            let destination = version_dir.join(format!("{name}.{}", extension_of(&original)));
            fs::copy(&original, &destination).await?;
            primary_output = Some(destination);
        }

        if let Some(proxy) = &proxy_path {
            let name = builder.file_name(
                convention,
                convention.proxy,
                &request.shot_code,
                &version,
                None,
            )?;
            let destination = version_dir.join(format!("{name}.{}", extension_of(proxy)));
            if *proxy != destination {
                fs::copy(proxy, &destination).await?;
            }
            primary_output = Some(destination);
        }

        info!(
            shot = %request.shot_code,
            task = %request.task_name,
            version = %version,
            "publish complete"
        );

        Ok(PublishResult {
            version_number: version,
            shot_code: request.shot_code.clone(),
            task_name: request.task_name.clone(),
            mime_type: primary_output
                .as_deref()
                .map(mime_type)
                .unwrap_or(DEFAULT_MIME)
                .to_string(),
            movie_path: primary_output,
            frames_directory,
        })
    }

    /// Resolves the submission to a normalized sequence. A directory is
    /// searched for its first file matching an allowed image extension; a
    /// file stands for the sequence sharing its directory and extension.
    fn resolve_sequence(
        &self,
        convention: &VersionConvention,
        original: &Path,
    ) -> Result<SequenceDescriptor> {
        let first_file = if original.is_dir() {
            find_sequence_in_dir(original, convention.allowed_extensions(FileKind::Image))?
                .ok_or_else(|| PublishError::NoSequenceFound {
                    dir: original.to_path_buf(),
                })?
        } else {
            original.to_path_buf()
        };
        let extension = extension_of(&first_file);
        let dir = first_file.parent().unwrap_or(Path::new("."));
        normalize_sequence(dir, &extension)
    }
}

/// A submission is a sequence iff the task is frame-indexed and the path is a
/// directory or its filename stem contains a digit run. A still frame whose
/// name embeds unrelated numerals (a take number, say) therefore classifies
/// as a sequence submission.
fn is_sequence_submission(convention: &VersionConvention, path: &Path) -> bool {
    convention.is_frame_indexed() && (path.is_dir() || stem_has_digits(path))
}

fn stem_has_digits(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.chars().any(|c| c.is_ascii_digit()))
}

fn path_or_parent_exists(path: &Path) -> bool {
    path.exists() || path.parent().is_some_and(|parent| parent.is_dir())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase()
}

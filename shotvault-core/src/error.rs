use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("could not extract a frame number from {0}")]
    FrameFormat(String),

    #[error("no .{} files found in {}", .extension, .dir.display())]
    EmptySequence { dir: PathBuf, extension: String },

    #[error("frame numbers in {} have inconsistent padding", .dir.display())]
    InconsistentPadding { dir: PathBuf },

    #[error("frame numbers in {} are not consecutive", .dir.display())]
    NonConsecutive { dir: PathBuf },

    #[error("no valid image sequence found in {}", .dir.display())]
    NoSequenceFound { dir: PathBuf },

    #[error("original file or folder not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported {role} file extension: {extension} for {task} task. Must be {allowed}")]
    UnsupportedExtension {
        role: &'static str,
        task: String,
        extension: String,
        allowed: String,
    },

    #[error("no {kind} filename template configured for {task} task")]
    MissingTemplate { task: String, kind: &'static str },

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("proxy generation failed: {0}")]
    ProxyGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PublishError>;

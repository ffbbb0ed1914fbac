use std::path::{Path, PathBuf};

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("tracking API error: {0}")]
    Api(String),

    #[error("task {task} not found for shot {shot}")]
    TaskNotFound { shot: String, task: String },

    #[error("upload failed: {0}")]
    Upload(String),
}

/// A task as known to the tracking service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    pub id: i64,
    pub name: String,
}

/// A created version record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub id: i64,
    pub code: String,
}

/// An upload slot handed out by the service for one file field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSlot {
    pub upload_url: String,
    pub token: String,
}

/// Fields attached to a version record at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionFields {
    pub notes: String,
    pub movie_path: Option<PathBuf>,
    pub frames_directory: Option<PathBuf>,
}

/// Request/response contract against the external tracking service. Failures
/// surface unchanged to the caller; nothing here retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackingService: Send + Sync {
    /// Tasks matching a shot/task-name pair.
    async fn find_tasks(
        &self,
        shot_code: &str,
        task_name: &str,
    ) -> Result<Vec<TaskRef>, TrackingError>;

    /// Human-readable version code for a publish.
    async fn version_code(
        &self,
        shot_code: &str,
        task_name: &str,
        version_number: &str,
    ) -> Result<String, TrackingError>;

    async fn create_version(
        &self,
        code: &str,
        shot_id: i64,
        task_id: i64,
        fields: &VersionFields,
    ) -> Result<VersionRecord, TrackingError>;

    async fn request_upload(
        &self,
        version_id: i64,
        field: &str,
        path: &Path,
    ) -> Result<UploadSlot, TrackingError>;

    async fn upload_file(
        &self,
        slot: &UploadSlot,
        path: &Path,
        mime_type: &str,
    ) -> Result<(), TrackingError>;

    async fn finalize_upload(&self, slot: &UploadSlot) -> Result<(), TrackingError>;
}

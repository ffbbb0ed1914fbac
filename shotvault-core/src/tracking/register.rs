use tracing::info;

use crate::publish::PublishResult;

use super::traits::{TrackingError, TrackingService, VersionFields, VersionRecord};

/// File field the proxy movie is uploaded to on a version record.
pub const UPLOAD_FIELD: &str = "uploaded_movie";

/// Registers a finished publish with the tracking service: resolve the task,
/// compute the version code, create the version record, then upload the
/// primary output file when there is one. Calls run strictly in order and any
/// failure propagates unchanged.
pub async fn register_publish(
    service: &dyn TrackingService,
    shot_id: i64,
    result: &PublishResult,
    notes: &str,
) -> Result<VersionRecord, TrackingError> {
    let tasks = service
        .find_tasks(&result.shot_code, &result.task_name)
        .await?;
    let task = tasks.first().ok_or_else(|| TrackingError::TaskNotFound {
        shot: result.shot_code.clone(),
        task: result.task_name.clone(),
    })?;

    let code = service
        .version_code(&result.shot_code, &result.task_name, &result.version_number)
        .await?;

    let fields = VersionFields {
        notes: notes.to_string(),
        movie_path: result.movie_path.clone(),
        frames_directory: result.frames_directory.clone(),
    };
    let version = service
        .create_version(&code, shot_id, task.id, &fields)
        .await?;

    if let Some(movie) = &result.movie_path {
        let slot = service
            .request_upload(version.id, UPLOAD_FIELD, movie)
            .await?;
        service.upload_file(&slot, movie, &result.mime_type).await?;
        service.finalize_upload(&slot).await?;
    }

    info!(code = %version.code, "registered publish with tracking service");
    Ok(version)
}

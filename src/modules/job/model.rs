use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::config::settings::AppConfig;

/// Extensions the file picker offered; anything else still uploads.
pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mov", "avi", "mkv"];

/// One start action. Immutable once built.
#[derive(Debug, Clone, Validate)]
pub struct JobRequest {
    pub job_id: Uuid,
    pub source_path: PathBuf,
    pub speed_up: bool,
    #[validate(length(min = 1, message = "folder must not be empty"))]
    pub target_folder: String,
}

impl JobRequest {
    pub fn new(
        source_path: impl Into<PathBuf>,
        speed_up: bool,
        target_folder: impl Into<String>,
    ) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            source_path: source_path.into(),
            speed_up,
            target_folder: target_folder.into(),
        }
    }

    /// Builds a request that is safe to hand to a worker, or explains why not.
    pub fn validated(
        source_path: &Path,
        speed_up: bool,
        target_folder: &str,
        config: &AppConfig,
    ) -> Result<Self, AppError> {
        let source_path = std::path::absolute(source_path).map_err(|e| {
            AppError::InvalidInput(format!("{}: {}", source_path.display(), e))
        })?;
        if !source_path.is_file() {
            return Err(AppError::InvalidInput(format!(
                "{} does not exist or is not a file",
                source_path.display()
            )));
        }

        let request = Self::new(source_path, speed_up, target_folder);
        request
            .validate()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        if !config.is_known_folder(&request.target_folder) {
            return Err(AppError::InvalidInput(format!(
                "unknown folder '{}' (expected one of: {})",
                request.target_folder,
                config.upload_folders.join(", ")
            )));
        }

        Ok(request)
    }

    pub fn has_video_extension(&self) -> bool {
        self.source_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)))
    }
}

/// The single terminal result of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Success { uploaded_key: String },
    TranscodeFailed { pass: u8, reason: String },
    UploadFailed { reason: String },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success { .. })
    }

    pub fn notification_title(&self) -> &'static str {
        match self {
            JobOutcome::Success { .. } => "Upload Complete",
            JobOutcome::TranscodeFailed { .. } => "Video Processing Failed",
            JobOutcome::UploadFailed { .. } => "Upload Failed",
        }
    }

    pub fn notification_message(&self, folder: &str) -> String {
        match self {
            JobOutcome::Success { .. } => {
                format!("File uploaded to folder '{}' successfully.", folder)
            }
            JobOutcome::TranscodeFailed { pass, reason } => {
                format!("Video processing failed in pass {}: {}", pass, reason)
            }
            JobOutcome::UploadFailed { reason } => format!("Failed to upload file: {}", reason),
        }
    }
}

/// Where a job currently is. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Transcoding,
    Uploading,
    Succeeded,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Idle => "idle",
            JobState::Transcoding => "running(transcode)",
            JobState::Uploading => "running(upload)",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        };
        f.write_str(name)
    }
}

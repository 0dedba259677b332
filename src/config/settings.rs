use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::common::error::AppError;
use crate::config::env::{self, EnvKey};

pub const DEFAULT_BUCKET: &str = "public";
pub const DEFAULT_FOLDERS: &str = "default,ai-for-hr-mastermind";
pub const DEFAULT_FOLDER: &str = "default";

/// Which notification backend receives terminal job outcomes.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    Desktop,
    Log,
}

impl NotifierKind {
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            NotifierKind::Desktop
        } else {
            NotifierKind::Log
        }
    }
}

impl FromStr for NotifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(NotifierKind::Desktop),
            "log" => Ok(NotifierKind::Log),
            other => Err(format!("unknown notifier '{}'", other)),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_bucket: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
    pub upload_folders: Vec<String>,
    pub ffmpeg_path: PathBuf,
    pub transcode_output_dir: PathBuf,
    pub notifier: NotifierKind,
}

// Keeps the secret out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("s3_endpoint", &self.s3_endpoint)
            .field("s3_region", &self.s3_region)
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_access_key", &self.s3_access_key)
            .field("upload_folders", &self.upload_folders)
            .field("ffmpeg_path", &self.ffmpeg_path)
            .field("transcode_output_dir", &self.transcode_output_dir)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, AppError> {
        let raw_folders = env::get_or(EnvKey::UploadFolders, DEFAULT_FOLDERS);
        let upload_folders = parse_folders(&raw_folders);
        if upload_folders.is_empty() {
            return Err(AppError::Config(format!(
                "{} must name at least one folder",
                EnvKey::UploadFolders.as_str()
            )));
        }

        Ok(Self {
            s3_endpoint: required(EnvKey::S3Endpoint)?,
            s3_region: env::get_or(EnvKey::S3Region, "us-east-1"),
            s3_bucket: env::get_or(EnvKey::S3Bucket, DEFAULT_BUCKET),
            s3_access_key: required(EnvKey::S3AccessKey)?,
            s3_secret_key: required(EnvKey::S3SecretKey)?,
            upload_folders,
            ffmpeg_path: PathBuf::from(env::get_or(EnvKey::FfmpegPath, "ffmpeg")),
            transcode_output_dir: PathBuf::from(env::get_or(
                EnvKey::TranscodeOutputDir,
                "./recordings",
            )),
            notifier: env::get_parsed(EnvKey::Notifier, NotifierKind::platform_default()),
        })
    }

    pub fn is_known_folder(&self, folder: &str) -> bool {
        self.upload_folders.iter().any(|f| f == folder)
    }
}

fn required(key: EnvKey) -> Result<String, AppError> {
    let name = key.as_str();
    env::get(key)
        .map_err(|_| AppError::Config(format!("missing environment variable {}", name)))
}

fn parse_folders(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

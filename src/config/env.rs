use std::env;
use std::str::FromStr;

pub enum EnvKey {
    S3Endpoint,
    S3Region,
    S3Bucket,
    S3AccessKey,
    S3SecretKey,
    UploadFolders,
    FfmpegPath,
    TranscodeOutputDir,
    Notifier,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::S3Region => "S3_REGION",
            EnvKey::S3Bucket => "S3_BUCKET",
            EnvKey::S3AccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::S3SecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::UploadFolders => "UPLOAD_FOLDERS",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::TranscodeOutputDir => "TRANSCODE_OUTPUT_DIR",
            EnvKey::Notifier => "NOTIFIER",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

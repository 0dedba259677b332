use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::encoder::EncoderRunner;
use crate::infrastructure::encoder::ffmpeg::FfmpegRunner;
use crate::infrastructure::notify::{self, NotificationSink};
use crate::infrastructure::storage::ObjectStore;
use crate::infrastructure::storage::s3::StorageService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: Arc<dyn ObjectStore>,
    pub encoder: Arc<dyn EncoderRunner>,
    pub notifier: Arc<dyn NotificationSink>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        encoder: Arc<dyn EncoderRunner>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            config,
            storage,
            encoder,
            notifier,
        }
    }

    /// Production wiring: S3 storage, ffmpeg on `FFMPEG_PATH`, configured notifier.
    pub fn from_config(config: AppConfig) -> Self {
        let storage = Arc::new(StorageService::from_config(&config));
        let encoder = Arc::new(FfmpegRunner::new(config.ffmpeg_path.clone()));
        let notifier = notify::build_notifier(config.notifier);
        Self::new(config, storage, encoder, notifier)
    }
}

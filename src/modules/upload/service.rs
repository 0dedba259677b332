use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use super::model::UploadTarget;
use crate::common::error::UploadError;
use crate::infrastructure::storage::ObjectStore;

/// Single-attempt whole-object upload. Holds no per-call state.
pub struct UploadClient {
    store: Arc<dyn ObjectStore>,
}

impl UploadClient {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub async fn upload(
        &self,
        file_path: &Path,
        target: &UploadTarget,
    ) -> Result<(), UploadError> {
        if target.bucket.is_empty() || target.key.is_empty() {
            return Err(UploadError::new("bucket and key must not be empty"));
        }
        if !file_path.is_file() {
            return Err(UploadError::new(format!(
                "{} is not a readable file",
                file_path.display()
            )));
        }

        let content_type = mime_guess::from_path(file_path).first_or_octet_stream();

        info!(
            "⬆️ Uploading {} to {}/{}",
            file_path.display(),
            target.bucket,
            target.key
        );

        self.store
            .put_file(
                &target.bucket,
                &target.key,
                file_path,
                content_type.essence_str(),
            )
            .await
            .map_err(|e| {
                error!("❌ Upload of {} failed: {:#}", target.key, e);
                UploadError::new(format!("{:#}", e))
            })?;

        info!("✅ Uploaded {}/{}", target.bucket, target.key);
        Ok(())
    }
}

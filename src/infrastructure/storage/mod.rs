use async_trait::async_trait;
use std::path::Path;

pub mod s3;

/// Remote object store able to receive one whole file under one key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Replaces whatever object already lives at `bucket/key`.
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> anyhow::Result<()>;
}

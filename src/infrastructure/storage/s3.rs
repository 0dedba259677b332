use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{config::BehaviorVersion, config::Credentials, config::Region, Client};
use std::path::Path;
use tracing::{debug, info};

use super::ObjectStore;
use crate::config::settings::AppConfig;

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
}

impl StorageService {
    pub fn new(endpoint: &str, region: &str, access_key: &str, secret_key: &str) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true) // self-hosted S3 gateways
            .build();

        let client = Client::from_conf(config);

        info!("✅ S3 client ready for {}", endpoint);

        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.s3_endpoint,
            &config.s3_region,
            &config.s3_access_key,
            &config.s3_secret_key,
        )
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<()> {
        debug!("Streaming {} to s3://{}/{}", path.display(), bucket, key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| anyhow!("Failed to open {}: {}", path.display(), e))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            // the plain Display of dispatch/unmodeled errors drops the cause
            .map_err(|e| anyhow!("put_object failed: {}", DisplayErrorContext(&e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_keeps_the_transport_cause() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("clip.mp4");
        std::fs::write(&file, b"x").unwrap();
        // nothing listens on port 1
        let storage = StorageService::new("http://127.0.0.1:1", "us-east-1", "test", "test");

        let err = storage
            .put_file("public", "default/clip.mp4", &file, "video/mp4")
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.starts_with("put_object failed: "));
        assert!(message.contains("dispatch failure"), "{}", message);
        assert_ne!(message, "put_object failed: unhandled error");
    }
}

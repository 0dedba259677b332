use std::path::Path;

use crate::common::error::UploadError;

/// Where one uploaded file lands: `<bucket>/<folder>/<basename>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub bucket: String,
    pub key: String,
}

impl UploadTarget {
    /// Only the file name of `uploaded_path` reaches the key; local
    /// directories never leak into the bucket.
    pub fn for_file(
        bucket: &str,
        folder: &str,
        uploaded_path: &Path,
    ) -> Result<Self, UploadError> {
        let basename = uploaded_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                UploadError::new(format!("{} has no file name", uploaded_path.display()))
            })?;

        Ok(Self {
            bucket: bucket.to_string(),
            key: format!("{}/{}", folder.trim_end_matches('/'), basename),
        })
    }
}

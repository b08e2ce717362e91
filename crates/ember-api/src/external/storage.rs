//! Local-disk object storage collaborator
//!
//! Writes blobs under the configured upload directory and serves them back
//! by public URL prefix. A production deployment would swap this for an
//! S3-style implementation of the same trait.

use std::path::PathBuf;

use async_trait::async_trait;
use ember_common::StorageConfig;
use ember_core::traits::ObjectStorage;
use ember_core::DomainError;

/// Filesystem-backed object storage
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl LocalObjectStorage {
    /// Build storage from configuration
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.upload_dir),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            max_bytes: config.max_file_size_mb as usize * 1024 * 1024,
        }
    }

    fn check_segment(segment: &str) -> Result<(), DomainError> {
        if segment.is_empty()
            || segment
                .chars()
                .any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')))
            || segment.contains("..")
        {
            return Err(DomainError::ValidationError(format!(
                "invalid storage path segment: {segment}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(
        &self,
        bytes: &[u8],
        folder: &str,
        filename: &str,
        _content_type: &str,
    ) -> Result<String, DomainError> {
        if bytes.len() > self.max_bytes {
            return Err(DomainError::ValidationError(format!(
                "file exceeds the {} byte limit",
                self.max_bytes
            )));
        }
        Self::check_segment(folder)?;
        Self::check_segment(filename)?;
        if filename.contains('/') {
            return Err(DomainError::ValidationError(
                "filename cannot contain path separators".to_string(),
            ));
        }

        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| DomainError::ExternalServiceError(format!("storage mkdir failed: {e}")))?;

        let path = dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::ExternalServiceError(format!("storage write failed: {e}")))?;

        Ok(format!("{}/{}/{}", self.public_base_url, folder, filename))
    }
}

impl std::fmt::Debug for LocalObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalObjectStorage")
            .field("root", &self.root)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

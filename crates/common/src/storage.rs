//! Object storage abstraction for media uploads.

use std::path::PathBuf;

use crate::{AppError, AppResult, config::StorageSettings};

/// Stored object metadata.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Storage key (path or object key).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
    /// MD5 hash of the file.
    pub md5: String,
    /// Playback length in seconds, when the backend can probe media.
    pub duration: Option<f64>,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Upload a file.
    async fn upload(&self, key: &str, data: &[u8], content_type: &str)
    -> AppResult<UploadedFile>;

    /// Delete a file.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;

    /// Check if a file exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    /// Create a local storage backend from configuration.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(settings.base_path.clone(), settings.base_url.clone())
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedFile> {
        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        let md5 = format!("{:x}", md5::compute(data));

        Ok(UploadedFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5,
            duration: None,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.base_path.join(key);
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to delete file: {e}")))?;
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.base_path.join(key).exists())
    }
}

/// Generate a unique storage key for an uploaded file.
///
/// Keys are grouped by date and owner: `YYYY/MM/DD/<owner>/<millis>_<uuid>.<ext>`.
#[must_use]
pub fn generate_storage_key(owner_id: &str, original_name: &str) -> String {
    use chrono::Utc;

    let now = Utc::now();
    let date_path = now.format("%Y/%m/%d").to_string();
    let timestamp = now.timestamp_millis();

    let extension = original_name
        .rfind('.')
        .filter(|&pos| pos > 0 && pos < original_name.len() - 1)
        .map(|pos| &original_name[pos + 1..])
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 10 && ext.bytes().all(|b| b.is_ascii_alphanumeric())
        })
        .unwrap_or("bin");

    format!(
        "{}/{}/{}_{}.{}",
        date_path,
        owner_id,
        timestamp,
        uuid::Uuid::new_v4(),
        extension
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key() {
        let key = generate_storage_key("user123", "clip.mp4");
        assert!(key.contains("/user123/"));
        assert!(key.ends_with(".mp4"));
    }

    #[test]
    fn test_generate_storage_key_no_extension() {
        let key = generate_storage_key("user123", "thumbnail");
        assert!(key.ends_with(".bin"));
    }

    #[test]
    fn test_generate_storage_key_rejects_path_segments() {
        for name in ["a./../x", "clip.mp4/..", "evil.m\\p4", "a.b c"] {
            let key = generate_storage_key("user123", name);
            assert!(key.ends_with(".bin"), "{name} -> {key}");
            assert!(!key.contains(".."));
        }
    }

    #[test]
    fn test_public_url_joins_without_double_slash() {
        let storage = LocalStorage::new(PathBuf::from("/tmp"), "/media/".to_string());
        assert_eq!(storage.public_url("a/b.mp4"), "/media/a/b.mp4");
    }

    #[tokio::test]
    async fn test_local_upload_and_delete() {
        let dir = std::env::temp_dir().join(format!("videotube-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(dir.clone(), "/media".to_string());

        let uploaded = storage
            .upload("x/thumb.png", b"png-bytes", "image/png")
            .await
            .unwrap();

        assert_eq!(uploaded.url, "/media/x/thumb.png");
        assert_eq!(uploaded.size, 9);
        assert!(uploaded.duration.is_none());
        assert!(storage.exists("x/thumb.png").await.unwrap());

        storage.delete("x/thumb.png").await.unwrap();
        assert!(!storage.exists("x/thumb.png").await.unwrap());

        let _ = std::fs::remove_dir_all(dir);
    }
}

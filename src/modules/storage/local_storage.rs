//! Local file system storage for report photos
//!
//! Files land in the configured upload folder and are served back under
//! `/uploads/<name>`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::config::UploadConfig;
use crate::core::error::{AppError, Result};

/// Extensions accepted for report photos (compared lowercase)
pub const ALLOWED_PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Public URL prefix the upload folder is served under
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

pub struct LocalPhotoStorage {
    folder: PathBuf,
    max_file_size: usize,
}

impl LocalPhotoStorage {
    /// Create the storage, making sure the upload folder exists
    pub async fn new(config: &UploadConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.folder)
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "Failed to create upload folder {}: {}",
                    config.folder.display(),
                    e
                ))
            })?;

        Ok(Self {
            folder: config.folder.clone(),
            max_file_size: config.max_file_size,
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Reject files whose extension is not an allowed image type
    pub fn check_extension(original_filename: &str) -> Result<String> {
        let extension = original_filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        if ALLOWED_PHOTO_EXTENSIONS.contains(&extension.as_str()) {
            Ok(extension)
        } else {
            Err(AppError::UnsupportedMedia(format!(
                "File extension not allowed. Allowed: {}",
                ALLOWED_PHOTO_EXTENSIONS.join(", ")
            )))
        }
    }

    /// Persist a photo and return its public reference (`/uploads/<name>`)
    pub async fn store(&self, original_filename: &str, data: &[u8]) -> Result<String> {
        Self::check_extension(original_filename)?;

        if data.len() > self.max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "Photo too large. Maximum size is {} bytes",
                self.max_file_size
            )));
        }

        let file_name = format!(
            "{}_{}_{}",
            Utc::now().format("%Y%m%d%H%M%S"),
            &Uuid::new_v4().simple().to_string()[..8],
            sanitize_filename(original_filename)
        );
        let path = self.folder.join(&file_name);

        tokio::fs::write(&path, data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!("Photo stored: {} ({} bytes)", path.display(), data.len());

        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, file_name))
    }

    /// Best-effort removal of a previously stored photo
    pub async fn remove(&self, url: &str) {
        let Some(file_name) = url
            .strip_prefix(UPLOADS_URL_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']))
        else {
            return;
        };

        let path = self.folder.join(file_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("Failed to remove orphaned photo {}: {}", path.display(), e);
        }
    }
}

/// Keep ASCII letters, digits, `.`, `-` and `_`; everything else becomes `_`.
/// Leading dots are stripped so the result is never hidden or a parent path.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "photo".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage(dir: &tempfile::TempDir, max_file_size: usize) -> LocalPhotoStorage {
        LocalPhotoStorage::new(&UploadConfig {
            folder: dir.path().join("uploads"),
            max_file_size,
        })
        .await
        .unwrap()
    }

    #[test]
    fn test_check_extension() {
        assert_eq!(LocalPhotoStorage::check_extension("a.PNG").unwrap(), "png");
        assert_eq!(LocalPhotoStorage::check_extension("x.y.jpeg").unwrap(), "jpeg");
        assert!(matches!(
            LocalPhotoStorage::check_extension("anim.gif"),
            Err(AppError::UnsupportedMedia(_))
        ));
        assert!(matches!(
            LocalPhotoStorage::check_extension("noext"),
            Err(AppError::UnsupportedMedia(_))
        ));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename("..."), "photo");
        assert_eq!(sanitize_filename(r"C:\tmp\sink.webp"), "sink.webp");
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, 1024).await;

        let url = storage.store("sink.jpg", b"jpeg-bytes").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("_sink.jpg"));

        let name = url.trim_start_matches("/uploads/");
        let written = tokio::fs::read(storage.folder().join(name)).await.unwrap();
        assert_eq!(written, b"jpeg-bytes");

        storage.remove(&url).await;
        assert!(!storage.folder().join(name).exists());
    }

    #[tokio::test]
    async fn test_store_rejects_oversized_and_disallowed_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, 4).await;

        assert!(matches!(
            storage.store("big.png", b"12345").await,
            Err(AppError::PayloadTooLarge(_))
        ));
        assert!(matches!(
            storage.store("anim.gif", b"1").await,
            Err(AppError::UnsupportedMedia(_))
        ));
    }
}

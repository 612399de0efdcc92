//! Storage for images uploaded with venue and event listings.
//!
//! Files are keyed by their original name. A second upload with the same
//! name overwrites the first.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use axum::body::Bytes;
use tracing::debug;

use crate::error::MarketError;

/// One uploaded image as read from a multipart request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File name sent by the client.
    pub file_name: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub bytes: Bytes,
}

/// Persists uploaded images and returns a reference to store on the listing.
#[async_trait]
pub trait ImageStore: Send + Sync + std::fmt::Debug {
    /// Saves `upload` and returns its stored path.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persistence`] if the file cannot be written.
    async fn save(&self, upload: ImageUpload) -> Result<String, MarketError>;

    /// Saves every upload in order.
    ///
    /// # Errors
    ///
    /// Returns the first error hit; earlier files stay on disk.
    async fn save_all(&self, uploads: Vec<ImageUpload>) -> Result<Vec<String>, MarketError> {
        let mut paths = Vec::with_capacity(uploads.len());
        for upload in uploads {
            paths.push(self.save(upload).await?);
        }
        Ok(paths)
    }
}

/// Writes images into a directory on the local file system.
#[derive(Debug, Clone)]
pub struct DiskImageStore {
    root: PathBuf,
}

impl DiskImageStore {
    /// Creates a store writing under `root`. The directory is created on the
    /// first save if missing.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory images are written to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Strips any directory components from a client-supplied file name.
fn safe_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "..")
        .map_or_else(|| format!("{}.bin", uuid::Uuid::new_v4()), ToString::to_string)
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn save(&self, upload: ImageUpload) -> Result<String, MarketError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| MarketError::Persistence(format!("cannot create upload dir: {e}")))?;

        let path = self.root.join(safe_file_name(&upload.file_name));
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| MarketError::Persistence(format!("cannot write image: {e}")))?;

        debug!(
            path = %path.display(),
            size = upload.bytes.len(),
            content_type = upload.content_type.as_deref().unwrap_or("unknown"),
            "image stored"
        );
        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn upload(name: &str, body: &'static [u8]) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(body),
        }
    }

    #[test]
    fn directory_components_are_stripped() {
        assert_eq!(safe_file_name("../../etc/passwd"), "passwd");
        assert_eq!(safe_file_name("hall.png"), "hall.png");
        assert!(safe_file_name("").ends_with(".bin"));
    }

    #[tokio::test]
    async fn saves_under_root_by_original_name() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let store = DiskImageStore::new(dir.path().join("uploads"));
        let Ok(path) = store.save(upload("hall.png", b"png")).await else {
            panic!("save failed");
        };
        assert!(path.ends_with("hall.png"));
        let Ok(contents) = tokio::fs::read(&path).await else {
            panic!("file missing");
        };
        assert_eq!(contents, b"png");
    }

    #[tokio::test]
    async fn same_name_overwrites() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let store = DiskImageStore::new(dir.path());
        let Ok(paths) = store
            .save_all(vec![upload("a.png", b"one"), upload("a.png", b"two")])
            .await
        else {
            panic!("save failed");
        };
        assert_eq!(paths.first(), paths.get(1));
        let Some(path) = paths.first() else {
            panic!("no path");
        };
        assert_eq!(tokio::fs::read(path).await.unwrap_or_default(), b"two");
    }
}

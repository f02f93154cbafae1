//! Filesystem photo store.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use daybook_core::ports::{BlobStore, StorageError};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Writes photos under `root` and serves them from `public_base_url/photos/`.
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// File under `root` for one of our public URLs.
    fn file_name<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url
            .strip_prefix(self.public_base_url.as_str())?
            .strip_prefix("/photos/")?;
        let plain = !name.is_empty() && !name.contains(['/', '\\']) && name != "..";
        plain.then_some(name)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store_photo(
        &self,
        owner: Uuid,
        extension: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let extension = extension.to_ascii_lowercase();
        if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(StorageError::UnsupportedType(extension));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        let file_name = format!("{owner}{}.{extension}", Utc::now().timestamp_millis());
        tokio::fs::write(self.root.join(&file_name), bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(%owner, file = %file_name, "Stored photo");
        Ok(format!("{}/photos/{file_name}", self.public_base_url))
    }

    async fn delete_photo(&self, url: &str) -> Result<(), StorageError> {
        let Some(file_name) = self.file_name(url) else {
            return Ok(());
        };

        match tokio::fs::remove_file(self.root.join(file_name)).await {
            Ok(()) => {
                tracing::debug!(file = %file_name, "Deleted photo");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_bytes_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:8080/");
        let owner = Uuid::new_v4();

        let url = store
            .store_photo(owner, "PNG", vec![1, 2, 3])
            .await
            .unwrap();

        assert!(url.starts_with(&format!("http://localhost:8080/photos/{owner}")));
        assert!(url.ends_with(".png"));
        let file_name = url.rsplit('/').next().unwrap();
        let written = std::fs::read(dir.path().join(file_name)).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn deletes_only_its_own_photos() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:8080");
        let url = store
            .store_photo(Uuid::new_v4(), "jpg", vec![7])
            .await
            .unwrap();
        let file_name = url.rsplit('/').next().unwrap().to_string();
        let bystander = dir.path().join("keep.jpg");
        std::fs::write(&bystander, [1]).unwrap();

        store.delete_photo(&url).await.unwrap();
        assert!(!dir.path().join(&file_name).exists());

        // Second delete and foreign URLs are no-ops.
        store.delete_photo(&url).await.unwrap();
        store
            .delete_photo("https://elsewhere.example/photos/keep.jpg")
            .await
            .unwrap();
        store
            .delete_photo("http://localhost:8080/photos/../keep.jpg")
            .await
            .unwrap();
        assert!(bystander.exists());
    }

    #[tokio::test]
    async fn rejects_non_image_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost");

        let err = store
            .store_photo(Uuid::new_v4(), "exe", vec![0])
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::UnsupportedType(_)));
    }
}

//! Photo blob storage port.

use async_trait::async_trait;
use uuid::Uuid;

/// Stores uploaded photos and hands back an absolute URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `bytes` for `owner`; `extension` is without the dot.
    async fn store_photo(
        &self,
        owner: Uuid,
        extension: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError>;

    /// Remove a photo previously returned by `store_photo`. URLs this store
    /// did not hand out, and photos already gone, are not errors.
    async fn delete_photo(&self, url: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Unsupported photo type: {0}")]
    UnsupportedType(String),

    #[error("Storage I/O failed: {0}")]
    Io(String),
}

use async_trait::async_trait;

use super::error::StorageError;
use super::hash::ContentHash;

/// Metadata of an image after it has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredImage {
    pub hash: ContentHash,
    pub size: u64,
}

/// Content-addressed storage for uploaded schedule images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores the bytes. Storing the same content twice is a no-op.
    async fn put(&self, data: &[u8]) -> Result<StoredImage, StorageError>;

    /// Whether an earlier upload produced `hash`.
    async fn exists(&self, hash: &ContentHash) -> Result<bool, StorageError>;
}

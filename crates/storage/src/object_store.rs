use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object `{bucket}/{object}` was not found")]
    NotFound { bucket: String, object: String },
    #[error("object storage returned status {status} for `{bucket}/{object}`")]
    Status { bucket: String, object: String, status: u16 },
    #[error("object storage request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("object read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid object reference `{bucket}/{object}`: {reason}")]
    InvalidReference { bucket: String, object: String, reason: String },
    #[error("object storage client could not be built: {0}")]
    Client(String),
    #[error("object storage credentials are unavailable: {0}")]
    Credentials(String),
}

/// Minimal read capability over a bucket/object blob store.
///
/// `open_for_read` returns the whole object; the underlying reader or
/// response body is released before the call returns, on success or failure.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn open_for_read(&self, bucket: &str, object: &str) -> Result<Vec<u8>, StorageError>;
}

pub type SharedObjectStore = Arc<dyn ObjectStore>;

#[async_trait]
impl<S> ObjectStore for Arc<S>
where
    S: ObjectStore + ?Sized,
{
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    async fn open_for_read(&self, bucket: &str, object: &str) -> Result<Vec<u8>, StorageError> {
        (**self).open_for_read(bucket, object).await
    }
}

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::object_store::{ObjectStore, StorageError};

/// Serves `{root}/{bucket}/{object}` from local disk.
#[derive(Clone, Debug)]
pub struct FilesystemObjectStore {
    root: PathBuf,
}

impl FilesystemObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn object_path(&self, bucket: &str, object: &str) -> Result<PathBuf, StorageError> {
        let invalid = |reason: &str| StorageError::InvalidReference {
            bucket: bucket.to_string(),
            object: object.to_string(),
            reason: reason.to_string(),
        };

        if !is_plain_relative(Path::new(bucket)) || bucket.contains(['/', '\\']) {
            return Err(invalid("bucket must be a single path segment"));
        }
        if !is_plain_relative(Path::new(object)) {
            return Err(invalid("object must be a relative path without `..`"));
        }

        Ok(self.root.join(bucket).join(object))
    }
}

fn is_plain_relative(path: &Path) -> bool {
    let mut components = path.components().peekable();
    components.peek().is_some() && components.all(|component| matches!(component, Component::Normal(_)))
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    fn backend(&self) -> &'static str {
        "filesystem"
    }

    async fn open_for_read(&self, bucket: &str, object: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(bucket, object)?;
        tokio::fs::read(&path).await.map_err(|error| match error.kind() {
            ErrorKind::NotFound => {
                StorageError::NotFound { bucket: bucket.to_string(), object: object.to_string() }
            }
            _ => StorageError::Io(error),
        })
    }
}

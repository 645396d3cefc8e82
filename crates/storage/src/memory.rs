use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::object_store::{ObjectStore, StorageError};

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn with_object(
        mut self,
        bucket: impl Into<String>,
        object: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.objects.get_mut().insert((bucket.into(), object.into()), bytes.into());
        self
    }

    pub async fn put(&self, bucket: &str, object: &str, bytes: impl Into<Vec<u8>>) {
        let mut objects = self.objects.write().await;
        objects.insert((bucket.to_string(), object.to_string()), bytes.into());
    }

    pub async fn remove(&self, bucket: &str, object: &str) -> Option<Vec<u8>> {
        let mut objects = self.objects.write().await;
        objects.remove(&(bucket.to_string(), object.to_string()))
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn open_for_read(&self, bucket: &str, object: &str) -> Result<Vec<u8>, StorageError> {
        let objects = self.objects.read().await;
        objects.get(&(bucket.to_string(), object.to_string())).cloned().ok_or_else(|| {
            StorageError::NotFound { bucket: bucket.to_string(), object: object.to_string() }
        })
    }
}

use std::time::{Duration, Instant};

use async_trait::async_trait;
use shelfhook_core::catalog::loader::{CatalogLoader, CatalogLocation, LoadError};
use shelfhook_core::domain::store::Catalog;
use tracing::{info, warn};

use crate::object_store::ObjectStore;

/// Catalog loader that reads one JSON blob from an [`ObjectStore`] per call.
///
/// The fetch runs under `timeout`; dropping the returned future cancels it.
pub struct BlobCatalogLoader<S> {
    store: S,
    timeout: Duration,
}

impl<S> BlobCatalogLoader<S>
where
    S: ObjectStore,
{
    pub fn new(store: S, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

pub fn decode_catalog(bytes: &[u8]) -> Result<Catalog, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[async_trait]
impl<S> CatalogLoader for BlobCatalogLoader<S>
where
    S: ObjectStore,
{
    async fn load(&self, location: &CatalogLocation) -> Result<Catalog, LoadError> {
        let started = Instant::now();
        let fetch = self.store.open_for_read(&location.bucket, &location.object);

        let bytes = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(error)) => {
                warn!(
                    event_name = "storage.catalog.open_failed",
                    backend = self.store.backend(),
                    bucket = %location.bucket,
                    object = %location.object,
                    error = %error,
                    "catalog object could not be read"
                );
                return Err(LoadError::Open { location: location.clone(), message: error.to_string() });
            }
            Err(_) => {
                warn!(
                    event_name = "storage.catalog.timeout",
                    backend = self.store.backend(),
                    bucket = %location.bucket,
                    object = %location.object,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "catalog fetch timed out"
                );
                return Err(LoadError::Timeout {
                    location: location.clone(),
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        let catalog = decode_catalog(&bytes).map_err(|error| {
            warn!(
                event_name = "storage.catalog.decode_failed",
                bucket = %location.bucket,
                object = %location.object,
                byte_count = bytes.len(),
                error = %error,
                "catalog object is not a store list"
            );
            LoadError::Decode { location: location.clone(), message: error.to_string() }
        })?;

        info!(
            event_name = "storage.catalog.loaded",
            backend = self.store.backend(),
            bucket = %location.bucket,
            object = %location.object,
            store_count = catalog.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog loaded"
        );
        Ok(catalog)
    }
}

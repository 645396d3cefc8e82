use std::sync::Arc;
use std::time::Duration;

use shelfhook_core::config::{CatalogConfig, StorageBackend};

use crate::auth::{MetadataTokenProvider, SharedTokenProvider, StaticTokenProvider};
use crate::filesystem::FilesystemObjectStore;
use crate::gcs::GcsObjectStore;
use crate::loader::BlobCatalogLoader;
use crate::object_store::{SharedObjectStore, StorageError};

pub type ConfiguredCatalogLoader = BlobCatalogLoader<SharedObjectStore>;

pub fn connect(config: &CatalogConfig) -> Result<SharedObjectStore, StorageError> {
    match config.backend {
        StorageBackend::Gcs => {
            let timeout = Duration::from_secs(config.timeout_secs.max(1));
            let store = GcsObjectStore::new(&config.base_url, credentials(config, timeout)?, timeout)?;
            Ok(Arc::new(store))
        }
        StorageBackend::Filesystem => Ok(Arc::new(FilesystemObjectStore::new(&config.root_dir))),
    }
}

/// A configured token wins; otherwise the metadata server is asked unless
/// anonymous access is requested.
fn credentials(
    config: &CatalogConfig,
    timeout: Duration,
) -> Result<Option<SharedTokenProvider>, StorageError> {
    if let Some(token) = &config.access_token {
        return Ok(Some(Arc::new(StaticTokenProvider::new(token.clone()))));
    }
    if config.anonymous {
        return Ok(None);
    }
    let provider = MetadataTokenProvider::new(&config.metadata_url, timeout)?;
    Ok(Some(Arc::new(provider)))
}

pub fn catalog_loader(config: &CatalogConfig) -> Result<ConfiguredCatalogLoader, StorageError> {
    let store = connect(config)?;
    Ok(BlobCatalogLoader::new(store, Duration::from_secs(config.timeout_secs.max(1))))
}

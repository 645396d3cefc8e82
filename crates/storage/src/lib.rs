pub mod auth;
pub mod connection;
pub mod filesystem;
pub mod fixtures;
pub mod gcs;
pub mod loader;
pub mod memory;
pub mod object_store;
#[cfg(test)]
mod test_support;

pub use auth::{MetadataTokenProvider, SharedTokenProvider, StaticTokenProvider, TokenProvider};
pub use connection::{catalog_loader, connect, ConfiguredCatalogLoader};
pub use filesystem::FilesystemObjectStore;
pub use fixtures::{sample_catalog, sample_catalog_json};
pub use gcs::GcsObjectStore;
pub use loader::{decode_catalog, BlobCatalogLoader};
pub use memory::InMemoryObjectStore;
pub use object_store::{ObjectStore, SharedObjectStore, StorageError};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::store::Catalog;

/// Bucket/object pair naming one catalog blob.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CatalogLocation {
    pub bucket: String,
    pub object: String,
}

impl CatalogLocation {
    pub fn new(bucket: impl Into<String>, object: impl Into<String>) -> Self {
        Self { bucket: bucket.into(), object: object.into() }
    }
}

impl fmt::Display for CatalogLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.object)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("could not open catalog `{location}`: {message}")]
    Open { location: CatalogLocation, message: String },
    #[error("could not decode catalog `{location}`: {message}")]
    Decode { location: CatalogLocation, message: String },
    #[error("catalog `{location}` was not fetched within {timeout_secs}s")]
    Timeout { location: CatalogLocation, timeout_secs: u64 },
}

impl LoadError {
    pub fn location(&self) -> &CatalogLocation {
        match self {
            Self::Open { location, .. }
            | Self::Decode { location, .. }
            | Self::Timeout { location, .. } => location,
        }
    }
}

/// Source of catalog snapshots. Each call returns a fresh copy; implementors
/// must not cache between calls.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load(&self, location: &CatalogLocation) -> Result<Catalog, LoadError>;
}

pub type SharedCatalogLoader = Arc<dyn CatalogLoader>;

#[async_trait]
impl<L> CatalogLoader for Arc<L>
where
    L: CatalogLoader + ?Sized,
{
    async fn load(&self, location: &CatalogLocation) -> Result<Catalog, LoadError> {
        (**self).load(location).await
    }
}

/// Loader serving a fixed catalog, for demos and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalogLoader {
    catalog: Catalog,
}

impl StaticCatalogLoader {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl CatalogLoader for StaticCatalogLoader {
    async fn load(&self, _location: &CatalogLocation) -> Result<Catalog, LoadError> {
        Ok(self.catalog.clone())
    }
}

pub mod loader;
pub mod query;

pub use loader::{CatalogLoader, CatalogLocation, LoadError, SharedCatalogLoader, StaticCatalogLoader};
pub use query::{cheapest_store_for_item, distinct_store_names, stores_stocking_item, CheapestMatch};

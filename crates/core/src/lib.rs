//! Core of the shelfhook fulfillment webhook.
//!
//! - `domain`: store and item records as they appear in the catalog blob
//! - `catalog`: the catalog loader seam and the read-only lookups
//! - `webhook`: platform wire schema, intent tags, and the dispatcher
//! - `config`: layered application configuration
//!
//! Transports (HTTP, CLI) and object storage clients live in sibling crates
//! and only talk to this crate through [`CatalogLoader`] and
//! [`WebhookDispatcher`].

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
mod nullable;
pub mod webhook;

pub use catalog::{
    cheapest_store_for_item, distinct_store_names, stores_stocking_item, CatalogLoader,
    CatalogLocation, CheapestMatch, LoadError, SharedCatalogLoader, StaticCatalogLoader,
};
pub use domain::store::{Catalog, Item, Store};
pub use errors::WebhookError;
pub use webhook::{IntentTag, WebhookDispatcher, WebhookRequest, WebhookResponse};

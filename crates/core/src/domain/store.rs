use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::nullable::null_as_default;

/// A single shelf entry. Missing or `null` fields decode to zero values so
/// partially filled catalog blobs still load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "null_as_default"
    )]
    pub price: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
}

impl Item {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self { name: name.into(), price, categories: Vec::new() }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

/// Store records are not deduplicated: the same name may appear on several
/// records, each with its own shelf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Store {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

impl Store {
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self { name: name.into(), items }
    }

    pub fn stocks(&self, item_name: &str) -> bool {
        self.items.iter().any(|item| item.name == item_name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    stores: Vec<Store>,
}

impl Catalog {
    pub fn new(stores: Vec<Store>) -> Self {
        Self { stores }
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl From<Vec<Store>> for Catalog {
    fn from(stores: Vec<Store>) -> Self {
        Self::new(stores)
    }
}

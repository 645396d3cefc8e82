use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shelfhook_core::catalog::loader::{CatalogLoader, CatalogLocation, LoadError};
use shelfhook_core::catalog::query::{cheapest_store_for_item, distinct_store_names};
use shelfhook_storage::{
    sample_catalog, sample_catalog_json, BlobCatalogLoader, FilesystemObjectStore,
    InMemoryObjectStore, ObjectStore, StorageError,
};
use tempfile::TempDir;

fn location() -> CatalogLocation {
    CatalogLocation::new("stores-test", "stores")
}

fn loader_over(store: InMemoryObjectStore) -> BlobCatalogLoader<InMemoryObjectStore> {
    BlobCatalogLoader::new(store, Duration::from_secs(5))
}

#[tokio::test]
async fn loads_and_queries_catalog_from_memory_store() {
    let loader = loader_over(InMemoryObjectStore::default().with_object(
        "stores-test",
        "stores",
        sample_catalog_json().expect("sample json"),
    ));

    let catalog = loader.load(&location()).await.expect("catalog loads");

    assert_eq!(catalog, sample_catalog());
    assert_eq!(distinct_store_names(&catalog), vec!["Kroger", "Aldi's", "Target"]);
    let cheapest = cheapest_store_for_item(&catalog, "Banana").expect("bananas are stocked");
    assert_eq!(cheapest.store.name, "Target");
    assert_eq!(cheapest.price, Decimal::new(10, 2));
}

#[tokio::test]
async fn decoding_is_permissive_about_fields() {
    let blob = br#"[
        {"name": "Kroger", "region": "midwest", "items": [{"name": "Apple", "price": 1.15, "sku": 7}]},
        {"name": "Corner Shop"},
        {"items": [{"name": "Banana"}]},
        {"name": null, "items": [{"name": "Pear", "price": null, "categories": null}]},
        {"name": "Empty Shelf", "items": null}
    ]"#;
    let loader =
        loader_over(InMemoryObjectStore::default().with_object("stores-test", "stores", &blob[..]));

    let catalog = loader.load(&location()).await.expect("catalog loads");

    assert_eq!(catalog.len(), 5);
    assert_eq!(catalog.stores()[0].items[0].price, Decimal::new(115, 2));
    assert!(catalog.stores()[1].items.is_empty());
    assert_eq!(catalog.stores()[2].name, "");
    assert_eq!(catalog.stores()[2].items[0].price, Decimal::ZERO);
    assert!(catalog.stores()[2].items[0].categories.is_empty());
    assert_eq!(catalog.stores()[3].name, "");
    assert_eq!(catalog.stores()[3].items[0].name, "Pear");
    assert_eq!(catalog.stores()[3].items[0].price, Decimal::ZERO);
    assert!(catalog.stores()[3].items[0].categories.is_empty());
    assert_eq!(catalog.stores()[4].name, "Empty Shelf");
    assert!(catalog.stores()[4].items.is_empty());
}

#[tokio::test]
async fn each_load_reads_the_current_object() {
    let store = Arc::new(InMemoryObjectStore::default());
    store.put("stores-test", "stores", "[]").await;
    let loader = BlobCatalogLoader::new(store.clone(), Duration::from_secs(5));

    assert!(loader.load(&location()).await.expect("empty catalog").is_empty());

    store.put("stores-test", "stores", sample_catalog_json().expect("sample json")).await;
    assert_eq!(loader.load(&location()).await.expect("refreshed catalog").len(), 4);
}

#[tokio::test]
async fn missing_object_is_an_open_error() {
    let loader = loader_over(InMemoryObjectStore::default());

    let error = loader.load(&location()).await.expect_err("missing object");

    match error {
        LoadError::Open { location: failed, message } => {
            assert_eq!(failed, location());
            assert!(message.contains("stores-test/stores"), "{message}");
        }
        other => panic!("expected open error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_array_blobs_are_decode_errors() {
    for blob in ["not json", "{\"name\": \"Kroger\"}", "null", "[{\"name\": 5}]"] {
        let loader =
            loader_over(InMemoryObjectStore::default().with_object("stores-test", "stores", blob));

        let error = loader.load(&location()).await.expect_err("decode failure");
        assert!(matches!(error, LoadError::Decode { .. }), "{blob}: {error:?}");
    }
}

struct StalledStore;

#[async_trait]
impl ObjectStore for StalledStore {
    fn backend(&self) -> &'static str {
        "stalled"
    }

    async fn open_for_read(&self, _bucket: &str, _object: &str) -> Result<Vec<u8>, StorageError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(b"[]".to_vec())
    }
}

#[tokio::test]
async fn slow_fetch_times_out() {
    let loader = BlobCatalogLoader::new(StalledStore, Duration::from_millis(50));

    let error = loader.load(&location()).await.expect_err("timeout");

    assert!(matches!(error, LoadError::Timeout { .. }));
    assert_eq!(error.location(), &location());
}

#[tokio::test]
async fn filesystem_store_serves_catalog_blobs() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("stores-test")).expect("bucket dir");
    std::fs::write(dir.path().join("stores-test/stores"), sample_catalog_json().expect("sample json"))
        .expect("blob");

    let loader =
        BlobCatalogLoader::new(FilesystemObjectStore::new(dir.path()), Duration::from_secs(5));

    let catalog = loader.load(&location()).await.expect("catalog loads");
    assert_eq!(catalog, sample_catalog());

    let error = loader
        .load(&CatalogLocation::new("stores-test", "missing"))
        .await
        .expect_err("missing blob");
    assert!(matches!(error, LoadError::Open { .. }));
}

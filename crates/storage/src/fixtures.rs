use rust_decimal::Decimal;
use shelfhook_core::domain::store::{Catalog, Item, Store};

/// The four-store grocery catalog used by the demo command and tests.
/// Kroger appears twice on purpose.
pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        Store::new(
            "Kroger",
            vec![
                Item::new("Apple", Decimal::new(115, 2)).with_categories(["produce", "fruit"]),
                Item::new("Banana", Decimal::new(175, 2)).with_categories(["produce", "fruit"]),
            ],
        ),
        Store::new(
            "Aldi's",
            vec![
                Item::new("Pizza", Decimal::new(500, 2)).with_categories(["frozen"]),
                Item::new("Lasagna", Decimal::new(425, 2)).with_categories(["frozen"]),
                Item::new("Banana", Decimal::new(100, 2)).with_categories(["produce", "fruit"]),
            ],
        ),
        Store::new(
            "Target",
            vec![Item::new("Banana", Decimal::new(10, 2)).with_categories(["produce", "fruit"])],
        ),
        Store::new(
            "Kroger",
            vec![Item::new("Banana", Decimal::new(300, 2)).with_categories(["produce", "fruit"])],
        ),
    ])
}

/// [`sample_catalog`] in the blob format the loaders read.
pub fn sample_catalog_json() -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(&sample_catalog())
}

#[cfg(test)]
mod tests {
    use shelfhook_core::domain::store::Catalog;

    use super::{sample_catalog, sample_catalog_json};

    #[test]
    fn sample_json_decodes_back_to_the_sample_catalog() {
        let decoded: Catalog =
            serde_json::from_slice(&sample_catalog_json().expect("sample json encodes"))
                .expect("sample json decodes");
        assert_eq!(decoded, sample_catalog());
    }
}

//! Read-only lookups over a loaded [`Catalog`].
//!
//! Every function here is a single linear scan. Results preserve catalog
//! order and borrow from the input; nothing is sorted or deduplicated unless
//! stated.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::domain::store::{Catalog, Store};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheapestMatch<'a> {
    pub store: &'a Store,
    pub price: Decimal,
}

/// Store names in order of first appearance.
pub fn distinct_store_names(catalog: &Catalog) -> Vec<String> {
    let mut seen = HashSet::new();
    catalog
        .stores()
        .iter()
        .filter(|store| seen.insert(store.name.as_str()))
        .map(|store| store.name.clone())
        .collect()
}

/// Every store record stocking `item_name`, once per record even when the
/// record lists the item more than once.
pub fn stores_stocking_item<'a>(catalog: &'a Catalog, item_name: &str) -> Vec<&'a Store> {
    catalog.stores().iter().filter(|store| store.stocks(item_name)).collect()
}

/// Lowest-priced offer for `item_name`. On an exact price tie the later
/// (store, item) pair in catalog order wins.
pub fn cheapest_store_for_item<'a>(
    catalog: &'a Catalog,
    item_name: &str,
) -> Option<CheapestMatch<'a>> {
    let mut cheapest: Option<CheapestMatch<'a>> = None;

    for store in catalog.stores() {
        for item in store.items.iter().filter(|item| item.name == item_name) {
            let replaces = cheapest.map_or(true, |current| item.price <= current.price);
            if replaces {
                cheapest = Some(CheapestMatch { store, price: item.price });
            }
        }
    }

    cheapest
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{cheapest_store_for_item, distinct_store_names, stores_stocking_item};
    use crate::domain::store::{Catalog, Item, Store};

    fn price(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn grocery_catalog() -> Catalog {
        Catalog::new(vec![
            Store::new(
                "Kroger",
                vec![Item::new("Apple", price(115)), Item::new("Banana", price(175))],
            ),
            Store::new(
                "Aldi's",
                vec![
                    Item::new("Pizza", price(500)),
                    Item::new("Lasagna", price(425)),
                    Item::new("Banana", price(100)),
                ],
            ),
            Store::new("Target", vec![Item::new("Banana", price(10))]),
            Store::new("Kroger", vec![Item::new("Banana", price(300))]),
        ])
    }

    #[test]
    fn distinct_names_keep_first_seen_order() {
        assert_eq!(distinct_store_names(&grocery_catalog()), vec!["Kroger", "Aldi's", "Target"]);
    }

    #[test]
    fn distinct_names_of_empty_catalog_is_empty() {
        assert!(distinct_store_names(&Catalog::default()).is_empty());
    }

    #[test]
    fn stocking_stores_include_duplicate_records() {
        let catalog = grocery_catalog();
        let stores = stores_stocking_item(&catalog, "Banana");

        let names: Vec<&str> = stores.iter().map(|store| store.name.as_str()).collect();
        assert_eq!(names, vec!["Kroger", "Aldi's", "Target", "Kroger"]);
        assert_eq!(stores[0], &catalog.stores()[0]);
        assert_eq!(stores[3], &catalog.stores()[3]);
        assert!(stores.iter().all(|store| store.stocks("Banana")));
    }

    #[test]
    fn stocking_store_with_repeated_item_appears_once() {
        let catalog = Catalog::new(vec![Store::new(
            "Kroger",
            vec![Item::new("Banana", price(175)), Item::new("Banana", price(150))],
        )]);

        assert_eq!(stores_stocking_item(&catalog, "Banana").len(), 1);
    }

    #[test]
    fn stocking_lookup_is_case_sensitive() {
        let catalog = grocery_catalog();
        assert!(stores_stocking_item(&catalog, "banana").is_empty());
        assert!(stores_stocking_item(&catalog, "Kiwi").is_empty());
    }

    #[test]
    fn cheapest_finds_lowest_price() {
        let catalog = grocery_catalog();
        let cheapest = cheapest_store_for_item(&catalog, "Banana").expect("bananas are stocked");

        assert_eq!(cheapest.store.name, "Target");
        assert_eq!(cheapest.price, price(10));
    }

    #[test]
    fn cheapest_tie_goes_to_later_store() {
        let catalog = Catalog::new(vec![
            Store::new("First", vec![Item::new("Milk", price(250))]),
            Store::new("Pricier", vec![Item::new("Milk", price(300))]),
            Store::new("Second", vec![Item::new("Milk", Decimal::new(25, 1))]),
        ]);

        let cheapest = cheapest_store_for_item(&catalog, "Milk").expect("milk is stocked");
        assert_eq!(cheapest.store.name, "Second");
        assert!(std::ptr::eq(cheapest.store, &catalog.stores()[2]));
    }

    #[test]
    fn cheapest_tie_between_duplicate_names_returns_later_record() {
        let catalog = Catalog::new(vec![
            Store::new("Kroger", vec![Item::new("Milk", price(199))]),
            Store::new("Kroger", vec![Item::new("Milk", price(199)), Item::new("Eggs", price(1))]),
        ]);

        let cheapest = cheapest_store_for_item(&catalog, "Milk").expect("milk is stocked");
        assert_eq!(cheapest.store.items.len(), 2);
    }

    #[test]
    fn cheapest_of_absent_item_is_none() {
        assert!(cheapest_store_for_item(&grocery_catalog(), "Kiwi").is_none());
        assert!(cheapest_store_for_item(&Catalog::default(), "Banana").is_none());
    }

    #[test]
    fn cheapest_accepts_zero_priced_items() {
        let catalog = Catalog::new(vec![
            Store::new("Giveaway", vec![Item::new("Sample", Decimal::ZERO)]),
            Store::new("Shop", vec![Item::new("Sample", price(100))]),
        ]);

        let cheapest = cheapest_store_for_item(&catalog, "Sample").expect("sample is stocked");
        assert_eq!(cheapest.store.name, "Giveaway");
        assert_eq!(cheapest.price, Decimal::ZERO);
    }
}

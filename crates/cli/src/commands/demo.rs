//! Offline walkthrough of the three catalog lookups over the built-in sample
//! catalog. Needs no configuration and no network.

use serde::Serialize;
use shelfhook_core::catalog::query::{
    cheapest_store_for_item, distinct_store_names, stores_stocking_item,
};
use shelfhook_core::domain::store::Catalog;
use shelfhook_storage::sample_catalog;

#[derive(Debug, Serialize)]
struct DemoReport {
    item: String,
    stores_offered: Vec<String>,
    cheapest: Option<CheapestOffer>,
    stocked_at: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CheapestOffer {
    store: String,
    price: String,
}

pub fn run(item: &str, json_output: bool) -> String {
    let report = build_report(&sample_catalog(), item);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!("{{\"error\":\"demo serialization failed: {}\"}}", error.to_string().replace('"', "'"))
        });
    }

    render_human(&report)
}

fn build_report(catalog: &Catalog, item: &str) -> DemoReport {
    DemoReport {
        item: item.to_string(),
        stores_offered: distinct_store_names(catalog),
        cheapest: cheapest_store_for_item(catalog, item).map(|found| CheapestOffer {
            store: found.store.name.clone(),
            price: format!("{:.2}", found.price.round_dp(2)),
        }),
        stocked_at: stores_stocking_item(catalog, item)
            .into_iter()
            .map(|store| store.name.clone())
            .collect(),
    }
}

fn render_human(report: &DemoReport) -> String {
    let mut lines = vec![format!("The stores offered are: {}", report.stores_offered.join(", "))];

    match &report.cheapest {
        Some(offer) => lines.push(format!(
            "{} has the cheapest {} at {}",
            offer.store, report.item, offer.price
        )),
        None => lines.push(format!("No store sells {}", report.item)),
    }

    if report.stocked_at.is_empty() {
        lines.push(format!("{} is not stocked anywhere", report.item));
    } else {
        lines.push(format!("{} is sold at: {}", report.item, report.stocked_at.join(", ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn demo_walks_through_banana_lookups() {
        let output = run("Banana", false);

        assert_eq!(
            output,
            "The stores offered are: Kroger, Aldi's, Target\n\
             Target has the cheapest Banana at 0.10\n\
             Banana is sold at: Kroger, Aldi's, Target, Kroger"
        );
    }

    #[test]
    fn demo_reports_missing_items_without_inventing_a_store() {
        let output = run("Kiwi", false);

        assert!(output.contains("No store sells Kiwi"));
        assert!(output.contains("Kiwi is not stocked anywhere"));
    }

    #[test]
    fn demo_json_carries_structured_results() {
        let payload: serde_json::Value =
            serde_json::from_str(&run("Pizza", true)).expect("json output");

        assert_eq!(payload["cheapest"]["store"], "Aldi's");
        assert_eq!(payload["cheapest"]["price"], "5.00");
        assert_eq!(payload["stocked_at"], serde_json::json!(["Aldi's"]));
    }
}

use serde_json::{json, Map};
use shelfhook_core::config::{AppConfig, LoadOptions};
use shelfhook_core::errors::WebhookError;
use shelfhook_core::webhook::{IntentTag, WebhookDispatcher, WebhookRequest};
use shelfhook_storage::catalog_loader;

use crate::commands::CommandResult;

/// Lookup run against the configured catalog through the same dispatcher the
/// webhook endpoint uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryAction {
    List,
    Find { item: String },
    Cheapest { item: String },
}

impl QueryAction {
    fn request(&self) -> WebhookRequest {
        let mut parameters = Map::new();
        let tag = match self {
            Self::List => IntentTag::List,
            Self::Find { item } => {
                parameters.insert("item".to_string(), json!(item));
                IntentTag::Find
            }
            Self::Cheapest { item } => {
                parameters.insert("item".to_string(), json!(item));
                IntentTag::Cheapest
            }
        };
        WebhookRequest::new(tag.as_str(), parameters)
    }
}

pub fn run(action: QueryAction) -> CommandResult {
    run_with_options(action, LoadOptions::default())
}

pub fn run_with_options(action: QueryAction, options: LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "query",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "query",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let loader = match catalog_loader(&config.catalog) {
        Ok(loader) => loader,
        Err(error) => {
            return CommandResult::failure("query", "storage_client", error.to_string(), 4);
        }
    };
    let dispatcher = WebhookDispatcher::new(loader, config.catalog.location());

    let request = action.request();
    let result = runtime.block_on(dispatcher.dispatch(&request));

    match result.and_then(|response| {
        serde_json::to_string_pretty(&response)
            .map_err(|error| WebhookError::Encode(error.to_string()))
    }) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("query", error.error_class(), error.to_string(), 5),
    }
}

#[cfg(test)]
mod tests {
    use super::QueryAction;

    #[test]
    fn actions_map_to_fulfillment_requests() {
        let request = QueryAction::Cheapest { item: "Banana".to_string() }.request();
        assert_eq!(request.tag(), "cheapest");
        assert_eq!(request.parameter("item"), Some(&serde_json::json!("Banana")));

        let request = QueryAction::List.request();
        assert_eq!(request.tag(), "list");
        assert!(request.session_info.parameters.is_empty());
    }
}

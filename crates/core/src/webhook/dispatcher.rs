use serde_json::{json, Value};
use tracing::debug;

use crate::catalog::loader::{CatalogLoader, CatalogLocation};
use crate::catalog::query::{cheapest_store_for_item, distinct_store_names, stores_stocking_item};
use crate::domain::store::Catalog;
use crate::errors::WebhookError;
use crate::webhook::intent::IntentTag;
use crate::webhook::wire::{SessionParameters, WebhookRequest, WebhookResponse};

pub const CANCEL_PERIOD_PARAMETER: &str = "cancel-period";
pub const CANCEL_PERIOD_DAYS: &str = "2";

const MISSING_PARAMETER: &str = "%!s(<nil>)";

/// Routes fulfillment requests to the handler for their tag. Catalog-backed
/// handlers load a fresh catalog through the injected loader on every call.
pub struct WebhookDispatcher<L> {
    loader: L,
    location: CatalogLocation,
}

impl<L> WebhookDispatcher<L>
where
    L: CatalogLoader,
{
    pub fn new(loader: L, location: CatalogLocation) -> Self {
        Self { loader, location }
    }

    pub fn location(&self) -> &CatalogLocation {
        &self.location
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub async fn dispatch(&self, request: &WebhookRequest) -> Result<WebhookResponse, WebhookError> {
        let tag = request.tag().parse::<IntentTag>()?;
        self.handle(tag, request).await
    }

    pub async fn handle(
        &self,
        tag: IntentTag,
        request: &WebhookRequest,
    ) -> Result<WebhookResponse, WebhookError> {
        debug!(
            event_name = "webhook.dispatch.selected",
            tag = %tag,
            needs_catalog = tag.needs_catalog(),
            "fulfillment handler selected"
        );

        match tag {
            IntentTag::Confirm => Ok(confirm(request)),
            IntentTag::List => {
                let catalog = self.load_catalog().await?;
                list_stores(catalog)
            }
            IntentTag::Find => {
                let catalog = self.load_catalog().await?;
                Ok(find_item(&catalog, request))
            }
            IntentTag::Cheapest => {
                let catalog = self.load_catalog().await?;
                cheapest(&catalog, request)
            }
        }
    }

    async fn load_catalog(&self) -> Result<Catalog, WebhookError> {
        let catalog = self.loader.load(&self.location).await?;
        debug!(
            event_name = "webhook.catalog.loaded",
            location = %self.location,
            store_count = catalog.len(),
            "catalog loaded for fulfillment"
        );
        Ok(catalog)
    }
}

pub fn confirm(request: &WebhookRequest) -> WebhookResponse {
    let message = format!(
        "You can pick up your order for a {} {} shirt in 5 days.",
        parameter_text(request.parameter("size")),
        parameter_text(request.parameter("color")),
    );
    WebhookResponse::text(message, cancel_period())
}

pub fn list_stores(catalog: Catalog) -> Result<WebhookResponse, WebhookError> {
    let message = format!("This item is sold at: {}", distinct_store_names(&catalog).join(", "));

    let mut parameters = SessionParameters::new();
    parameters.insert("stores".to_owned(), to_parameter(&catalog)?);
    Ok(WebhookResponse::text(message, parameters))
}

pub fn find_item(catalog: &Catalog, request: &WebhookRequest) -> WebhookResponse {
    let names: Vec<&str> = match requested_item(request) {
        Some(item) => {
            stores_stocking_item(catalog, item).into_iter().map(|store| store.name.as_str()).collect()
        }
        None => Vec::new(),
    };

    let message = format!("This item is sold at: {}", names.join(", "));
    WebhookResponse::text(message, cancel_period())
}

pub fn cheapest(catalog: &Catalog, request: &WebhookRequest) -> Result<WebhookResponse, WebhookError> {
    let found = requested_item(request).and_then(|item| cheapest_store_for_item(catalog, item));

    let mut parameters = SessionParameters::new();
    let message = match found {
        Some(found) => {
            parameters.insert("cheapest".to_owned(), to_parameter(found.store)?);
            format!("it is sold at {} for {:.2}", found.store.name, found.price.round_dp(2))
        }
        None => {
            parameters.insert("cheapest".to_owned(), Value::Null);
            format!("no store sells {}", parameter_text(request.parameter("item")))
        }
    };

    Ok(WebhookResponse::text(message, parameters))
}

/// Only a string parameter can name an item; anything else matches nothing.
fn requested_item(request: &WebhookRequest) -> Option<&str> {
    request.parameter("item").and_then(Value::as_str)
}

fn parameter_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => MISSING_PARAMETER.to_owned(),
    }
}

fn cancel_period() -> SessionParameters {
    let mut parameters = SessionParameters::new();
    parameters.insert(CANCEL_PERIOD_PARAMETER.to_owned(), json!(CANCEL_PERIOD_DAYS));
    parameters
}

fn to_parameter<T: serde::Serialize>(value: &T) -> Result<Value, WebhookError> {
    serde_json::to_value(value).map_err(|error| WebhookError::Encode(error.to_string()))
}

//! Fulfillment endpoint.
//!
//! Every failure, including an undecodable body, is answered with a 500 and
//! a plain-text `ERROR: {message}` body. The platform treats any non-2xx
//! answer as a failed fulfillment, so no partial response is ever written.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use shelfhook_core::catalog::loader::SharedCatalogLoader;
use shelfhook_core::errors::WebhookError;
use shelfhook_core::webhook::{WebhookDispatcher, WebhookRequest};
use tracing::{debug, error, info};
use uuid::Uuid;

pub type SharedDispatcher = Arc<WebhookDispatcher<SharedCatalogLoader>>;

#[derive(Clone)]
pub struct WebhookState {
    dispatcher: SharedDispatcher,
}

pub fn router(dispatcher: SharedDispatcher) -> Router {
    Router::new()
        .route("/", post(handle_webhook))
        .route("/webhook", post(handle_webhook))
        .with_state(WebhookState { dispatcher })
}

pub async fn handle_webhook(State(state): State<WebhookState>, body: Bytes) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    match fulfill(&state.dispatcher, &body, &correlation_id).await {
        Ok(encoded) => {
            ([(header::CONTENT_TYPE, "application/json")], encoded).into_response()
        }
        Err(failure) => {
            error!(
                event_name = "system.webhook.failed",
                correlation_id = %correlation_id,
                error_class = failure.error_class(),
                error = %failure,
                "fulfillment request failed"
            );
            error_response(&failure)
        }
    }
}

async fn fulfill(
    dispatcher: &SharedDispatcher,
    body: &[u8],
    correlation_id: &str,
) -> Result<Vec<u8>, WebhookError> {
    let request = WebhookRequest::from_slice(body)?;
    debug!(
        event_name = "system.webhook.request",
        correlation_id = %correlation_id,
        request = ?request,
        "fulfillment request decoded"
    );

    let response = dispatcher.dispatch(&request).await?;
    debug!(
        event_name = "system.webhook.response",
        correlation_id = %correlation_id,
        response = ?response,
        "fulfillment response built"
    );

    let encoded = response.to_vec()?;
    info!(
        event_name = "system.webhook.dispatched",
        correlation_id = %correlation_id,
        tag = %request.tag(),
        "fulfillment request answered"
    );
    Ok(encoded)
}

pub fn error_response(error: &WebhookError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("ERROR: {error}"),
    )
        .into_response()
}

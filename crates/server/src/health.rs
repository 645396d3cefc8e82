use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use shelfhook_core::catalog::loader::CatalogLoader;

use crate::webhook::SharedDispatcher;

#[derive(Clone)]
pub struct HealthState {
    dispatcher: SharedDispatcher,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

pub fn router(dispatcher: SharedDispatcher) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { dispatcher })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state.dispatcher).await;
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "shelfhook-server runtime initialized".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn catalog_check(dispatcher: &SharedDispatcher) -> HealthCheck {
    let location = dispatcher.location();
    match dispatcher.loader().load(location).await {
        Ok(catalog) => HealthCheck {
            status: "ready",
            detail: format!("catalog `{location}` loaded with {} stores", catalog.len()),
        },
        Err(error) => HealthCheck { status: "degraded", detail: error.to_string() },
    }
}

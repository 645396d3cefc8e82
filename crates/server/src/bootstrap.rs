use std::sync::Arc;

use axum::Router;
use shelfhook_core::catalog::loader::SharedCatalogLoader;
use shelfhook_core::config::{AppConfig, ConfigError, LoadOptions};
use shelfhook_core::webhook::WebhookDispatcher;
use shelfhook_storage::{catalog_loader, ObjectStore, StorageError};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::health;
use crate::webhook::{self, SharedDispatcher};

pub struct Application {
    pub config: AppConfig,
    pub dispatcher: SharedDispatcher,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog storage client could not be created: {0}")]
    Storage(#[source] StorageError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let loader = catalog_loader(&config.catalog).map_err(BootstrapError::Storage)?;
    let backend = loader.store().backend();
    let loader: SharedCatalogLoader = Arc::new(loader);
    let dispatcher = Arc::new(WebhookDispatcher::new(loader, config.catalog.location()));
    info!(
        event_name = "system.bootstrap.catalog_configured",
        correlation_id = "bootstrap",
        backend,
        location = %dispatcher.location(),
        timeout_secs = config.catalog.timeout_secs,
        "catalog loader configured"
    );

    Ok(Application { config, dispatcher })
}

/// Webhook and health routes behind a request trace layer.
pub fn router(app: &Application) -> Router {
    webhook::router(app.dispatcher.clone())
        .merge(health::router(app.dispatcher.clone()))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use shelfhook_core::config::{ConfigOverrides, LoadOptions, StorageBackend};
    use shelfhook_storage::{sample_catalog, sample_catalog_json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::bootstrap::{bootstrap, router};

    fn filesystem_options(root: PathBuf) -> LoadOptions {
        LoadOptions {
            config_path: Some(PathBuf::from("definitely-not-here/shelfhook.toml")),
            overrides: ConfigOverrides {
                catalog_backend: Some(StorageBackend::Filesystem),
                catalog_bucket: Some("stores-test".to_string()),
                catalog_object: Some("stores".to_string()),
                catalog_root_dir: Some(root),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[test]
    fn bootstrap_fails_fast_on_invalid_configuration() {
        let mut options = filesystem_options(PathBuf::from("data"));
        options.overrides.log_level = Some("loud".to_string());

        let result = bootstrap(options);

        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("logging.level"));
    }

    #[tokio::test]
    async fn integration_smoke_covers_config_storage_and_webhook_path() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("stores-test")).expect("bucket dir");
        std::fs::write(
            dir.path().join("stores-test/stores"),
            sample_catalog_json().expect("sample json"),
        )
        .expect("catalog blob");

        let app = bootstrap(filesystem_options(dir.path().to_path_buf()))
            .expect("bootstrap should succeed with filesystem catalog");
        assert_eq!(app.dispatcher.location().to_string(), "stores-test/stores");

        let health = router(&app)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("health responds");
        assert_eq!(health.status(), StatusCode::OK);

        let response = router(&app)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from(
                        json!({"fulfillmentInfo": {"tag": "list"}, "sessionInfo": {"parameters": {}}})
                            .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("webhook responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(
            payload["sessionInfo"]["parameters"]["stores"],
            serde_json::to_value(sample_catalog()).expect("catalog json")
        );
    }
}

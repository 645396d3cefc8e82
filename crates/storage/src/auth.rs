//! Bearer tokens for the Cloud Storage backend.
//!
//! A configured token is sent as-is. Otherwise tokens are requested from the
//! instance metadata server, the source Google runtimes expose their service
//! account credentials through, and reused until shortly before they expire.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::SecretString;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::object_store::StorageError;

/// Tokens are refreshed this long before the server says they expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[async_trait]
pub trait TokenProvider: Send + Sync {
    fn kind(&self) -> &'static str;

    async fn access_token(&self) -> Result<SecretString, StorageError>;
}

pub type SharedTokenProvider = Arc<dyn TokenProvider>;

pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    fn kind(&self) -> &'static str {
        "static"
    }

    async fn access_token(&self) -> Result<SecretString, StorageError> {
        Ok(self.token.clone())
    }
}

struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

#[derive(Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

pub struct MetadataTokenProvider {
    client: Client,
    token_url: Url,
    cached: Mutex<Option<CachedToken>>,
}

impl MetadataTokenProvider {
    pub fn new(token_url: &str, timeout: Duration) -> Result<Self, StorageError> {
        let token_url = Url::parse(token_url).map_err(|error| {
            StorageError::Client(format!("invalid metadata url `{token_url}`: {error}"))
        })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, token_url, cached: Mutex::new(None) })
    }

    async fn fetch(&self) -> Result<CachedToken, StorageError> {
        let response = self
            .client
            .get(self.token_url.clone())
            .header("Metadata-Flavor", "Google")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Credentials(format!(
                "metadata server returned status {}",
                status.as_u16()
            )));
        }

        let body: MetadataTokenResponse = response.json().await?;
        if body.access_token.trim().is_empty() {
            return Err(StorageError::Credentials(
                "metadata server returned an empty access token".to_string(),
            ));
        }

        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(REFRESH_MARGIN);
        debug!(
            event_name = "storage.gcs.token_refreshed",
            expires_in_secs = body.expires_in,
            "access token fetched from metadata server"
        );
        Ok(CachedToken { token: body.access_token.into(), refresh_at: Instant::now() + lifetime })
    }
}

#[async_trait]
impl TokenProvider for MetadataTokenProvider {
    fn kind(&self) -> &'static str {
        "metadata"
    }

    async fn access_token(&self) -> Result<SecretString, StorageError> {
        // Held across the fetch so concurrent callers share one refresh.
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| Instant::now() < token.refresh_at) {
            return Ok(token.token.clone());
        }

        let fresh = self.fetch().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}

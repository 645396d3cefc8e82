use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::auth::SharedTokenProvider;
use crate::object_store::{ObjectStore, StorageError};

/// Reads objects through the Cloud Storage JSON API media endpoint.
/// Requests are anonymous when no token provider is set.
#[derive(Clone)]
pub struct GcsObjectStore {
    client: Client,
    base_url: Url,
    credentials: Option<SharedTokenProvider>,
}

impl GcsObjectStore {
    pub fn new(
        base_url: &str,
        credentials: Option<SharedTokenProvider>,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let base_url = Url::parse(base_url)
            .map_err(|error| StorageError::Client(format!("invalid base url `{base_url}`: {error}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StorageError::Client(format!("base url `{base_url}` cannot hold a path")));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url, credentials })
    }

    /// `{base}/storage/v1/b/{bucket}/o/{object}?alt=media` with each name
    /// encoded as a single path segment.
    pub fn media_url(&self, bucket: &str, object: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["storage", "v1", "b", bucket, "o", object]);
        }
        url.query_pairs_mut().append_pair("alt", "media");
        url
    }
}

impl std::fmt::Debug for GcsObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcsObjectStore")
            .field("base_url", &self.base_url.as_str())
            .field(
                "credentials",
                &self.credentials.as_ref().map_or("anonymous", |provider| provider.kind()),
            )
            .finish()
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    fn backend(&self) -> &'static str {
        "gcs"
    }

    async fn open_for_read(&self, bucket: &str, object: &str) -> Result<Vec<u8>, StorageError> {
        let url = self.media_url(bucket, object);
        debug!(event_name = "storage.gcs.request", url = %url, "fetching object");

        let mut request = self.client.get(url);
        if let Some(provider) = &self.credentials {
            let token = provider.access_token().await?;
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                object: object.to_string(),
            }),
            status if !status.is_success() => Err(StorageError::Status {
                bucket: bucket.to_string(),
                object: object.to_string(),
                status: status.as_u16(),
            }),
            _ => Ok(response.bytes().await?.to_vec()),
        }
    }
}

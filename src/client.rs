//! Backend collaborator: fetches entity and reference collections.

use super::{
    config::BackendConfig,
    errors::FetchError,
    result::FetchResult,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of JSON collections, addressed by endpoint path.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_json(&self, endpoint: &str) -> FetchResult<Value>;
}

/// Backend reached over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|source| FetchError::Http {
                endpoint: config.base_url.clone(),
                source,
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get_json(&self, endpoint: &str) -> FetchResult<Value> {
        let url = self.url(endpoint);
        debug!(url = %url, "fetching collection");

        let response = self.client.get(&url).send().await.map_err(|source| {
            if source.is_timeout() {
                FetchError::Timeout {
                    endpoint: endpoint.to_string(),
                    secs: self.timeout_secs,
                }
            } else {
                FetchError::Http {
                    endpoint: endpoint.to_string(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "collection request failed");
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| FetchError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Fetches `endpoint` and decodes it as an array of `E`, bounded by `timeout`.
pub async fn fetch_collection<E>(
    backend: &dyn Backend,
    endpoint: &str,
    timeout: Duration,
) -> FetchResult<Vec<E>>
where
    E: DeserializeOwned,
{
    let value = tokio::time::timeout(timeout, backend.get_json(endpoint))
        .await
        .map_err(|_| FetchError::Timeout {
            endpoint: endpoint.to_string(),
            secs: timeout.as_secs(),
        })??;

    let items: Vec<E> = serde_json::from_value(value).map_err(|e| FetchError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    debug!(endpoint, count = items.len(), "collection fetched");
    Ok(items)
}

//! HTTP client for the Charimachi routing service.

use crate::config::ClientConfig;
use crate::error::ClientError;
use charimachi_core::{DirectionsResponse, HealthStatus, RouteQuery, RouteResponse, SearchResult};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Client for the `/search` and `/directions/bicycle` endpoints.
#[derive(Debug, Clone)]
pub struct CharimachiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl CharimachiClient {
    /// Create a client with default settings for `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::from_config(&ClientConfig {
            api_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        // A trailing slash keeps any path prefix when joining endpoints.
        let mut raw = config.api_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|err| ClientError::InvalidUrl {
            url: config.api_url.clone(),
            reason: err.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get_json("health", &[]).await
    }

    /// Search destination candidates. Blank keywords return no results
    /// without contacting the service.
    pub async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, ClientError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            debug!("skipping search for blank keyword");
            return Ok(Vec::new());
        }

        info!(%keyword, "searching destinations");
        let results: Vec<SearchResult> = self
            .get_json("search", &[("q", keyword.to_string())])
            .await?;
        debug!(count = results.len(), "search completed");
        Ok(results)
    }

    /// Request a bicycle route.
    pub async fn directions(&self, query: &RouteQuery) -> Result<RouteResponse, ClientError> {
        info!(
            start = %format!("{},{}", query.origin.longitude, query.origin.latitude),
            end = %format!("{},{}", query.destination.longitude, query.destination.latitude),
            "requesting bicycle route"
        );
        let response: DirectionsResponse = self
            .get_json("directions/bicycle", &query.query_pairs())
            .await?;
        Ok(response.into())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                reason: err.to_string(),
            })?;

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::from_response(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

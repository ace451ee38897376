// External bulk source: a JSONPlaceholder-compatible REST API

use crate::config::SourceConfig;
use crate::errors::SourceError;
use crate::models::{Post, User};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

/// Where bulk imports read their records from
#[async_trait]
pub trait PlaceholderSource: Send + Sync {
    /// Full user list in source order
    async fn fetch_users(&self) -> Result<Vec<User>, SourceError>;

    /// Full post list in source order
    async fn fetch_posts(&self) -> Result<Vec<Post>, SourceError>;
}

/// HTTP client for the placeholder API
#[derive(Debug, Clone)]
pub struct PlaceholderClient {
    client: Client,
    base_url: String,
}

impl PlaceholderClient {
    /// Create a new client with the configured base URL and request timeout
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SourceError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One GET, whole collection
    async fn fetch_collection<T: DeserializeOwned>(
        &self,
        resource: &str,
    ) -> Result<Vec<T>, SourceError> {
        let url = format!("{}/{}", self.base_url, resource);
        tracing::debug!(url = %url, "Fetching collection from source");

        let response = self.client.get(&url).send().await.map_err(|e| SourceError::Request {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let items: Vec<T> = response.json().await.map_err(|e| SourceError::Decode {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        tracing::info!(url = %url, count = items.len(), "Fetched collection from source");
        Ok(items)
    }
}

#[async_trait]
impl PlaceholderSource for PlaceholderClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_users(&self) -> Result<Vec<User>, SourceError> {
        self.fetch_collection("users").await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_posts(&self) -> Result<Vec<Post>, SourceError> {
        self.fetch_collection("posts").await
    }
}

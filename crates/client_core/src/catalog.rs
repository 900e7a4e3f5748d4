use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use shared::{
    domain::Photo,
    error::PageRequestError,
    protocol::{PageRequest, PageResult},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientSettings;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to fetch photos: {0}")]
    InvalidRequest(#[from] PageRequestError),
    #[error("Failed to fetch photos: HTTP error! status: {}", .0.as_u16())]
    Status(StatusCode),
    #[error("Failed to fetch photos: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Failed to fetch photos: malformed catalog response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("invalid catalog base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

// No retries here; the controller's caller decides whether to ask again.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn list_photos(&self, request: PageRequest) -> Result<PageResult, CatalogError>;
}

#[derive(Serialize)]
struct ListPhotosQuery {
    page: u32,
    limit: u32,
}

pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, CatalogError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        Url::parse(trimmed).map_err(|source| CatalogError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(CatalogError::Transport)?;
        Ok(Self {
            http,
            base_url: trimmed.to_string(),
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, CatalogError> {
        Self::new(
            &settings.catalog_base_url,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(CatalogError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "image download rejected");
            return Err(CatalogError::Status(status));
        }
        let bytes = response.bytes().await.map_err(CatalogError::Transport)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn list_photos(&self, request: PageRequest) -> Result<PageResult, CatalogError> {
        let request = PageRequest::new(request.page, request.limit)?;
        debug!(page = request.page, limit = request.limit, "catalog: list photos");

        let response = self
            .http
            .get(format!("{}/list", self.base_url))
            .query(&ListPhotosQuery {
                page: request.page,
                limit: request.limit,
            })
            .send()
            .await
            .map_err(CatalogError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let body = response.bytes().await.map_err(CatalogError::Transport)?;
        let photos: Vec<Photo> = serde_json::from_slice(&body).map_err(CatalogError::Decode)?;
        debug!(
            page = request.page,
            count = photos.len(),
            "catalog: page received"
        );

        Ok(PageResult::from_batch(photos, request.limit))
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;

//! HTTP client for the REST catalog backend

use std::time::Duration;

use async_trait::async_trait;
use pantry_core::{CatalogItem, CatalogKind, ItemId, PageRequest, PageResult};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, Result};
use crate::fetcher::PageFetcher;
use crate::normalize::{normalize_item, normalize_page};

/// Default backend address used when none is configured
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";

/// Configuration for the catalog HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API (collection paths are appended to it)
    pub base_url: String,

    /// Which catalog collection to browse
    pub kind: CatalogKind,

    /// User agent sent with every request
    pub user_agent: String,

    /// Per-request timeout. `None` lets a request hang until the transport gives up.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, kind: CatalogKind) -> Self {
        Self {
            base_url: base_url.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            kind: CatalogKind::Food,
            user_agent: concat!("pantry/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

/// Client for one catalog collection of the REST backend
pub struct HttpCatalogClient {
    http: reqwest::Client,
    collection_url: Url,
    kind: CatalogKind,
}

impl HttpCatalogClient {
    /// Build a client from configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let collection_url = collection_url(&config.base_url, config.kind)?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        debug!("Catalog client for {} at {}", config.kind, collection_url);

        Ok(Self {
            http,
            collection_url,
            kind: config.kind,
        })
    }

    /// The collection endpoint (e.g. `http://host/api/foods`)
    pub fn url(&self) -> &Url {
        &self.collection_url
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    fn page_url(&self, request: PageRequest) -> Url {
        let mut url = self.collection_url.clone();
        url.query_pairs_mut()
            .append_pair("page", &request.page_index.to_string())
            .append_pair("size", &request.page_size.to_string());
        url
    }

    fn item_url(&self, id: &ItemId) -> Result<Url> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.collection_url.to_string()))?
            .push(id.as_str());
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            ClientError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Request to {} returned {}", url, status);
            return Err(ClientError::Network {
                status: Some(status.as_u16()),
                message: format!("{} returned {}", url, status),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ClientError::malformed(format!("response is not JSON: {}", e)))
    }
}

#[async_trait]
impl PageFetcher for HttpCatalogClient {
    type Item = CatalogItem;

    async fn fetch_page(&self, request: PageRequest) -> Result<PageResult<CatalogItem>> {
        let url = self.page_url(request);
        debug!("Fetching page {} ({} per page) from {}", request.page_index, request.page_size, url);

        let payload = self.get_json(url).await?;
        let page = normalize_page(payload, request, Some(self.kind.collection()))?;

        debug!(
            "Page {} returned {} items ({} total, {} pages)",
            request.page_index,
            page.items.len(),
            page.total_count,
            page.total_pages
        );
        Ok(page)
    }

    async fn fetch_item(&self, id: &ItemId) -> Result<CatalogItem> {
        let url = self.item_url(id)?;
        let payload = self.get_json(url).await?;
        normalize_item(payload)
    }
}

fn collection_url(base_url: &str, kind: CatalogKind) -> Result<Url> {
    let base = if base_url.starts_with("http://") || base_url.starts_with("https://") {
        base_url.to_string()
    } else {
        format!("http://{}", base_url)
    };

    let mut url: Url = base
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .push(kind.collection());
    Ok(url)
}

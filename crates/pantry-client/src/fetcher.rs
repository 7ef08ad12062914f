//! The fetch seam between the browsing pipeline and the backend

use std::sync::Arc;

use async_trait::async_trait;
use pantry_core::{CatalogFields, ItemId, PageRequest, PageResult};

use crate::error::Result;

/// Source of catalog pages
///
/// Implementations perform a single request per call. They never retry and
/// never touch shared state; retry policy belongs to the caller.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Record type served by this fetcher
    type Item: CatalogFields + Clone + Send + Sync + 'static;

    /// Fetch one page of items
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResult<Self::Item>>;

    /// Fetch a single item by id
    async fn fetch_item(&self, id: &ItemId) -> Result<Self::Item>;
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Arc<F> {
    type Item = F::Item;

    async fn fetch_page(&self, request: PageRequest) -> Result<PageResult<Self::Item>> {
        (**self).fetch_page(request).await
    }

    async fn fetch_item(&self, id: &ItemId) -> Result<Self::Item> {
        (**self).fetch_item(id).await
    }
}

//! In-memory page fetcher
//!
//! Serves pages out of a fixed item list with the same paging arithmetic as
//! the REST backend. Useful for offline browsing and for exercising the
//! pipeline without a server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pantry_core::{pages_for, CatalogFields, ItemId, PageRequest, PageResult};

use crate::error::{ClientError, Result};
use crate::fetcher::PageFetcher;

/// Page fetcher backed by a vector of items
pub struct MemoryFetcher<T> {
    items: Vec<T>,
    /// Number of upcoming page fetches that fail with a network error
    failures: AtomicUsize,
    /// Every page request served, in arrival order
    requests: Mutex<Vec<PageRequest>>,
}

impl<T> MemoryFetcher<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            failures: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Make the next `count` page fetches fail
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Page requests received so far
    pub fn requests(&self) -> Vec<PageRequest> {
        self.log().clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn log(&self) -> MutexGuard<'_, Vec<PageRequest>> {
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn take_failure(&self) -> bool {
        self.failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl<T> PageFetcher for MemoryFetcher<T>
where
    T: CatalogFields + Clone + Send + Sync + 'static,
{
    type Item = T;

    async fn fetch_page(&self, request: PageRequest) -> Result<PageResult<T>> {
        self.log().push(request);

        if self.take_failure() {
            return Err(ClientError::network("simulated transport failure"));
        }

        let size = request.page_size as usize;
        let start = (request.page_index as usize).saturating_mul(size);
        let items: Vec<T> = self.items.iter().skip(start).take(size).cloned().collect();
        let total_count = self.items.len() as u64;

        Ok(PageResult {
            items,
            total_count,
            total_pages: pages_for(total_count, request.page_size),
        })
    }

    async fn fetch_item(&self, id: &ItemId) -> Result<T> {
        self.items
            .iter()
            .find(|item| item.item_id() == id)
            .cloned()
            .ok_or_else(|| ClientError::Network {
                status: Some(404),
                message: format!("item {} not found", id),
            })
    }
}

//! Pagination types - one backend-fetched chunk of catalog items

use serde::{Deserialize, Serialize};

use crate::{CoreError, Result};

/// A request for one backend page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Zero-based page index
    pub page_index: u32,

    /// Items per page, always positive
    pub page_size: u32,
}

impl PageRequest {
    /// Create a page request, rejecting a zero page size
    pub fn new(page_index: u32, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(CoreError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_index,
            page_size,
        })
    }

    /// The first page for a given size
    pub fn first(page_size: u32) -> Result<Self> {
        Self::new(0, page_size)
    }

    /// The page following this one
    pub fn next(&self) -> Self {
        Self {
            page_index: self.page_index + 1,
            page_size: self.page_size,
        }
    }
}

/// One page of items in canonical shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    /// Items on this page, in backend order
    pub items: Vec<T>,

    /// Total number of items across all pages
    pub total_count: u64,

    /// Total number of pages at the requested size
    pub total_pages: u32,
}

impl<T> PageResult<T> {
    /// Build a page result, deriving missing totals
    ///
    /// Without a backend count the page-local length stands in for it, and
    /// without a page total one is computed from the count and page size.
    pub fn with_totals(
        items: Vec<T>,
        total_count: Option<u64>,
        total_pages: Option<u32>,
        page_size: u32,
    ) -> Self {
        let total_count = total_count.unwrap_or(items.len() as u64);
        let total_pages = total_pages.unwrap_or_else(|| pages_for(total_count, page_size));
        Self {
            items,
            total_count,
            total_pages,
        }
    }

    /// Whether the backend has a page after `page_index`
    pub fn has_page_after(&self, page_index: u32) -> bool {
        page_index.saturating_add(1) < self.total_pages
    }
}

/// Number of pages needed to hold `count` items at `page_size` per page
pub fn pages_for(count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

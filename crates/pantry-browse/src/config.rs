//! Configuration for a catalog page

use std::time::Duration;

use pantry_core::{CoreError, PageRequest};
use pantry_search::{IndexOptions, SUGGESTION_LIMIT};

/// Page sizes offered by the page-size selector
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [6, 12, 24, 48];

/// Configuration for one catalog page
#[derive(Debug, Clone)]
pub struct BrowseConfig {
    /// Items per backend page and per reveal step
    pub page_size: u32,

    /// Pause before revealing already-loaded items, so growth is visible
    pub reveal_delay: Duration,

    /// Quiet period after typing before the query is applied
    pub debounce: Duration,

    /// Maximum suggestions offered for an uncommitted query
    pub suggestion_limit: usize,

    /// Fuzzy index tuning
    pub index: IndexOptions,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE_OPTIONS[0],
            reveal_delay: Duration::from_millis(500),
            debounce: Duration::from_millis(300),
            suggestion_limit: SUGGESTION_LIMIT,
            index: IndexOptions::default(),
        }
    }
}

impl BrowseConfig {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Reject configurations that cannot page
    pub fn validate(&self) -> Result<(), CoreError> {
        PageRequest::first(self.page_size).map(|_| ())
    }
}

//! Incremental reveal controller
//!
//! Tracks how much of the filtered result list is shown and decides, on each
//! growth trigger, whether to reveal more of what is already loaded or to
//! fetch the next backend page first.
//!
//! ```text
//!            trigger (fits)           finish
//!   Idle ──────────────────> Loading ────────> Idle | Exhausted
//!     │  trigger (needs page)   ^
//!     └─────────────────────────┘
//!   any trigger while Loading: ignored
//! ```

use pantry_core::PageRequest;
use serde::{Deserialize, Serialize};

/// Observable phase of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealPhase {
    /// More can be shown and nothing is in flight
    Idle,
    /// A fetch or a reveal step is in progress
    Loading,
    /// Everything matching is shown and the backend has no further pages
    Exhausted,
}

/// What caused a growth request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthTrigger {
    /// The end-of-list sentinel scrolled into view
    SentinelVisible,
    /// The user asked for more explicitly
    LoadMore,
}

/// What the caller must do after a growth trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthStep {
    /// Nothing: already loading, or nothing left
    Ignored,
    /// Reveal more of the loaded items, then call `finish_reveal`
    Reveal,
    /// Fetch this page, merge it, then call `finish_page`
    Fetch(PageRequest),
}

/// Snapshot of the reveal bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    pub revealed_count: usize,
    pub is_loading_more: bool,
    pub has_more: bool,
}

/// Reveal state machine for one catalog page
#[derive(Debug, Clone)]
pub struct RevealController {
    page_size: u32,
    /// Items shown, before clamping to the filtered length
    revealed: usize,
    loading: bool,
    /// Highest backend page merged, None before the first page lands
    last_page: Option<u32>,
    total_pages: u32,
}

impl RevealController {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            revealed: page_size as usize,
            loading: false,
            last_page: None,
            total_pages: 0,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the first backend page has been merged
    pub fn has_loaded(&self) -> bool {
        self.last_page.is_some()
    }

    pub fn last_page(&self) -> Option<u32> {
        self.last_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Number of filtered items currently shown
    pub fn revealed(&self, filtered_len: usize) -> usize {
        self.revealed.min(filtered_len)
    }

    /// Whether the backend holds pages not yet merged
    pub fn more_pages(&self) -> bool {
        match self.last_page {
            None => true,
            Some(page) => page.saturating_add(1) < self.total_pages,
        }
    }

    pub fn has_more(&self, filtered_len: usize) -> bool {
        self.revealed(filtered_len) < filtered_len || self.more_pages()
    }

    pub fn phase(&self, filtered_len: usize) -> RevealPhase {
        if self.loading {
            RevealPhase::Loading
        } else if self.has_more(filtered_len) {
            RevealPhase::Idle
        } else {
            RevealPhase::Exhausted
        }
    }

    pub fn state(&self, filtered_len: usize) -> RevealState {
        RevealState {
            revealed_count: self.revealed(filtered_len),
            is_loading_more: self.loading,
            has_more: self.has_more(filtered_len),
        }
    }

    /// The backend page following the last one merged
    pub fn next_request(&self) -> PageRequest {
        PageRequest {
            page_index: self.last_page.map_or(0, |page| page + 1),
            page_size: self.page_size,
        }
    }

    /// Start over at page 0 with a (possibly new) page size
    ///
    /// Returns the request for the first page; the controller is loading
    /// until `finish_page` or `fail` is called.
    pub fn restart(&mut self, page_size: u32) -> PageRequest {
        self.page_size = page_size;
        self.revealed = page_size as usize;
        self.last_page = None;
        self.total_pages = 0;
        self.loading = true;
        self.next_request()
    }

    /// Return to the page-size baseline after the filter changed
    pub fn rebaseline(&mut self, filtered_len: usize) {
        self.revealed = self.baseline(filtered_len);
    }

    fn baseline(&self, filtered_len: usize) -> usize {
        (self.page_size as usize).min(filtered_len)
    }

    /// Handle a growth trigger
    pub fn trigger(&mut self, filtered_len: usize) -> GrowthStep {
        if self.loading || !self.has_more(filtered_len) {
            return GrowthStep::Ignored;
        }

        let target = self.revealed(filtered_len) + self.page_size as usize;
        self.loading = true;

        if target > filtered_len && self.more_pages() {
            GrowthStep::Fetch(self.next_request())
        } else {
            GrowthStep::Reveal
        }
    }

    /// Complete a reveal step
    pub fn finish_reveal(&mut self, filtered_len: usize) {
        self.grow(filtered_len);
        self.loading = false;
    }

    /// Complete a page fetch whose items have been merged
    ///
    /// The first page only establishes pagination; later pages also grow
    /// the revealed window.
    pub fn finish_page(&mut self, page_index: u32, total_pages: u32, filtered_len: usize) {
        self.record_page(page_index, total_pages, filtered_len, true);
    }

    /// Complete a page fetch that was started under a different filter
    ///
    /// Pagination advances but the revealed window only fills up to the
    /// page-size baseline.
    pub fn settle_page(&mut self, page_index: u32, total_pages: u32, filtered_len: usize) {
        self.record_page(page_index, total_pages, filtered_len, false);
    }

    /// Release the loading gate without growing
    pub fn abandon(&mut self) {
        self.loading = false;
    }

    /// A fetch failed: stop loading, keep what is shown
    pub fn fail(&mut self) {
        self.abandon();
    }

    fn record_page(&mut self, page_index: u32, total_pages: u32, filtered_len: usize, grow: bool) {
        let initial = self.last_page.is_none();
        self.last_page = Some(self.last_page.map_or(page_index, |last| last.max(page_index)));
        self.total_pages = total_pages;

        if initial {
            self.revealed = self.baseline(filtered_len);
        } else if grow {
            self.grow(filtered_len);
        } else {
            self.revealed = self.revealed.max(self.baseline(filtered_len));
        }
        self.loading = false;
    }

    fn grow(&mut self, filtered_len: usize) {
        let shown = self.revealed(filtered_len);
        let grown = (shown + self.page_size as usize).min(filtered_len);
        self.revealed = shown.max(grown);
    }
}

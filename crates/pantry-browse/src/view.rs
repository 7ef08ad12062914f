//! Render-ready snapshot of a catalog page

use pantry_search::FilterState;
use serde::{Deserialize, Serialize};

use crate::reveal::{RevealPhase, RevealState};

/// Overall state of the page contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewStatus {
    /// No load has been requested yet
    NotLoaded,
    /// The first page is in flight
    Loading,
    /// Items are available to show
    Ready,
    /// Loaded, but nothing passes the current filter
    Empty,
    /// The first page could not be fetched
    Failed { message: String },
}

/// Everything a renderer needs for one catalog page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogView<T> {
    /// Revealed items, in result order
    pub items: Vec<T>,

    /// Ranked matches for the uncommitted query
    pub suggestions: Vec<T>,

    /// Categories present in the loaded items
    pub categories: Vec<String>,

    pub filter: FilterState,
    pub reveal: RevealState,
    pub phase: RevealPhase,

    /// Items passing the filter among those loaded
    pub total_filtered: usize,

    /// Items loaded from the backend so far
    pub total_loaded: usize,

    pub status: ViewStatus,

    /// Transient message from a failed growth fetch
    pub notice: Option<String>,
}

impl<T> CatalogView<T> {
    /// Whether a loading indicator belongs at the end of the list
    pub fn show_spinner(&self) -> bool {
        self.phase == RevealPhase::Loading
    }

    pub fn is_empty(&self) -> bool {
        self.status == ViewStatus::Empty
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ViewStatus::Failed { .. })
    }
}

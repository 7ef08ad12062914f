//! Filter state driving result resolution

use pantry_core::{CatalogFields, ItemId};
use serde::{Deserialize, Serialize};

/// User-controlled filter inputs for one catalog page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text query as typed
    pub query_text: String,

    /// Exact category to keep (None = all categories)
    pub selected_category: Option<String>,

    /// Item chosen from the suggestion list; collapses results to it
    pub pinned: Option<ItemId>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.set_query(query);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.set_category(Some(category.into()));
        self
    }

    /// Replace the query text. Editing the query releases any pinned suggestion.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query_text = query.into();
        self.pinned = None;
    }

    /// Select a category; an empty string means all categories
    pub fn set_category(&mut self, category: Option<String>) {
        self.selected_category = category.filter(|c| !c.is_empty());
    }

    /// Commit a suggestion: the query becomes its name and results collapse to it
    pub fn select_suggestion<T: CatalogFields>(&mut self, item: &T) {
        self.query_text = item.name().to_string();
        self.pinned = Some(item.item_id().clone());
    }

    /// Query with surrounding whitespace removed
    pub fn query(&self) -> &str {
        self.query_text.trim()
    }

    /// Whether this filter keeps every item
    pub fn is_unfiltered(&self) -> bool {
        self.query().is_empty() && self.selected_category.is_none() && self.pinned.is_none()
    }
}

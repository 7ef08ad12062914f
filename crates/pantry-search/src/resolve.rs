//! Filter/search resolution
//!
//! Pure functions of (items, index, filter). The caller owns all state; the
//! same inputs always give the same output.

use std::collections::HashSet;

use pantry_core::CatalogFields;

use crate::error::{Result, SearchError};
use crate::index::SearchIndex;
use crate::query::FilterState;

/// Number of suggestions offered while typing
pub const SUGGESTION_LIMIT: usize = 5;

/// Positions of the items passing `filter`, in result order
///
/// 1. An empty query keeps every item in collection order; otherwise the
///    ranked fuzzy matches are kept.
/// 2. A pinned suggestion collapses the result to that single item.
/// 3. A selected category keeps only exact, case-sensitive category matches.
pub fn resolve_positions<T: CatalogFields>(
    items: &[T],
    index: &SearchIndex,
    filter: &FilterState,
) -> Result<Vec<usize>> {
    check_index(items, index)?;

    let mut positions: Vec<usize> = if let Some(pinned) = &filter.pinned {
        items
            .iter()
            .position(|item| item.item_id() == pinned)
            .into_iter()
            .collect()
    } else if filter.query().is_empty() {
        (0..items.len()).collect()
    } else {
        index.search(filter.query()).into_iter().map(|hit| hit.position).collect()
    };

    if let Some(category) = &filter.selected_category {
        positions.retain(|&p| items[p].category() == Some(category.as_str()));
    }

    Ok(positions)
}

/// Items passing `filter`, in result order
///
/// An empty vector is a valid result: nothing matched.
pub fn resolve<T: CatalogFields + Clone>(
    items: &[T],
    index: &SearchIndex,
    filter: &FilterState,
) -> Result<Vec<T>> {
    let positions = resolve_positions(items, index, filter)?;
    Ok(positions.into_iter().map(|p| items[p].clone()).collect())
}

/// Positions of the top `limit` ranked matches for `query`
pub fn suggestion_positions<T: CatalogFields>(
    items: &[T],
    index: &SearchIndex,
    query: &str,
    limit: usize,
) -> Result<Vec<usize>> {
    check_index(items, index)?;
    Ok(index
        .search(query)
        .into_iter()
        .take(limit)
        .map(|hit| hit.position)
        .collect())
}

/// The top `limit` ranked matches for `query`, shown before the query is committed
pub fn suggestions<T: CatalogFields + Clone>(
    items: &[T],
    index: &SearchIndex,
    query: &str,
    limit: usize,
) -> Result<Vec<T>> {
    let positions = suggestion_positions(items, index, query, limit)?;
    Ok(positions.into_iter().map(|p| items[p].clone()).collect())
}

/// Distinct non-empty categories in first-seen order
pub fn categories<T: CatalogFields>(items: &[T]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| item.category())
        .filter(|c| !c.is_empty() && seen.insert(*c))
        .map(str::to_string)
        .collect()
}

fn check_index<T>(items: &[T], index: &SearchIndex) -> Result<()> {
    if index.len() != items.len() {
        return Err(SearchError::StaleIndex {
            indexed: index.len(),
            items: items.len(),
        });
    }
    Ok(())
}

//! Backing item collection for a catalog page

use std::collections::HashSet;

use pantry_core::{CatalogFields, ItemId};

/// Items loaded so far, in arrival order, unique by id
///
/// Every change bumps `version`, which is what derived state (the search
/// index) keys its freshness on.
pub struct ItemCollection<T> {
    items: Vec<T>,
    ids: HashSet<ItemId>,
    version: u64,
}

impl<T: CatalogFields> ItemCollection<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            ids: HashSet::new(),
            version: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: &ItemId) -> Option<&T> {
        if !self.ids.contains(id) {
            return None;
        }
        self.items.iter().find(|item| item.item_id() == id)
    }

    /// Append items not seen before, keeping their order
    ///
    /// Returns how many were appended. Overlapping pages only contribute
    /// their new items.
    pub fn merge(&mut self, incoming: Vec<T>) -> usize {
        let before = self.items.len();
        for item in incoming {
            if self.ids.insert(item.item_id().clone()) {
                self.items.push(item);
            }
        }
        let appended = self.items.len() - before;
        if appended > 0 {
            self.version += 1;
        }
        appended
    }

    /// Drop every item
    pub fn clear(&mut self) {
        self.items.clear();
        self.ids.clear();
        self.version += 1;
    }
}

impl<T: CatalogFields> Default for ItemCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

//! Weighted fuzzy index over catalog items

use pantry_core::CatalogFields;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fuzzy::{normalize, score, FuzzyOptions};

/// Relative importance of each searchable field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights {
    pub name: f64,
    pub category: f64,
    pub description: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 0.7,
            category: 0.3,
            description: 0.2,
        }
    }
}

impl FieldWeights {
    /// Weights scaled to sum to one
    fn normalized(&self) -> [f64; 3] {
        let total = self.name + self.category + self.description;
        if total <= 0.0 {
            return [1.0 / 3.0; 3];
        }
        [
            self.name / total,
            self.category / total,
            self.description / total,
        ]
    }
}

/// Options used when building a search index
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexOptions {
    pub weights: FieldWeights,
    pub fuzzy: FuzzyOptions,
}

/// A ranked match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    /// Position of the item in the indexed collection
    pub position: usize,

    /// Combined score, lower is better
    pub score: f64,
}

struct IndexedEntry {
    /// name, category, description
    fields: [Option<Vec<char>>; 3],
}

/// Searchable snapshot of an item collection
///
/// Holds normalized copies of the searchable fields so a query only pays
/// for scoring, not for lowercasing every item again.
pub struct SearchIndex {
    entries: Vec<IndexedEntry>,
    weights: [f64; 3],
    fuzzy: FuzzyOptions,
}

impl SearchIndex {
    /// Build an index over `items`, preserving their order
    pub fn build<T: CatalogFields>(items: &[T], options: IndexOptions) -> Self {
        let entries = items
            .iter()
            .map(|item| IndexedEntry {
                fields: [
                    Some(normalize(item.name())).filter(|f| !f.is_empty()),
                    item.category().map(normalize).filter(|f| !f.is_empty()),
                    item.description().map(normalize).filter(|f| !f.is_empty()),
                ],
            })
            .collect();

        Self {
            entries,
            weights: options.weights.normalized(),
            fuzzy: options.fuzzy,
        }
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank every item matching `query`
    ///
    /// Results are ordered by ascending score; equal scores keep collection
    /// order. An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let pattern = normalize(query);
        if pattern.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                self.score_entry(&pattern, entry)
                    .map(|score| SearchHit { position, score })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then_with(|| a.position.cmp(&b.position))
        });
        hits
    }

    /// Combined score across matching fields
    ///
    /// Each matching field contributes `score ^ weight`; exact field matches
    /// count as epsilon so they still rank by weight.
    fn score_entry(&self, pattern: &[char], entry: &IndexedEntry) -> Option<f64> {
        let mut matched = false;
        let mut total = 1.0_f64;

        for (field, weight) in entry.fields.iter().zip(self.weights) {
            let Some(text) = field else { continue };
            if let Some(s) = score(pattern, text, &self.fuzzy) {
                matched = true;
                total *= s.max(f64::EPSILON).powf(weight);
            }
        }

        matched.then_some(total)
    }
}

/// Memoized index keyed by collection version
///
/// Rebuilding on every query would make incremental reveal quadratic, so
/// the index is only rebuilt when the collection it was built from changes.
#[derive(Default)]
pub struct IndexCache {
    options: IndexOptions,
    built: Option<(u64, SearchIndex)>,
    rebuilds: u64,
}

impl IndexCache {
    pub fn new(options: IndexOptions) -> Self {
        Self {
            options,
            built: None,
            rebuilds: 0,
        }
    }

    /// Index for the collection at `version`, rebuilding only if stale
    pub fn get<T: CatalogFields>(&mut self, version: u64, items: &[T]) -> &SearchIndex {
        let fresh = matches!(&self.built, Some((v, index)) if *v == version && index.len() == items.len());
        if !fresh {
            debug!("Rebuilding search index over {} items (version {})", items.len(), version);
            self.rebuilds += 1;
            self.built = None;
        }
        let options = self.options;
        &self
            .built
            .get_or_insert_with(|| (version, SearchIndex::build(items, options)))
            .1
    }

    /// Drop the cached index
    pub fn invalidate(&mut self) {
        self.built = None;
    }

    /// How many times the index has been built
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

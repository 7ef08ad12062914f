//! Approximate substring scoring.
//!
//! A pattern is aligned against every substring of a field with edit
//! distance (Sellers' variant: the alignment may start anywhere in the
//! text for free). The score of an alignment is
//!
//! ```text
//! errors / pattern_len + |start - location| / distance
//! ```
//!
//! so typos and far-away matches both cost. Scores run from 0 (exact match
//! at the expected location) upward; a field matches when its best score is
//! within the threshold.

use serde::{Deserialize, Serialize};

/// Tuning knobs for fuzzy scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuzzyOptions {
    /// Highest score still considered a match
    pub threshold: f64,

    /// Character offset where matches are expected
    pub location: usize,

    /// How quickly distance from `location` degrades the score.
    /// Zero makes any offset other than `location` a full miss.
    pub distance: usize,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            threshold: 0.4,
            location: 0,
            distance: 100,
        }
    }
}

impl FuzzyOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    fn proximity(&self, start: usize) -> f64 {
        let offset = start.abs_diff(self.location);
        if self.distance == 0 {
            return if offset == 0 { 0.0 } else { 1.0 };
        }
        offset as f64 / self.distance as f64
    }
}

/// Lowercased character buffer, the unit both patterns and fields are scored in
pub fn normalize(text: &str) -> Vec<char> {
    text.trim().to_lowercase().chars().collect()
}

/// Best score of `pattern` anywhere in `text`, if within the threshold
///
/// Both inputs are expected to be normalized with [`normalize`].
pub fn score(pattern: &[char], text: &[char], options: &FuzzyOptions) -> Option<f64> {
    if pattern.is_empty() || text.is_empty() {
        return None;
    }
    if pattern == text {
        return Some(0.0);
    }

    let m = pattern.len();

    // errors[i]: fewest edits aligning pattern[..i] to text ending here
    // starts[i]: text offset where that alignment begins
    let mut errors: Vec<usize> = (0..=m).collect();
    let mut starts: Vec<usize> = vec![0; m + 1];
    let mut next_errors = vec![0usize; m + 1];
    let mut next_starts = vec![0usize; m + 1];

    let mut best: Option<f64> = None;

    for (j, &tc) in text.iter().enumerate() {
        next_errors[0] = 0;
        next_starts[0] = j + 1;

        for i in 1..=m {
            let cost = usize::from(pattern[i - 1] != tc);
            let mut cell = (errors[i - 1] + cost, starts[i - 1]);
            cell = better(cell, (errors[i] + 1, starts[i]), options.location);
            cell = better(cell, (next_errors[i - 1] + 1, next_starts[i - 1]), options.location);
            next_errors[i] = cell.0;
            next_starts[i] = cell.1;
        }

        std::mem::swap(&mut errors, &mut next_errors);
        std::mem::swap(&mut starts, &mut next_starts);

        let candidate = errors[m] as f64 / m as f64 + options.proximity(starts[m]);
        best = match best {
            Some(b) if b <= candidate => Some(b),
            _ => Some(candidate),
        };
    }

    best.filter(|s| *s <= options.threshold)
}

/// Fewer errors wins; on a tie the start closer to `location` wins, then the earlier one
fn better(a: (usize, usize), b: (usize, usize), location: usize) -> (usize, usize) {
    let key = |(errors, start): (usize, usize)| (errors, start.abs_diff(location), start);
    if key(b) < key(a) {
        b
    } else {
        a
    }
}

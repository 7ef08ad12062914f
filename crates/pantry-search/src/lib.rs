//! Pantry Search - Client-side fuzzy search over loaded catalog items
//!
//! This crate provides:
//! - Approximate substring scoring tolerant of typos and abbreviations
//! - A weighted index over item name, category and description
//! - Pure filter resolution (query + category) and suggestion lists

pub mod error;
pub mod fuzzy;
pub mod index;
pub mod query;
pub mod resolve;

pub use error::*;
pub use fuzzy::*;
pub use index::*;
pub use query::*;
pub use resolve::*;

//! Error types for pantry-search

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Index covers {indexed} items but the collection holds {items}")]
    StaleIndex { indexed: usize, items: usize },
}

pub type Result<T> = std::result::Result<T, SearchError>;

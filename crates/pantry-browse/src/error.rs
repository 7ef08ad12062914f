//! Error types for pantry-browse

use pantry_client::ClientError;
use pantry_core::CoreError;
use pantry_search::SearchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("Fetch failed: {0}")]
    Client(#[from] ClientError),

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to start browse runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Browse loop has stopped")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, BrowseError>;

//! Error types for pantry-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid page size: {0} (must be positive)")]
    InvalidPageSize(u32),

    #[error("Unknown catalog kind: {0}")]
    UnknownKind(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

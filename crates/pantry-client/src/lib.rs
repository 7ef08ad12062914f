//! Pantry Client - Remote page fetcher for the catalog backend
//!
//! This crate provides:
//! - The `PageFetcher` seam the browsing pipeline pulls pages through
//! - An HTTP client for the REST catalog backend
//! - Normalization of legacy page payload shapes
//! - An in-memory fetcher for offline browsing and tests

pub mod client;
pub mod error;
pub mod fetcher;
pub mod memory;
pub mod normalize;

pub use client::*;
pub use error::*;
pub use fetcher::*;
pub use memory::*;
pub use normalize::*;

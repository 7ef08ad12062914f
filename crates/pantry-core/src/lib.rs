//! Pantry Core - Core types for the storefront catalog pipeline
//!
//! This crate defines the data structures shared by every catalog stage:
//! - `CatalogItem`: A purchasable food or drink record
//! - `CatalogFields`: Field accessors the search and reveal stages are generic over
//! - `PageRequest` / `PageResult`: One backend-fetched chunk of items
//! - `CatalogKind`: Which backend collection a catalog page browses

pub mod error;
pub mod item;
pub mod kind;
pub mod page;

pub use error::*;
pub use item::*;
pub use kind::*;
pub use page::*;

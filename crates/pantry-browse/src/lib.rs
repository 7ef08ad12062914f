//! Pantry Browse - State for one storefront catalog page
//!
//! This crate provides:
//! - `ItemCollection`: loaded items, de-duplicated by id
//! - `RevealController`: incremental reveal of the filtered results
//! - `CatalogSession`: the single owner of a page's state
//! - `BrowseHandle`: a background loop driving a session for a UI thread

pub mod backend;
pub mod collection;
pub mod config;
pub mod debounce;
pub mod error;
pub mod reveal;
pub mod session;
pub mod view;

pub use backend::*;
pub use collection::*;
pub use config::*;
pub use debounce::*;
pub use error::*;
pub use reveal::*;
pub use session::*;
pub use view::*;

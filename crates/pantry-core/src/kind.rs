//! Catalog kinds - which backend collection a page browses

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// The catalog a page browses
///
/// Food and drink listings share one pipeline; the kind only decides which
/// backend collection is queried and which legacy payload field may hold
/// the item array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Food,
    Drink,
}

impl CatalogKind {
    /// Backend collection path segment (e.g. `/foods`)
    pub fn collection(&self) -> &'static str {
        match self {
            CatalogKind::Food => "foods",
            CatalogKind::Drink => "drinks",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Food => "Food",
            CatalogKind::Drink => "Drinks",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CatalogKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" | "foods" => Ok(CatalogKind::Food),
            "drink" | "drinks" => Ok(CatalogKind::Drink),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("food".parse::<CatalogKind>().unwrap(), CatalogKind::Food);
        assert_eq!("Drinks".parse::<CatalogKind>().unwrap(), CatalogKind::Drink);
        assert!("desserts".parse::<CatalogKind>().is_err());
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(CatalogKind::Food.collection(), "foods");
        assert_eq!(CatalogKind::Drink.collection(), "drinks");
    }
}

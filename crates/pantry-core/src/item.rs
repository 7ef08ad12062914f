//! Catalog items - the records a storefront page browses

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a catalog item
///
/// Backends hand out either numeric or string identifiers; both are kept
/// as their textual form so equality is stable across payload shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create an ItemId from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        string_or_number::deserialize(deserializer).map(Self)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// A purchasable food or drink record
///
/// Items are immutable once received from the backend. A re-fetch replaces
/// them wholesale rather than patching fields in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Unique, stable identifier
    #[serde(alias = "_id")]
    pub id: ItemId,

    /// Display name (searchable)
    pub name: String,

    /// Category label (searchable, exact-match filter)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Free-text description (searchable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Image location, display only
    #[serde(default, alias = "image", alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,

    /// Unit price, display only
    ///
    /// Held as `f64` since nothing sums or compares prices. Decimal strings
    /// such as `"8.50"` are accepted on the wire.
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub price: f64,

    /// Units currently in stock
    #[serde(default, alias = "quantity", alias = "stock")]
    pub available_quantity: u32,
}

impl CatalogItem {
    /// Create a new item with just an id and a name
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            description: None,
            image_ref: None,
            price: 0.0,
            available_quantity: 0,
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the price
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the available quantity
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.available_quantity = quantity;
        self
    }

    /// Whether any units are left to order
    pub fn in_stock(&self) -> bool {
        self.available_quantity > 0
    }
}

/// Field accessors the catalog pipeline is generic over
///
/// Search, filtering and reveal only ever look at these four fields, so any
/// record type exposing them can be browsed.
pub trait CatalogFields {
    fn item_id(&self) -> &ItemId;

    fn name(&self) -> &str;

    fn category(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        None
    }
}

impl CatalogFields for CatalogItem {
    fn item_id(&self) -> &ItemId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Helper module accepting identifiers as JSON strings or integers
mod string_or_number {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer) {
            Ok(Raw::Text(s)) if s.is_empty() => Err(Error::custom("empty item id")),
            Ok(Raw::Text(s)) => Ok(s),
            Ok(Raw::Unsigned(n)) => Ok(n.to_string()),
            Ok(Raw::Signed(n)) => Ok(n.to_string()),
            Err(_) => Err(Error::custom("item id must be a string or an integer")),
        }
    }
}

/// Helper module accepting prices as JSON numbers or decimal strings
mod decimal {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::custom(format!("invalid price {:?}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_id() {
        let item: CatalogItem =
            serde_json::from_str(r#"{"id": 42, "name": "Chicken Wrap", "price": 8.5}"#).unwrap();
        assert_eq!(item.id, ItemId::from(42u64));
        assert_eq!(item.price, 8.5);
        assert_eq!(item.available_quantity, 0);
        assert!(item.category.is_none());
    }

    #[test]
    fn test_deserialize_legacy_field_names() {
        let item: CatalogItem = serde_json::from_str(
            r#"{"_id": "a1", "name": "Iced Tea", "category": "Drinks", "image": "/img/tea.png", "quantity": 3}"#,
        )
        .unwrap();
        assert_eq!(item.id.as_str(), "a1");
        assert_eq!(item.image_ref.as_deref(), Some("/img/tea.png"));
        assert_eq!(item.available_quantity, 3);
        assert!(item.in_stock());
    }

    #[test]
    fn test_deserialize_decimal_string_price() {
        let item: CatalogItem =
            serde_json::from_str(r#"{"id": 7, "name": "Chai Latte", "price": "4.75"}"#).unwrap();
        assert_eq!(item.price, 4.75);

        let result = serde_json::from_str::<CatalogItem>(r#"{"id": 7, "name": "Chai Latte", "price": "cheap"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_missing_name() {
        let result = serde_json::from_str::<CatalogItem>(r#"{"id": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_id() {
        let result = serde_json::from_str::<CatalogItem>(r#"{"id": "", "name": "Soup"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_field_accessors() {
        let item = CatalogItem::new("7", "Lemonade")
            .with_category("Drinks")
            .with_description("Fresh squeezed");
        assert_eq!(item.item_id().as_str(), "7");
        assert_eq!(CatalogFields::name(&item), "Lemonade");
        assert_eq!(CatalogFields::category(&item), Some("Drinks"));
        assert_eq!(CatalogFields::description(&item), Some("Fresh squeezed"));
    }
}

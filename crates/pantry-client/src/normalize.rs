//! Page payload normalization
//!
//! The backend has answered page requests in three shapes over time:
//! - a bare array of items
//! - `{ "items": [...], "count": n, "totalPages": p }`
//! - `{ "<collection>": [...] }` with the collection named after the catalog
//!
//! All of them are folded into a canonical `PageResult`.

use pantry_core::{PageRequest, PageResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// Canonical field holding the item array
pub const ITEMS_FIELD: &str = "items";

const COUNT_FIELDS: [&str; 2] = ["count", "totalCount"];
const TOTAL_PAGES_FIELD: &str = "totalPages";

/// Normalize a raw page payload into a `PageResult`
///
/// `legacy_field` names the collection-specific array field tried after
/// `items` (e.g. `"foods"`).
pub fn normalize_page<T: DeserializeOwned>(
    payload: Value,
    request: PageRequest,
    legacy_field: Option<&str>,
) -> Result<PageResult<T>> {
    match payload {
        Value::Array(raw) => {
            let items = decode_items(raw)?;
            Ok(PageResult::with_totals(items, None, None, request.page_size))
        }
        Value::Object(mut object) => {
            let raw = take_item_array(&mut object, legacy_field)?;
            let items = decode_items(raw)?;
            let total_count = COUNT_FIELDS
                .iter()
                .find_map(|field| object.get(*field).and_then(Value::as_u64));
            let total_pages = object
                .get(TOTAL_PAGES_FIELD)
                .and_then(Value::as_u64)
                .map(|p| u32::try_from(p).unwrap_or(u32::MAX));
            Ok(PageResult::with_totals(
                items,
                total_count,
                total_pages,
                request.page_size,
            ))
        }
        other => Err(ClientError::malformed(format!(
            "expected an array or an object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Decode a single item payload
pub fn normalize_item<T: DeserializeOwned>(payload: Value) -> Result<T> {
    match payload {
        Value::Object(_) => serde_json::from_value(payload)
            .map_err(|e| ClientError::malformed(format!("invalid item: {}", e))),
        other => Err(ClientError::malformed(format!(
            "expected an item object, got {}",
            json_kind(&other)
        ))),
    }
}

fn take_item_array(object: &mut Map<String, Value>, legacy_field: Option<&str>) -> Result<Vec<Value>> {
    let candidates = std::iter::once(ITEMS_FIELD).chain(legacy_field);
    for field in candidates {
        match object.remove(field) {
            Some(Value::Array(raw)) => return Ok(raw),
            Some(other) => {
                return Err(ClientError::malformed(format!(
                    "field `{}` must be an array, got {}",
                    field,
                    json_kind(&other)
                )))
            }
            None => continue,
        }
    }
    Err(ClientError::malformed("object has no item array field"))
}

fn decode_items<T: DeserializeOwned>(raw: Vec<Value>) -> Result<Vec<T>> {
    raw.into_iter()
        .enumerate()
        .map(|(position, value)| {
            serde_json::from_value(value).map_err(|e| {
                ClientError::malformed(format!("invalid item at position {}: {}", position, e))
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

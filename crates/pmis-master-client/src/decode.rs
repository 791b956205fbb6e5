//! # Response Decoding — Normalizing Backend List Shapes
//!
//! The master-data backend is not consistent about list envelopes: some
//! endpoints return a bare JSON array, others a paginated object with the
//! rows under `results`, `content`, or `data`. This module is the single
//! typed decoding step at the collaborator boundary: every response shape
//! is normalized into one `Vec<OptionItem>`, failing closed (empty list,
//! warn log) on anything unrecognized. A malformed row is skipped, never a
//! crash.
//!
//! Inactive options are dropped here — only Active options are ever
//! offered for selection, and not every endpoint applies that filter
//! server-side.

use pmis_core::OptionItem;
use serde_json::Value;

/// Envelope keys under which paginated endpoints nest their rows.
const LIST_KEYS: [&str; 3] = ["results", "content", "data"];

/// Decode a response body into the selectable options it carries.
///
/// `endpoint` is used only for diagnostics.
pub fn decode_options(endpoint: &str, body: Value) -> Vec<OptionItem> {
    decode_filtered(endpoint, body, None)
}

/// Decode a response body, additionally keeping only rows whose
/// `parent_field` references `parent_id`.
///
/// The defensive filter is needed on the flat fallback endpoints: some of
/// them ignore the query-string filter and return the full collection.
/// Both reference shapes that occur in the wild are accepted — a flat id
/// (`"zone": "Z1"`) and a nested object (`"zone": {"id": "Z1"}`). Rows
/// without the field are dropped.
pub fn decode_filtered(
    endpoint: &str,
    body: Value,
    parent: Option<(&str, &str)>,
) -> Vec<OptionItem> {
    let Some(rows) = extract_rows(body) else {
        tracing::warn!(endpoint, "unrecognized master-data response shape, treating as empty");
        return Vec::new();
    };

    let mut options = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some((field, id)) = parent {
            if !references_parent(&row, field, id) {
                continue;
            }
        }
        match serde_json::from_value::<OptionItem>(row) {
            Ok(item) if item.is_selectable() => options.push(item),
            Ok(_) => {} // Inactive or unknown status.
            Err(e) => {
                tracing::debug!(endpoint, "skipping malformed option row: {e}");
            }
        }
    }
    options
}

/// Pull the row array out of whichever envelope the endpoint used.
fn extract_rows(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Array(rows) => Some(rows),
        Value::Object(mut map) => LIST_KEYS.iter().find_map(|key| match map.remove(*key) {
            Some(Value::Array(rows)) => Some(rows),
            _ => None,
        }),
        _ => None,
    }
}

/// Whether `row` references `parent_id` through `field`.
fn references_parent(row: &Value, field: &str, parent_id: &str) -> bool {
    match row.get(field) {
        Some(Value::String(id)) => id == parent_id,
        Some(Value::Object(obj)) => obj.get("id").and_then(Value::as_str) == Some(parent_id),
        _ => false,
    }
}

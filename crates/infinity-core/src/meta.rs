//! Extraction of pagination totals from response metadata.
//!
//! Stores report how many pages (or records) exist under backend-specific
//! keys, so the lookup path is configurable as a dotted string such as
//! `meta.total_pages` or `meta.pagination.count`.

use serde_json::Value;

/// Resolve a dotted field path against a metadata document and coerce the
/// leaf into a number. Numeric strings are accepted since some backends
/// serialize counts that way. Returns `None` when any path segment is
/// missing or the leaf is not numeric.
pub fn extract_number(meta: &Value, path: &str) -> Option<u64> {
    let leaf = path
        .split('.')
        .try_fold(meta, |value, segment| value.get(segment))?;

    leaf.as_u64()
        .or_else(|| leaf.as_str().and_then(|s| s.parse().ok()))
}

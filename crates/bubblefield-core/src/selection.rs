//! The selection mapping exchanged with callers.

use std::collections::BTreeMap;

/// Contribution per selected token id. Ordered so serialization is stable.
pub type SelectionMap = BTreeMap<String, f64>;

/// Serialize a mapping to JSON for transport by the caller.
pub fn to_json(map: &SelectionMap) -> Result<String, serde_json::Error> {
    serde_json::to_string(map)
}

/// Deserialize a mapping from JSON.
pub fn from_json(json: &str) -> Result<SelectionMap, serde_json::Error> {
    serde_json::from_str(json)
}

/// Compare two mappings up to a floating-point tolerance.
pub fn approx_eq(a: &SelectionMap, b: &SelectionMap, tolerance: f64) -> bool {
    a.len() == b.len()
        && a.iter().all(|(id, &va)| {
            b.get(id)
                .is_some_and(|&vb| (va - vb).abs() <= tolerance)
        })
}

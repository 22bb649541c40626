//! Cache Key Module
//!
//! Builds deterministic cache keys from an endpoint prefix and an unordered
//! parameter map, so that semantically-equal requests share a cache entry
//! regardless of parameter insertion order.

use std::collections::HashMap;

/// Request parameters: name to optional value. Absent values are skipped
/// when building keys and upstream queries.
pub type Params = HashMap<String, Option<String>>;

// == Generate Key ==
/// Builds a deterministic cache key from a prefix and a parameter map.
///
/// Parameters with absent values are skipped; each remaining value is
/// trimmed and lowercased; names are sorted lexicographically; pairs are
/// joined as `name=value` with `_` and prepended with `prefix_`.
///
/// `generate_key("p", {b: "2", a: "1"})` yields `"p_a=1_b=2"` no matter the
/// insertion order. An empty parameter map yields `"p_"`.
pub fn generate_key(prefix: &str, params: &Params) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .filter_map(|(name, value)| {
            value
                .as_ref()
                .map(|v| (name.clone(), v.trim().to_lowercase()))
        })
        .collect();

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let joined = pairs
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("_");

    format!("{}_{}", prefix, joined)
}

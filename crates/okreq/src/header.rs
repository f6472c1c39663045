//! Header map utilities

use std::collections::HashMap;

use reqwest::header::HeaderMap;

/// Flatten a header multimap into a plain string map.
///
/// Repeated headers keep their first value; values that are not valid
/// UTF-8 are skipped.
pub(crate) fn flatten(headers: &HeaderMap) -> HashMap<String, String> {
    let mut flat = HashMap::with_capacity(headers.keys_len());
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            flat.entry(name.as_str().to_string())
                .or_insert_with(|| value.to_string());
        }
    }
    flat
}

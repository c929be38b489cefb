// src/search/mod.rs

use crate::sheet::{Dataset, Record};

/// Search-first filter over the in-memory dataset: an empty or whitespace
/// query selects nothing (results only appear once someone actually
/// searches), otherwise a row matches when any of its fields contains the
/// query, case-insensitively. The whole sheet is scanned; it is a few
/// hundred rows at most.
pub fn filter<'a>(dataset: &'a Dataset, query: &str) -> Vec<&'a Record> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    dataset
        .records
        .iter()
        .filter(|record| record.values().any(|v| v.to_lowercase().contains(&needle)))
        .collect()
}

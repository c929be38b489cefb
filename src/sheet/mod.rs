// src/sheet/mod.rs

pub mod parse;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// One row of the sheet, keyed by column header. Values stay strings end to
/// end; numeric meaning is decided on demand by `classify`.
pub type Record = HashMap<String, String>;

/// The whole published sheet as fetched: column order, rows, and the
/// retrieval instant. Replaced wholesale on refresh, never patched in place.
///
/// Header order lives here rather than on each record, since the sheet's
/// columns are unknown until fetch time and every row shares them.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    pub fetched_at: DateTime<Utc>,
}

impl Dataset {
    /// Parse the body of a fetched document and stamp the retrieval time.
    pub fn from_text(text: &str) -> Self {
        let (headers, records) = parse::parse(text);
        Self {
            headers,
            records,
            fetched_at: Utc::now(),
        }
    }
}

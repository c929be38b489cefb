// src/config.rs

use anyhow::{Context, Result};
use url::Url;

/// Document id of the school's published result sheet. Only the CLI layer
/// reads this; everything below takes an explicit `SheetSource`.
pub static DEFAULT_SHEET_ID: &str = "19jf-Lx9OVRwh7j0ImcHBFG-dv0OBpeYyuoHl9irBWDg";

/// Where the published sheet lives. Built by the caller and handed to the
/// fetch layer, so tests can point it at a fixture server instead of Google.
#[derive(Debug, Clone)]
pub struct SheetSource {
    csv_url: String,
}

impl SheetSource {
    /// Published-to-web CSV endpoint for a Google Sheets document id.
    /// The gviz endpoint serves plain CSV without a login wall as long as
    /// the sheet has been published.
    pub fn from_sheet_id(id: &str) -> Self {
        Self {
            csv_url: format!(
                "https://docs.google.com/spreadsheets/d/{id}/gviz/tq?tqx=out:csv"
            ),
        }
    }

    /// Direct URL override, validated up front so a typo fails before any
    /// request goes out.
    pub fn from_url(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).with_context(|| format!("invalid sheet URL `{raw}`"))?;
        Ok(Self {
            csv_url: url.to_string(),
        })
    }

    pub fn csv_url(&self) -> &str {
        &self.csv_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_id_expands_to_gviz_csv_endpoint() {
        let source = SheetSource::from_sheet_id("abc123");
        assert_eq!(
            source.csv_url(),
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out:csv"
        );
    }

    #[test]
    fn direct_url_is_validated() {
        assert!(SheetSource::from_url("http://127.0.0.1:9/results.csv").is_ok());
        assert!(SheetSource::from_url("not a url").is_err());
    }
}

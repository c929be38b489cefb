// src/fetch/mod.rs

use reqwest::Client;
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::SheetSource;
use crate::sheet::Dataset;

/// Why a refresh failed. A transport error can be retried as-is by running
/// the command again; an HTML body means the document id is wrong or the
/// sheet was never published to the web, which no retry will fix.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(
        "{url} returned an HTML page instead of delimited text; \
         the sheet must be published to the web and the document id correct"
    )]
    NotTabular { url: String },
}

/// Detect an HTML error page so it is rejected before the parser ever runs.
/// The parser itself never fails, so this sniff is the only gate between a
/// misconfigured sheet and a dataset full of markup.
pub fn looks_like_html(body: &str) -> bool {
    body.trim_start().starts_with("<!DOCTYPE html") || body.contains("<html")
}

/// One GET of the published sheet. No automatic retry and no in-flight
/// deduplication: a refresh is human-triggered and the last completed fetch
/// wins.
#[instrument(level = "info", skip(client, source), fields(url = %source.csv_url()))]
pub async fn fetch_dataset(client: &Client, source: &SheetSource) -> Result<Dataset, FetchError> {
    let url = source.csv_url();
    let transport = |err: reqwest::Error| FetchError::Transport {
        url: url.to_string(),
        source: err,
    };

    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(transport)?;
    let body = response.text().await.map_err(transport)?;

    if looks_like_html(&body) {
        return Err(FetchError::NotTabular {
            url: url.to_string(),
        });
    }

    let dataset = Dataset::from_text(&body);
    info!(
        rows = dataset.records.len(),
        columns = dataset.headers.len(),
        "sheet loaded"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[test]
    fn html_sniff() {
        assert!(looks_like_html("<!DOCTYPE html><head></head>"));
        assert!(looks_like_html("  \n<!DOCTYPE html>"));
        assert!(looks_like_html("redirecting...<html lang=\"en\">"));
        assert!(!looks_like_html("ชื่อ,คะแนน\nสมชาย,95\n"));
        assert!(!looks_like_html(""));
    }

    /// Serve exactly one canned HTTP response on a loopback port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> Result<SheetSource> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                // drain the request head before answering
                let mut buf = [0u8; 4096];
                use tokio::io::AsyncReadExt;
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        SheetSource::from_url(&format!("http://{addr}/sheet.csv"))
    }

    #[tokio::test]
    async fn fetches_and_parses_a_published_sheet() -> Result<()> {
        let source = serve_once("HTTP/1.1 200 OK", "Name,Score\nAlice,95\nBob,101\n").await?;
        let dataset = fetch_dataset(&Client::new(), &source).await?;
        assert_eq!(dataset.headers, vec!["Name", "Score"]);
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.records[0]["Score"], "95");
        Ok(())
    }

    #[tokio::test]
    async fn html_body_is_a_configuration_error() -> Result<()> {
        let source = serve_once("HTTP/1.1 200 OK", "<!DOCTYPE html><p>sign in</p>").await?;
        let err = fetch_dataset(&Client::new(), &source)
            .await
            .expect_err("must reject HTML");
        assert!(matches!(err, FetchError::NotTabular { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() -> Result<()> {
        let source = serve_once("HTTP/1.1 403 Forbidden", "denied").await?;
        let err = fetch_dataset(&Client::new(), &source)
            .await
            .expect_err("must reject 403");
        assert!(matches!(err, FetchError::Transport { .. }));
        Ok(())
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use onetreport::{
    config::{SheetSource, DEFAULT_SHEET_ID},
    fetch::{self, FetchError},
    report::{self, ReportMeta, ReportModel},
    search,
    sheet::Dataset,
    table,
};
use reqwest::Client;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Look up and export O-NET results from the school's published sheet"
)]
struct Cli {
    /// Google Sheets document id of the published result sheet
    #[arg(long, global = true)]
    sheet_id: Option<String>,

    /// Direct URL of the delimited-text document (overrides --sheet-id)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show dataset totals
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Find rows by student name (or any other field)
    Search {
        query: String,
        /// Emit matching rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write a result-sheet document for one student
    Export {
        query: String,
        /// Pick among multiple matches (0-based position in search order)
        #[arg(long)]
        index: Option<usize>,
        /// Output directory
        #[arg(long, default_value = "report")]
        out: PathBuf,
        #[arg(long, value_enum, default_value = "html")]
        format: ExportFormat,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Html,
    Png,
    All,
}

#[derive(Serialize)]
struct Stats {
    rows: usize,
    columns: usize,
    fetched_at: DateTime<Utc>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    let cli = Cli::parse();

    // ─── 2) resolve the sheet source ─────────────────────────────────
    let source = match (&cli.url, &cli.sheet_id) {
        (Some(url), _) => SheetSource::from_url(url)?,
        (None, Some(id)) => SheetSource::from_sheet_id(id),
        (None, None) => SheetSource::from_sheet_id(DEFAULT_SHEET_ID),
    };

    // ─── 3) fetch the published sheet ────────────────────────────────
    let client = Client::new();
    let dataset = match fetch::fetch_dataset(&client, &source).await {
        Ok(dataset) => dataset,
        Err(err) => {
            error!("{err}");
            let hint = match err {
                FetchError::NotTabular { .. } => {
                    "publish the sheet to the web (File → Share → Publish to web) \
                     and check the document id"
                }
                FetchError::Transport { .. } => {
                    "check the connection and run the command again to retry"
                }
            };
            eprintln!("hint: {hint}");
            std::process::exit(1);
        }
    };

    // ─── 4) run the command ──────────────────────────────────────────
    match cli.command {
        Command::Stats { json } => {
            let stats = Stats {
                rows: dataset.records.len(),
                columns: dataset.headers.len(),
                fetched_at: dataset.fetched_at,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("rows:       {}", stats.rows);
                println!("columns:    {}", stats.columns);
                println!("fetched at: {}", stats.fetched_at);
            }
        }

        Command::Search { query, json } => {
            let hits = search::filter(&dataset, &query);
            if json {
                println!("{}", serde_json::to_string_pretty(&table::to_json(&dataset, &hits))?);
            } else if hits.is_empty() {
                println!("ไม่พบข้อมูลที่ค้นหา");
            } else {
                print!("{}", table::render(&dataset, &hits));
                println!("\n{} result(s)", hits.len());
            }
        }

        Command::Export {
            query,
            index,
            out,
            format,
        } => {
            // an export failure must not look like a fetch failure; report
            // it and exit without touching anything already written
            if let Err(err) = export(&dataset, &query, index, &out, format) {
                error!("export failed: {err:#}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn export(
    dataset: &Dataset,
    query: &str,
    index: Option<usize>,
    out: &Path,
    format: ExportFormat,
) -> Result<()> {
    let hits = search::filter(dataset, query);
    let record = match index {
        Some(i) => *hits.get(i).with_context(|| {
            format!("--index {i} is out of range; the query matched {} row(s)", hits.len())
        })?,
        None => {
            if hits.len() > 1 {
                warn!(
                    matches = hits.len(),
                    "query matched more than one row; exporting the first (use --index to pick)"
                );
            }
            *hits
                .first()
                .with_context(|| format!("no row matches \"{query}\""))?
        }
    };

    let model = ReportModel::build(&dataset.headers, record, ReportMeta::default(), Local::now());

    std::fs::create_dir_all(out)
        .with_context(|| format!("creating output directory {}", out.display()))?;

    if matches!(format, ExportFormat::Html | ExportFormat::All) {
        let path = out.join("result.html");
        std::fs::write(&path, report::html::render(&model))
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote result sheet");
    }

    if matches!(format, ExportFormat::Png | ExportFormat::All) {
        let pages = report::raster::render(&model, out)?;
        for page in &pages {
            info!(path = %page.display(), "wrote raster page");
        }
    }

    Ok(())
}

//! # partslist
//!
//! Renders a priced parts table into a host HTML page.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            partslist                                    │
//! │                                                                         │
//! │  AppConfig ──► read host page ──► pipeline::render_into ──► output      │
//! │  (toml+env)    (ready trigger)          │                  (file/stdout)│
//! │                                         ▼                               │
//! │          ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐     │
//! │          │  DataLoader  │   │  partslist-core  │   │ DisplayRegion│     │
//! │          │  file / http │   │  table + render  │   │ page / memory│     │
//! │          └──────────────┘   └──────────────────┘   └──────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `PARTSLIST_CONFIG` - Config file path
//! - `PARTSLIST_DATA` - Data file path or URL (default: data.json)
//! - `PARTSLIST_PAGE` - Host page (default: index.html)
//! - `PARTSLIST_REGION` - Display region id (default: computerPartsTable)
//! - `PARTSLIST_OUTPUT` - Output file, `-` for stdout (default: stdout)
//! - `PARTSLIST_TAX_RATE` - Tax percentage (default: 8.25)
//! - `PARTSLIST_FORMAT` - html | text | json (default: html)

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod sink;

use std::path::{Path, PathBuf};

use partslist_core::{HtmlRenderer, JsonRenderer, Money, TableRenderer, TableView, TaxRate, TextRenderer};
use tokio::io::AsyncWriteExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Re-exports
pub use config::{AppConfig, OutputFormat};
pub use error::{ConfigError, FetchError, PipelineError, PipelineResult, SinkError};
pub use loader::{DataLoader, Fetch, FileFetcher, HttpFetcher, SourceFetcher};
pub use pipeline::render_into;
pub use sink::{DisplayRegion, MemoryRegion, PageRegion, PresentationSink};

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub grand_total: Money,
    /// `None` when written to stdout.
    pub output: Option<PathBuf>,
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=partslist=trace` - Show trace for partslist only
/// - Default: INFO, DEBUG for partslist
///
/// Logs go to stderr; stdout carries the rendered output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,partslist=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs once with the fetcher chosen from the data location.
pub async fn run(config: &AppConfig) -> PipelineResult<RunSummary> {
    run_with_fetcher(config, SourceFetcher::new()).await
}

/// Runs once with an explicit fetcher.
///
/// ## Sequence
/// 1. HTML: read the host page and locate the region; text / JSON: empty region
/// 2. Render into the region
/// 3. Write the page (or the bare table) to the configured output
pub async fn run_with_fetcher<F: Fetch>(config: &AppConfig, fetcher: F) -> PipelineResult<RunSummary> {
    let rate = config.tax_rate()?;
    let loader = DataLoader::new(fetcher, config.data.location.clone());

    info!(
        data = %config.data.location,
        format = %config.output.format,
        rate = %rate,
        "Rendering parts table"
    );

    let (table, document) = match config.output.format {
        OutputFormat::Html => {
            let page = read_host_page(&config.page.path).await?;
            let mut region = PageRegion::new(page, config.page.region_id.as_str())?;
            let sink = PresentationSink::new(HtmlRenderer);
            let table = render_into(&loader, rate, &sink, &mut region).await?;
            (table, region.into_document())
        }
        OutputFormat::Text => render_detached(&loader, rate, TextRenderer).await?,
        OutputFormat::Json => render_detached(&loader, rate, JsonRenderer).await?,
    };

    let output = config.page.output.clone();
    write_output(output.as_deref(), &document).await?;

    Ok(RunSummary {
        rows: table.row_count(),
        grand_total: table.footer.totals.grand_total,
        output,
    })
}

async fn render_detached<F, T>(
    loader: &DataLoader<F>,
    rate: TaxRate,
    renderer: T,
) -> PipelineResult<(TableView, String)>
where
    F: Fetch,
    T: TableRenderer + Send + Sync + 'static,
{
    let mut region = MemoryRegion::new();
    let sink = PresentationSink::new(renderer);
    let table = render_into(loader, rate, &sink, &mut region).await?;
    Ok((table, region.into_content()))
}

/// Reads the host page. Rendering starts only after this succeeds.
async fn read_host_page(path: &Path) -> PipelineResult<String> {
    let page = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), bytes = page.len(), "Host page ready");
    Ok(page)
}

async fn write_output(path: Option<&Path>, document: &str) -> PipelineResult<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| PipelineError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
            tokio::fs::write(path, document)
                .await
                .map_err(|source| PipelineError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            info!(path = %path.display(), "Output written");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            let result = async {
                stdout.write_all(document.as_bytes()).await?;
                if !document.ends_with('\n') {
                    stdout.write_all(b"\n").await?;
                }
                stdout.flush().await
            }
            .await;
            result.map_err(|source| PipelineError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        }
    }
    Ok(())
}

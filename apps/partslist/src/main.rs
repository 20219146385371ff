//! # partslist
//!
//! Fills the parts table of a host page from a JSON line-item file.
//!
//! ```text
//! data.json ──► partslist ──► index.html with #computerPartsTable filled
//! ```

use std::process::ExitCode;

use anyhow::Context;
use tracing::info;

use partslist::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    partslist::init_tracing();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting partslist");

    let config = AppConfig::load_from_env().context("Failed to load configuration")?;

    match partslist::run(&config).await {
        Ok(summary) => {
            info!(
                rows = summary.rows,
                grand_total = %summary.grand_total,
                "Done"
            );
            Ok(ExitCode::SUCCESS)
        }
        // Already reported by the pipeline
        Err(err) if err.is_data_unavailable() => Ok(ExitCode::FAILURE),
        Err(err) => Err(err).context("Failed to render parts table"),
    }
}

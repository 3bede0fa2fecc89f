//! FDI Workbook Catalog Fetch
//!
//! Downloads every bilateral FDI workbook listed on the statistics catalog
//! page into the configured download directory.

use anyhow::{Context, Result};
use fdi_utils::{init_logging, validate_config, AppConfig, CatalogClient};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    validate_config(&config).context("Invalid configuration")?;
    info!(page = %config.catalog.page_url, "Starting workbook catalog fetch");

    let client = CatalogClient::new(&config.catalog)?;
    let summary = client
        .fetch_all()
        .await
        .with_context(|| format!("Failed to fetch workbooks into {}", client.download_dir().display()))?;

    info!(
        files = summary.files.len(),
        bytes = summary.bytes,
        directory = %client.download_dir().display(),
        "Catalog fetch finished"
    );
    Ok(())
}

//! FDI Workbook Aggregator
//!
//! Reads every bilateral FDI workbook in the input directory and writes the
//! combined records per sheet as one legacy workbook or a set of CSV files.

use anyhow::{Context, Result};
use fdi_models::Dataset;
use fdi_utils::{
    init_logging, validate_config, AppConfig, CalamineSource, CsvWriter, DatasetWriter,
    OutputFormat, WorkbookAggregator, XlsWriter,
};
use tracing::info;

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    validate_config(&config).context("Invalid configuration")?;
    info!("Starting FDI workbook aggregation");

    let directory = &config.input.directory;
    info!(directory = %directory.display(), "Parsing workbooks");
    let aggregator = WorkbookAggregator::new(CalamineSource, config.layout, config.input.extension.as_str());
    let dataset = aggregator
        .aggregate(directory)
        .with_context(|| format!("Failed to aggregate workbooks in {}", directory.display()))?;

    write_dataset(&config, &dataset)?;
    info!("Aggregation finished");
    Ok(())
}

fn write_dataset(config: &AppConfig, dataset: &Dataset) -> Result<()> {
    let output = &config.output;
    match output.format {
        OutputFormat::Xls => {
            let writer = XlsWriter::new(&output.path, output.max_rows_per_sheet);
            info!(path = %writer.path().display(), "Writing workbook");
            writer
                .write(dataset)
                .with_context(|| format!("Failed to write {}", writer.path().display()))?;
        }
        OutputFormat::Csv => {
            info!(prefix = %output.csv_prefix, "Writing CSV files");
            CsvWriter::new(output.csv_prefix.as_str())
                .write(dataset)
                .context("Failed to write CSV output")?;
        }
    }
    Ok(())
}

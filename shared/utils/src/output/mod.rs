//! Dataset writers.

#[doc(hidden)]
pub mod biff;
pub mod csv;
pub mod xls;

pub use self::csv::CsvWriter;
pub use self::xls::XlsWriter;

use fdi_models::Dataset;
use tracing::{info, warn};

use crate::error::FdiResult;

/// Row ceiling of a legacy `.xls` worksheet.
pub const XLS_MAX_ROWS: usize = 65536;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub name: String,
    pub rows_written: usize,
    pub truncated: bool,
}

/// What a writer actually put on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub sheets: Vec<SheetSummary>,
}

impl WriteSummary {
    pub fn rows_written(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.rows_written).sum()
    }

    pub fn truncated_sheets(&self) -> impl Iterator<Item = &str> {
        self.sheets
            .iter()
            .filter(|sheet| sheet.truncated)
            .map(|sheet| sheet.name.as_str())
    }

    pub(crate) fn record(&mut self, name: &str, available: usize, limit: Option<usize>) -> usize {
        let rows_written = limit.map_or(available, |limit| available.min(limit));
        let truncated = rows_written < available;
        if truncated {
            warn!(sheet = name, rows = available, limit = rows_written, "Capping rows for sheet");
        }
        self.sheets.push(SheetSummary {
            name: name.to_string(),
            rows_written,
            truncated,
        });
        rows_written
    }

    pub(crate) fn log(&self, target: &str) {
        info!(
            target_path = target,
            sheets = self.sheets.len(),
            rows = self.rows_written(),
            truncated = self.truncated_sheets().count(),
            "Dataset written"
        );
    }
}

/// Serializes a [`Dataset`] to its destination.
pub trait DatasetWriter {
    fn write(&self, dataset: &Dataset) -> FdiResult<WriteSummary>;
}

//! Delimited-text writer: one `<prefix>-<sheet>.csv` file per dataset key.

use std::path::PathBuf;

use ::csv::{QuoteStyle, WriterBuilder};
use fdi_models::Dataset;

use super::{DatasetWriter, WriteSummary};
use crate::error::FdiResult;

pub struct CsvWriter {
    prefix: String,
}

impl CsvWriter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn path_for(&self, sheet: &str) -> PathBuf {
        PathBuf::from(format!("{}-{}.csv", self.prefix, sheet))
    }
}

impl DatasetWriter for CsvWriter {
    /// Rows are `origin,partner,year,value` with no header and no quoting.
    fn write(&self, dataset: &Dataset) -> FdiResult<WriteSummary> {
        let mut summary = WriteSummary::default();

        for (sheet, records) in dataset.iter() {
            let path = self.path_for(sheet);
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .quote_style(QuoteStyle::Never)
                .from_path(&path)?;

            for record in records {
                writer.write_record([
                    record.origin().to_string(),
                    record.partner().to_string(),
                    record.year().to_string(),
                    record.value().to_string(),
                ])?;
            }
            writer.flush()?;

            summary.record(sheet, records.len(), None);
            tracing::debug!(sheet, path = %path.display(), rows = records.len(), "Wrote sheet");
        }

        summary.log(&format!("{}-*.csv", self.prefix));
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdi_models::{CellValue, Record};

    #[test]
    fn test_one_file_per_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("all_data");

        let mut dataset = Dataset::new();
        dataset.push("Inflows", Record::new("United States", "China", 2001.0, 120.5));
        dataset.push("Inflows", Record::new("United States", "China", 2002.0, CellValue::Empty));
        dataset.push("Stocks", Record::new("Peru", "Chile", 1999.0, ".."));

        let writer = CsvWriter::new(prefix.to_string_lossy());
        let summary = writer.write(&dataset).unwrap();

        let inflows = std::fs::read_to_string(dir.path().join("all_data-Inflows.csv")).unwrap();
        assert_eq!(
            inflows,
            "United States,China,2001,120.5\nUnited States,China,2002,\n"
        );
        let stocks = std::fs::read_to_string(dir.path().join("all_data-Stocks.csv")).unwrap();
        assert_eq!(stocks, "Peru,Chile,1999,..\n");

        assert_eq!(summary.rows_written(), 3);
        assert_eq!(summary.truncated_sheets().count(), 0);
    }

    #[test]
    fn test_commas_are_not_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");

        let mut dataset = Dataset::new();
        dataset.push("S", Record::new("Korea, Republic of", "Japan", 2005.0, 1.0));
        CsvWriter::new(prefix.to_string_lossy()).write(&dataset).unwrap();

        let text = std::fs::read_to_string(dir.path().join("out-S.csv")).unwrap();
        assert_eq!(text, "Korea, Republic of,Japan,2005,1\n");
    }

    #[test]
    fn test_missing_directory_is_output_error() {
        let mut dataset = Dataset::new();
        dataset.push("S", Record::new("A", "B", 2000.0, 1.0));

        let err = CsvWriter::new("/nonexistent/dir/out").write(&dataset).unwrap_err();
        assert_eq!(err.error_code(), "OUTPUT_ERROR");
    }
}

//! Workbook Aggregator
//!
//! Walks a directory of workbooks in file-name order and collects the records
//! of every sheet into one [`Dataset`] keyed by sheet name.

use std::path::{Path, PathBuf};

use fdi_models::{CellGrid, Dataset};
use tracing::{debug, info, warn};

use super::extractor::{SheetExtractor, SheetLayout};
use super::reader::WorkbookSource;
use super::resolver::{origin_candidates, resolve, OriginSource};
use crate::error::{FdiError, FdiResult};

/// Counters for one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    pub workbooks: usize,
    pub sheets: usize,
    pub records: usize,
}

pub struct WorkbookAggregator<S> {
    source: S,
    extractor: SheetExtractor,
    extension: String,
}

impl<S: WorkbookSource> WorkbookAggregator<S> {
    pub fn new(source: S, layout: SheetLayout, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            source,
            extractor: SheetExtractor::new(layout),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Files in `directory` carrying the spreadsheet extension, sorted by name.
    pub fn workbook_files(&self, directory: &Path) -> FdiResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(directory)? {
            let path = entry?.path();
            if path.is_file() && self.has_extension(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case(&self.extension))
    }

    /// Extract every workbook of `directory`. The first error aborts the run.
    pub fn aggregate(&self, directory: &Path) -> FdiResult<Dataset> {
        self.aggregate_with_summary(directory).map(|(dataset, _)| dataset)
    }

    pub fn aggregate_with_summary(&self, directory: &Path) -> FdiResult<(Dataset, AggregationSummary)> {
        let files = self.workbook_files(directory)?;
        info!(directory = %directory.display(), count = files.len(), "Found workbooks");

        let mut dataset = Dataset::new();
        let mut summary = AggregationSummary::default();

        for path in &files {
            let file_name = file_name_of(path);
            let (partial, sheets) = self
                .extract_workbook(path, &file_name)
                .map_err(|e| e.in_workbook(&file_name))?;

            summary.workbooks += 1;
            summary.sheets += sheets;
            summary.records += partial.total_records();
            dataset.merge(partial);
        }

        info!(
            workbooks = summary.workbooks,
            sheets = summary.sheets,
            records = summary.records,
            "Aggregation complete"
        );
        Ok((dataset, summary))
    }

    /// Records of one workbook plus its sheet count.
    pub fn extract_workbook(&self, path: &Path, file_name: &str) -> FdiResult<(Dataset, usize)> {
        let sheets = self.source.open(path)?;

        let candidates = origin_candidates(&sheets);
        let origin = resolve(&candidates, file_name)?;
        match origin.source {
            OriginSource::Ambiguous => warn!(
                workbook = file_name,
                origin = %origin.label,
                candidates = ?candidates,
                "Ambiguous origin label; picked the first candidate"
            ),
            source => info!(workbook = file_name, origin = %origin.label, ?source, "Resolved origin"),
        }

        let mut dataset = Dataset::new();
        for sheet in &sheets {
            let records = dataset.sheet_mut(sheet.name());
            let before = records.len();
            for record in self.extractor.extract(sheet, &origin.label)? {
                records.push(record?);
            }
            debug!(
                workbook = file_name,
                sheet = sheet.name(),
                records = records.len() - before,
                "Extracted sheet"
            );
        }

        Ok((dataset, sheets.len()))
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

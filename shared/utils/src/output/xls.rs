//! Legacy Excel 97-2003 (`.xls`) writer.
//!
//! Emits a minimal BIFF8 workbook stream inside a compound file: one worksheet
//! per dataset key, columns origin, partner, year and value, starting at row 0.
//! Text is written as inline LABEL records, so no shared string table is needed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use fdi_models::{CellValue, Dataset, Record};

use super::biff::{self, MAX_SHEET_NAME_CHARS};
use super::{DatasetWriter, WriteSummary, XLS_MAX_ROWS};
use crate::error::{FdiError, FdiResult};

const COLUMNS: u16 = 4;

pub struct XlsWriter {
    path: PathBuf,
    max_rows: usize,
}

impl XlsWriter {
    /// `.xls` is appended to `path` unless it already ends with it.
    pub fn new(path: impl Into<PathBuf>, max_rows: usize) -> Self {
        let mut path = path.into();
        let has_extension = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("xls"));
        if !has_extension {
            let mut name = path.into_os_string();
            name.push(".xls");
            path = PathBuf::from(name);
        }
        Self {
            path,
            max_rows: max_rows.min(XLS_MAX_ROWS),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Complete `.xls` file contents for `dataset`.
    pub fn to_bytes(&self, dataset: &Dataset) -> FdiResult<(Vec<u8>, WriteSummary)> {
        let (stream, summary) = self.workbook_stream(dataset);
        Ok((biff::compound_file(&stream)?, summary))
    }

    fn workbook_stream(&self, dataset: &Dataset) -> (Vec<u8>, WriteSummary) {
        let mut summary = WriteSummary::default();
        let names = sheet_names(dataset.sheet_names());

        let sheets: Vec<Vec<u8>> = names
            .iter()
            .zip(dataset.iter())
            .map(|(name, (key, records))| {
                let rows = summary.record(key, records.len(), Some(self.max_rows));
                tracing::debug!(sheet = %name, rows, "Writing worksheet");
                sheet_stream(&records[..rows])
            })
            .collect();

        (biff::workbook_stream(&names, &sheets), summary)
    }
}

impl DatasetWriter for XlsWriter {
    fn write(&self, dataset: &Dataset) -> FdiResult<WriteSummary> {
        let (bytes, summary) = self.to_bytes(dataset)?;
        std::fs::write(&self.path, bytes).map_err(|e| {
            FdiError::output(format!("failed to write {}: {}", self.path.display(), e))
        })?;
        summary.log(&self.path.display().to_string());
        Ok(summary)
    }
}

/// BIFF sheet names: at most 31 characters and unique within the workbook.
fn sheet_names<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    keys.map(|key| {
        let base: String = key.chars().take(MAX_SHEET_NAME_CHARS).collect();
        let mut name = base.clone();
        let mut suffix = 1;
        while !taken.insert(name.to_lowercase()) {
            suffix += 1;
            let tag = format!("~{}", suffix);
            let keep = MAX_SHEET_NAME_CHARS.saturating_sub(tag.chars().count());
            name = base.chars().take(keep).chain(tag.chars()).collect();
        }
        name
    })
    .collect()
}

fn sheet_stream(records: &[Record]) -> Vec<u8> {
    let mut out = biff::begin_sheet(records.len(), COLUMNS);

    for (row, record) in records.iter().enumerate() {
        // Callers cap rows at XLS_MAX_ROWS, so the index fits in u16.
        let row = row as u16;
        biff::push_label(&mut out, row, 0, record.origin());
        biff::push_label(&mut out, row, 1, record.partner());
        biff::push_number(&mut out, row, 2, record.year());
        match record.value() {
            CellValue::Number(value) => biff::push_number(&mut out, row, 3, *value),
            CellValue::Text(text) => biff::push_label(&mut out, row, 3, text),
            CellValue::Empty => {}
        }
    }

    biff::end_sheet(&mut out);
    out
}

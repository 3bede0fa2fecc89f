//! Workbook reading through calamine.

use std::path::Path;

use calamine::{open_workbook_auto, DataType, Range, Reader};
use fdi_models::{CellGrid, CellValue};

use crate::error::{FdiError, FdiResult};

/// Opens a workbook file and hands back its sheets in native order.
///
/// The underlying file is released before `open` returns; the sheets own
/// their cell data.
pub trait WorkbookSource {
    type Sheet: CellGrid;

    fn open(&self, path: &Path) -> FdiResult<Vec<Self::Sheet>>;
}

/// calamine-backed reader supporting `.xls`, `.xlsx`, `.xlsb` and `.ods`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineSource;

impl WorkbookSource for CalamineSource {
    type Sheet = RangeGrid;

    fn open(&self, path: &Path) -> FdiResult<Vec<RangeGrid>> {
        let file = path.display().to_string();
        let mut workbook =
            open_workbook_auto(path).map_err(|e| FdiError::workbook_read(&file, e.to_string()))?;

        let sheet_names = workbook.sheet_names().to_vec();
        sheet_names
            .into_iter()
            .map(|name| {
                let range = workbook
                    .worksheet_range(&name)
                    .ok_or_else(|| {
                        FdiError::workbook_read(&file, format!("sheet '{}' not found", name))
                    })?
                    .map_err(|e| FdiError::workbook_read(&file, e.to_string()))?;
                Ok(RangeGrid::new(name, range))
            })
            .collect()
    }
}

/// A calamine range addressed in absolute worksheet coordinates.
#[derive(Debug, Clone)]
pub struct RangeGrid {
    name: String,
    range: Range<DataType>,
}

impl RangeGrid {
    pub fn new(name: impl Into<String>, range: Range<DataType>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

impl CellGrid for RangeGrid {
    fn name(&self) -> &str {
        &self.name
    }

    // calamine ranges start at the first used cell; extents count from A1.
    fn row_count(&self) -> usize {
        self.range.end().map_or(0, |(row, _)| row as usize + 1)
    }

    fn column_count(&self) -> usize {
        self.range.end().map_or(0, |(_, column)| column as usize + 1)
    }

    fn cell(&self, row: usize, column: usize) -> CellValue {
        let (Ok(row), Ok(column)) = (u32::try_from(row), u32::try_from(column)) else {
            return CellValue::Empty;
        };
        self.range
            .get_value((row, column))
            .map(convert_value)
            .unwrap_or_default()
    }
}

fn convert_value(value: &DataType) -> CellValue {
    match value {
        DataType::Empty | DataType::Error(_) => CellValue::Empty,
        DataType::Int(v) => CellValue::Number(*v as f64),
        DataType::Float(v) | DataType::DateTime(v) => CellValue::Number(*v),
        DataType::Bool(v) => CellValue::Number(if *v { 1.0 } else { 0.0 }),
        DataType::String(v) => CellValue::Text(v.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

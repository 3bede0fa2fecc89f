//! Builds BIFF8 `.xls` input workbooks from in-memory grids.

#![allow(dead_code)]

use std::path::Path;

use fdi_models::{CellGrid, CellValue, MemoryGrid};
use fdi_utils::output::biff;

/// A standard bilateral sheet: origin at A1, years on row 5 from column E,
/// partner rows from row 8.
pub fn bilateral_sheet(
    name: &str,
    origin: Option<&str>,
    years: &[f64],
    partners: &[(&str, &[f64])],
) -> MemoryGrid {
    let mut grid = MemoryGrid::new(name);
    if let Some(origin) = origin {
        grid.set(0, 0, origin);
    }
    grid.set(2, 0, "Bilateral FDI statistics (US$ million)");
    grid.set_row(4, 4, years.iter().copied());
    for (offset, (partner, values)) in partners.iter().enumerate() {
        let row = 7 + offset;
        grid.set(row, 0, *partner);
        grid.set_row(row, 4, values.iter().copied());
    }
    grid
}

pub fn write_workbook(path: &Path, sheets: &[MemoryGrid]) {
    std::fs::write(path, workbook_bytes(sheets)).expect("write fixture workbook");
}

pub fn workbook_bytes(sheets: &[MemoryGrid]) -> Vec<u8> {
    let names: Vec<String> = sheets.iter().map(|sheet| sheet.name().to_string()).collect();
    let streams: Vec<Vec<u8>> = sheets.iter().map(sheet_stream).collect();
    biff::compound_file(&biff::workbook_stream(&names, &streams)).expect("build fixture workbook")
}

fn sheet_stream(sheet: &MemoryGrid) -> Vec<u8> {
    let mut out = biff::begin_sheet(sheet.row_count(), sheet.column_count() as u16);
    for row in 0..sheet.row_count() {
        for column in 0..sheet.column_count() {
            let (row16, col16) = (row as u16, column as u16);
            match sheet.cell(row, column) {
                CellValue::Number(value) => biff::push_number(&mut out, row16, col16, value),
                CellValue::Text(text) => biff::push_label(&mut out, row16, col16, &text),
                CellValue::Empty => {}
            }
        }
    }
    biff::end_sheet(&mut out);
    out
}

//! Cell-level domain models for sheet extraction.
//!
//! This module defines the typed cell value read out of a worksheet and the
//! `CellGrid` view that the extractor consumes, plus an in-memory grid used for
//! fixtures and for callers that already hold sheet contents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single worksheet cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Empty cells and zero-length text both count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Numeric reading of the cell.
    ///
    /// Text that parses as a float (after trimming) is accepted, since header
    /// rows in the source workbooks sometimes store years as text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
            Self::Empty => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Trimmed, non-empty text content.
    pub fn as_label(&self) -> Option<&str> {
        self.as_text()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
            Self::Empty => Ok(()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Read-only rectangular view over one worksheet.
///
/// Addresses outside `row_count() x column_count()` read as [`CellValue::Empty`].
pub trait CellGrid {
    fn name(&self) -> &str;
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn cell(&self, row: usize, column: usize) -> CellValue;
}

impl<G: CellGrid + ?Sized> CellGrid for &G {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn column_count(&self) -> usize {
        (**self).column_count()
    }

    fn cell(&self, row: usize, column: usize) -> CellValue {
        (**self).cell(row, column)
    }
}

/// Worksheet held fully in memory, row-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryGrid {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

impl MemoryGrid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Set a cell, growing the grid as needed.
    pub fn set(&mut self, row: usize, column: usize, value: impl Into<CellValue>) -> &mut Self {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, CellValue::Empty);
        }
        cells[column] = value.into();
        self
    }

    /// Set consecutive cells of one row starting at `column`.
    pub fn set_row<I, V>(&mut self, row: usize, column: usize, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        for (offset, value) in values.into_iter().enumerate() {
            self.set(row, column + offset, value);
        }
        self
    }
}

impl CellGrid for MemoryGrid {
    fn name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn cell(&self, row: usize, column: usize) -> CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .cloned()
            .unwrap_or_default()
    }
}

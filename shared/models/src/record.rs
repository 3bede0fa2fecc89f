//! Extracted record and year-header models.

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// One bilateral observation: origin region, partner region, year, value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    origin: String,
    partner: String,
    year: f64,
    value: CellValue,
}

impl Record {
    pub fn new(
        origin: impl Into<String>,
        partner: impl Into<String>,
        year: f64,
        value: impl Into<CellValue>,
    ) -> Self {
        Self {
            origin: origin.into(),
            partner: partner.into(),
            year,
            value: value.into(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn partner(&self) -> &str {
        &self.partner
    }

    pub fn year(&self) -> f64 {
        self.year
    }

    pub fn value(&self) -> &CellValue {
        &self.value
    }
}

/// A single year column of the header row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearColumn {
    pub column: usize,
    pub year: f64,
}

/// Contiguous run of year columns found on a sheet's header row.
///
/// Columns are `first_column..first_column + len()`, so they are strictly
/// increasing with no gaps by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct YearHeader {
    first_column: usize,
    years: Vec<f64>,
}

impl YearHeader {
    pub fn new(first_column: usize, years: Vec<f64>) -> Self {
        Self {
            first_column,
            years,
        }
    }

    pub fn first_column(&self) -> usize {
        self.first_column
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<YearColumn> {
        self.years.get(index).map(|&year| YearColumn {
            column: self.first_column + index,
            year,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = YearColumn> + '_ {
        self.years
            .iter()
            .enumerate()
            .map(move |(offset, &year)| YearColumn {
                column: self.first_column + offset,
                year,
            })
    }
}

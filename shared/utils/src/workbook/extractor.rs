//! Sheet Table Extractor
//!
//! Turns one worksheet of stacked bilateral tables into a lazy sequence of
//! records. Each sheet carries a header row of years somewhere to the right
//! of the region label columns, followed by blocks of data rows separated by
//! fixed-width breaks.

use std::borrow::Cow;

use fdi_models::{CellGrid, Record, YearHeader};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{FdiError, FdiResult};

/// Row offsets of the spreadsheet family being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_row_order"))]
pub struct SheetLayout {
    /// Row holding the year header.
    pub header_row: usize,
    /// First row of the first sub-table.
    pub first_data_row: usize,
    /// Rows skipped when a row has no partner label.
    #[validate(range(min = 1, message = "Break width must be at least 1"))]
    pub break_width: usize,
}

impl SheetLayout {
    pub const HEADER_ROW: usize = 4;
    pub const FIRST_DATA_ROW: usize = 7;
    pub const BREAK_WIDTH: usize = 6;
}

fn validate_row_order(layout: &SheetLayout) -> Result<(), ValidationError> {
    if layout.first_data_row <= layout.header_row {
        let mut error = ValidationError::new("row_order");
        error.message = Some(Cow::from(format!(
            "first_data_row ({}) must come after header_row ({})",
            layout.first_data_row, layout.header_row
        )));
        return Err(error);
    }
    Ok(())
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_row: Self::HEADER_ROW,
            first_data_row: Self::FIRST_DATA_ROW,
            break_width: Self::BREAK_WIDTH,
        }
    }
}

/// Extracts records from sheets laid out per a [`SheetLayout`].
#[derive(Debug, Clone, Default)]
pub struct SheetExtractor {
    layout: SheetLayout,
}

impl SheetExtractor {
    pub fn new(layout: SheetLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Find the contiguous run of numeric cells on the header row.
    pub fn locate_year_header<G: CellGrid>(&self, grid: &G) -> FdiResult<YearHeader> {
        let row = self.layout.header_row;
        let columns = grid.column_count();

        let first_column = (0..columns)
            .find(|&column| grid.cell(row, column).as_number().is_some())
            .ok_or_else(|| FdiError::malformed_header(grid.name(), row))?;

        let years = (first_column..columns)
            .map_while(|column| grid.cell(row, column).as_number())
            .collect();

        Ok(YearHeader::new(first_column, years))
    }

    /// Start extracting `grid`. The header is located eagerly; data rows are
    /// read as the returned iterator is advanced.
    pub fn extract<'g, G: CellGrid>(
        &self,
        grid: &'g G,
        origin: &str,
    ) -> FdiResult<SheetRecords<'g, G>> {
        let header = self.locate_year_header(grid)?;

        Ok(SheetRecords {
            grid,
            origin: origin.to_string(),
            header,
            break_width: self.layout.break_width.max(1),
            row: self.layout.first_data_row,
            row_count: grid.row_count(),
            current: None,
            failed: false,
        })
    }
}

enum RowKind {
    Label(String),
    Break,
    Invalid { column: usize },
}

/// Records of one sheet in row-major order.
///
/// Yields an error at most once, after which the sequence ends.
pub struct SheetRecords<'g, G: CellGrid> {
    grid: &'g G,
    origin: String,
    header: YearHeader,
    break_width: usize,
    row: usize,
    row_count: usize,
    /// Partner label of the row being emitted and the next year index.
    current: Option<(String, usize)>,
    failed: bool,
}

impl<'g, G: CellGrid> SheetRecords<'g, G> {
    pub fn header(&self) -> &YearHeader {
        &self.header
    }

    fn classify_row(&self, row: usize) -> RowKind {
        let label_columns = 0..self.header.first_column();
        for column in label_columns {
            let cell = self.grid.cell(row, column);
            if cell.is_empty() {
                continue;
            }
            return match cell.as_text() {
                Some(label) => RowKind::Label(label.to_string()),
                None => RowKind::Invalid { column },
            };
        }
        RowKind::Break
    }
}

impl<'g, G: CellGrid> Iterator for SheetRecords<'g, G> {
    type Item = FdiResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((partner, index)) = self.current.as_mut() {
                if let Some(year) = self.header.get(*index) {
                    *index += 1;
                    let value = self.grid.cell(self.row, year.column);
                    return Some(Ok(Record::new(
                        self.origin.as_str(),
                        partner.as_str(),
                        year.year,
                        value,
                    )));
                }
            }
            if self.current.take().is_some() {
                self.row += 1;
                continue;
            }

            if self.failed || self.row >= self.row_count {
                return None;
            }

            match self.classify_row(self.row) {
                RowKind::Label(partner) => self.current = Some((partner, 0)),
                RowKind::Break => self.row = self.row.saturating_add(self.break_width),
                RowKind::Invalid { column } => {
                    self.failed = true;
                    return Some(Err(FdiError::missing_region_label(
                        self.grid.name(),
                        self.row,
                        column,
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdi_models::{CellValue, MemoryGrid};
    use proptest::prelude::*;

    fn inflows_sheet() -> MemoryGrid {
        let mut grid = MemoryGrid::new("Inflows");
        grid.set(0, 0, "United States");
        grid.set_row(4, 4, [2001.0, 2002.0]);
        grid.set(7, 0, "China");
        grid.set_row(7, 4, [120.5, 130.2]);
        grid
    }

    fn collect(grid: &MemoryGrid, origin: &str) -> Vec<Record> {
        SheetExtractor::default()
            .extract(grid, origin)
            .unwrap()
            .collect::<FdiResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_single_row_sheet() {
        let records = collect(&inflows_sheet(), "United States");

        assert_eq!(
            records,
            vec![
                Record::new("United States", "China", 2001.0, 120.5),
                Record::new("United States", "China", 2002.0, 130.2),
            ]
        );
    }

    #[test]
    fn test_header_accepts_numeric_text() {
        let mut grid = MemoryGrid::new("Stocks");
        grid.set_row(4, 2, ["2010", "2011"]);

        let header = SheetExtractor::default().locate_year_header(&grid).unwrap();
        assert_eq!(header.first_column(), 2);
        assert_eq!(header.iter().map(|y| y.year).collect::<Vec<_>>(), vec![2010.0, 2011.0]);
    }

    #[test]
    fn test_header_stops_at_first_non_numeric_cell() {
        let mut grid = MemoryGrid::new("Stocks");
        grid.set_row(4, 1, [CellValue::Number(2001.0), CellValue::Number(2002.0)]);
        grid.set(4, 3, "Note");
        grid.set(4, 4, 2004.0);

        let header = SheetExtractor::default().locate_year_header(&grid).unwrap();
        assert_eq!(header.len(), 2);
    }

    #[test]
    fn test_missing_header_is_malformed() {
        let mut grid = MemoryGrid::new("Notes");
        grid.set(4, 0, "Year");
        grid.set(7, 0, "China");

        let err = SheetExtractor::default().extract(&grid, "France").err().unwrap();
        assert!(matches!(err, FdiError::MalformedHeader { ref sheet, row: 4 } if sheet == "Notes"));
    }

    #[test]
    fn test_empty_sheet_is_malformed() {
        let grid = MemoryGrid::new("Empty");
        assert!(SheetExtractor::default().extract(&grid, "France").is_err());
    }

    #[test]
    fn test_label_in_later_column() {
        let mut grid = inflows_sheet();
        grid.set(8, 2, "Japan");
        grid.set_row(8, 4, [1.0, 2.0]);

        let records = collect(&grid, "United States");
        assert_eq!(records.len(), 4);
        assert_eq!(records[2].partner(), "Japan");
        assert_eq!(records[3].value(), &CellValue::Number(2.0));
    }

    #[test]
    fn test_break_skips_fixed_width() {
        let mut grid = inflows_sheet();
        // Row 8 is a break; rows 9..14 are skipped even though they hold labels.
        for row in 9..14 {
            grid.set(row, 0, "Hidden");
            grid.set_row(row, 4, [0.0, 0.0]);
        }
        grid.set(14, 0, "Brazil");
        grid.set_row(14, 4, [5.0, 6.0]);

        let partners: Vec<String> = collect(&grid, "United States")
            .iter()
            .map(|r| r.partner().to_string())
            .collect();
        assert_eq!(partners, vec!["China", "China", "Brazil", "Brazil"]);
    }

    #[test]
    fn test_empty_values_are_emitted() {
        let mut grid = inflows_sheet();
        grid.set(8, 0, "Chile");

        let records = collect(&grid, "United States");
        assert_eq!(records.len(), 4);
        assert_eq!(records[2].value(), &CellValue::Empty);
    }

    #[test]
    fn test_numeric_label_is_missing_region_label() {
        let mut grid = inflows_sheet();
        grid.set(8, 1, 42.0);

        let results: Vec<_> = SheetExtractor::default()
            .extract(&grid, "United States")
            .unwrap()
            .collect();

        assert_eq!(results.len(), 3);
        assert!(results[..2].iter().all(Result::is_ok));
        assert!(matches!(
            results[2],
            Err(FdiError::MissingRegionLabel { row: 8, column: 1, .. })
        ));
    }

    #[test]
    fn test_custom_layout() {
        let mut grid = MemoryGrid::new("Custom");
        grid.set_row(0, 1, [1999.0]);
        grid.set(1, 0, "Peru");
        grid.set(1, 1, 7.0);

        let extractor = SheetExtractor::new(SheetLayout {
            header_row: 0,
            first_data_row: 1,
            break_width: 2,
        });
        let records: Vec<Record> = extractor
            .extract(&grid, "Chile")
            .unwrap()
            .collect::<FdiResult<_>>()
            .unwrap();
        assert_eq!(records, vec![Record::new("Chile", "Peru", 1999.0, 7.0)]);
    }

    #[test]
    fn test_oversized_break_ends_the_sheet() {
        let mut grid = MemoryGrid::new("Wide");
        grid.set_row(0, 1, [1999.0]);
        grid.set(1, 0, "Peru");
        grid.set(1, 1, 7.0);
        grid.set(3, 0, "Bolivia");
        grid.set(3, 1, 8.0);

        let extractor = SheetExtractor::new(SheetLayout {
            header_row: 0,
            first_data_row: 1,
            break_width: usize::MAX,
        });
        let records: Vec<Record> = extractor
            .extract(&grid, "Chile")
            .unwrap()
            .collect::<FdiResult<_>>()
            .unwrap();
        assert_eq!(records, vec![Record::new("Chile", "Peru", 1999.0, 7.0)]);
    }

    #[test]
    fn test_layout_row_order_is_validated() {
        assert!(SheetLayout::default().validate().is_ok());

        let inverted = SheetLayout {
            header_row: 7,
            first_data_row: 7,
            break_width: 6,
        };
        let errors = inverted.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));

        let no_break = SheetLayout {
            break_width: 0,
            ..SheetLayout::default()
        };
        assert!(no_break.validate().unwrap_err().field_errors().contains_key("break_width"));
    }

    fn stacked_grid(years: usize, first_year_column: usize, rows: &[bool]) -> MemoryGrid {
        let mut grid = MemoryGrid::new("Generated");
        let header: Vec<f64> = (0..years).map(|i| 2000.0 + i as f64).collect();
        grid.set_row(SheetLayout::HEADER_ROW, first_year_column, header);
        for (offset, &labelled) in rows.iter().enumerate() {
            let row = SheetLayout::FIRST_DATA_ROW + offset;
            if labelled {
                grid.set(row, 0, format!("Partner {}", row));
                let values: Vec<f64> = (0..years).map(|i| (row * 10 + i) as f64).collect();
                grid.set_row(row, first_year_column, values);
            }
        }
        grid
    }

    /// Rows the extractor visits given the labelled/break pattern.
    fn visited_labelled_rows(rows: &[bool]) -> usize {
        let mut row = 0;
        let mut count = 0;
        while row < rows.len() {
            if rows[row] {
                count += 1;
                row += 1;
            } else {
                row += SheetLayout::BREAK_WIDTH;
            }
        }
        count
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// k header years produce exactly k records per labelled row.
        #[test]
        fn prop_records_per_row_match_header_width(
            years in 1usize..8,
            first_year_column in 1usize..5,
            rows in prop::collection::vec(any::<bool>(), 1..40),
        ) {
            let mut grid = stacked_grid(years, first_year_column, &rows);
            // Keep the grid tall enough for trailing breaks.
            grid.set(SheetLayout::FIRST_DATA_ROW + rows.len(), 0, CellValue::Empty);

            let records = collect(&grid, "Origin");
            prop_assert_eq!(records.len(), years * visited_labelled_rows(&rows));
            for chunk in records.chunks(years) {
                let partner = chunk[0].partner();
                prop_assert!(chunk.iter().all(|r| r.partner() == partner));
                let chunk_years: Vec<f64> = chunk.iter().map(|r| r.year()).collect();
                let expected: Vec<f64> = (0..years).map(|i| 2000.0 + i as f64).collect();
                prop_assert_eq!(chunk_years, expected);
            }
        }

        /// A break row suppresses itself and the following rows of the break.
        #[test]
        fn prop_break_skips_exactly_break_width(trailing in 1usize..12) {
            let mut pattern = vec![false];
            pattern.extend(std::iter::repeat(true).take(trailing));
            let grid = stacked_grid(2, 3, &pattern);

            let records = collect(&grid, "Origin");
            let skipped = SheetLayout::BREAK_WIDTH - 1;
            let expected_rows = trailing.saturating_sub(skipped);
            prop_assert_eq!(records.len(), 2 * expected_rows);
            if let Some(first) = records.first() {
                let first_row = SheetLayout::FIRST_DATA_ROW + SheetLayout::BREAK_WIDTH;
                prop_assert_eq!(first.partner(), format!("Partner {}", first_row));
            }
        }

        /// Extraction has no side effects and restarts from the top on each call.
        #[test]
        fn prop_extraction_is_idempotent(
            years in 1usize..5,
            rows in prop::collection::vec(any::<bool>(), 1..30),
        ) {
            let grid = stacked_grid(years, 2, &rows);
            prop_assert_eq!(collect(&grid, "Origin"), collect(&grid, "Origin"));
        }
    }
}

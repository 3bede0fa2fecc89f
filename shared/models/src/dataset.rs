//! Aggregated dataset keyed by sheet name.

use std::collections::HashMap;

use crate::record::Record;

/// Records grouped by the sheet they were extracted from.
///
/// Sheets keep first-appearance order and records keep extraction order. The
/// dataset only ever grows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    sheets: Vec<(String, Vec<Record>)>,
    index: HashMap<String, usize>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of `sheet`, creating an empty entry if absent.
    pub fn sheet_mut(&mut self, sheet: &str) -> &mut Vec<Record> {
        let position = match self.index.get(sheet) {
            Some(&position) => position,
            None => {
                self.sheets.push((sheet.to_string(), Vec::new()));
                let position = self.sheets.len() - 1;
                self.index.insert(sheet.to_string(), position);
                position
            }
        };
        &mut self.sheets[position].1
    }

    pub fn push(&mut self, sheet: &str, record: Record) {
        self.sheet_mut(sheet).push(record);
    }

    pub fn extend<I>(&mut self, sheet: &str, records: I)
    where
        I: IntoIterator<Item = Record>,
    {
        self.sheet_mut(sheet).extend(records);
    }

    /// Append every sheet of `other` after the records already held.
    pub fn merge(&mut self, other: Dataset) {
        for (sheet, records) in other.sheets {
            self.extend(&sheet, records);
        }
    }

    pub fn get(&self, sheet: &str) -> Option<&[Record]> {
        self.index
            .get(sheet)
            .map(|&position| self.sheets[position].1.as_slice())
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.sheets
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.sheets.iter().map(|(_, records)| records.len()).sum()
    }
}

//! Origin Region Resolver
//!
//! Settles on one origin label per workbook. Sheets usually repeat the label
//! in their top-left cell, but some sheets omit it and others use a longer
//! variant ("France, Metropolitan").

use std::collections::BTreeSet;

use fdi_models::CellGrid;

use crate::error::{FdiError, FdiResult};

/// How the origin label was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginSource {
    /// Every labelled sheet agreed.
    Unanimous,
    /// No sheet carried a label; taken from the file name.
    FileName,
    /// One candidate left after dropping comma variants.
    CommaFiltered,
    /// Still ambiguous; the lexicographically smallest candidate was taken.
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOrigin {
    pub label: String,
    pub source: OriginSource,
}

/// Distinct trimmed labels found at (0,0) of each sheet.
pub fn origin_candidates<G: CellGrid>(sheets: &[G]) -> BTreeSet<String> {
    sheets
        .iter()
        .filter_map(|sheet| sheet.cell(0, 0).as_label().map(str::to_string))
        .collect()
}

/// Resolve the origin label, reporting which rule decided it.
pub fn resolve(candidates: &BTreeSet<String>, file_name: &str) -> FdiResult<ResolvedOrigin> {
    let resolved = |label: &str, source| ResolvedOrigin {
        label: label.to_string(),
        source,
    };

    match candidates.len() {
        0 => {
            if file_name.is_empty() {
                return Err(FdiError::origin_not_found(file_name));
            }
            let label = label_from_file_name(file_name).unwrap_or(file_name);
            Ok(resolved(label, OriginSource::FileName))
        }
        1 => Ok(resolved(first(candidates), OriginSource::Unanimous)),
        _ => {
            let mut filtered = candidates.iter().filter(|label| !label.contains(','));
            match (filtered.next(), filtered.next()) {
                (Some(only), None) => Ok(resolved(only.as_str(), OriginSource::CommaFiltered)),
                (Some(smallest), Some(_)) => Ok(resolved(smallest.as_str(), OriginSource::Ambiguous)),
                (None, _) => Ok(resolved(first(candidates), OriginSource::Ambiguous)),
            }
        }
    }
}

/// Resolve the origin label of a workbook.
pub fn resolve_origin(candidates: &BTreeSet<String>, file_name: &str) -> FdiResult<String> {
    resolve(candidates, file_name).map(|resolved| resolved.label)
}

fn first(candidates: &BTreeSet<String>) -> &str {
    candidates.iter().next().map(String::as_str).unwrap_or_default()
}

/// Text strictly between the last `_` and the last `.`, e.g. `exports_FRA.xls` -> `FRA`.
fn label_from_file_name(file_name: &str) -> Option<&str> {
    let underscore = file_name.rfind('_')?;
    let dot = file_name.rfind('.')?;
    if underscore >= dot {
        return None;
    }
    let label = &file_name[underscore + 1..dot];
    (!label.is_empty()).then_some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdi_models::MemoryGrid;
    use proptest::prelude::*;

    fn set(labels: &[&str]) -> BTreeSet<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_candidate() {
        assert_eq!(resolve_origin(&set(&["France"]), "whatever.xls").unwrap(), "France");
    }

    #[test]
    fn test_file_name_fallback() {
        assert_eq!(resolve_origin(&set(&[]), "exports_FRA.xls").unwrap(), "FRA");
        assert_eq!(resolve_origin(&set(&[]), "noext").unwrap(), "noext");
        assert_eq!(resolve_origin(&set(&[]), "no_ext").unwrap(), "no_ext");
        assert_eq!(resolve_origin(&set(&[]), "empty_.xls").unwrap(), "empty_.xls");
        assert_eq!(resolve_origin(&set(&[]), "v1.2_final").unwrap(), "v1.2_final");
        assert_eq!(resolve_origin(&set(&[]), "a_b_USA.xls").unwrap(), "USA");
    }

    #[test]
    fn test_empty_file_name_is_origin_not_found() {
        let err = resolve_origin(&set(&[]), "").unwrap_err();
        assert_eq!(err.error_code(), "ORIGIN_NOT_FOUND");
    }

    #[test]
    fn test_comma_variant_is_filtered() {
        let resolved = resolve(&set(&["France", "France, Metropolitan"]), "x.xls").unwrap();
        assert_eq!(resolved.label, "France");
        assert_eq!(resolved.source, OriginSource::CommaFiltered);
    }

    #[test]
    fn test_all_candidates_with_commas() {
        let candidates = set(&["B, y", "A, x"]);
        let resolved = resolve(&candidates, "x.xls").unwrap();
        assert!(candidates.contains(&resolved.label));
        assert_eq!(resolved.label, "A, x");
        assert_eq!(resolved.source, OriginSource::Ambiguous);
    }

    #[test]
    fn test_several_candidates_without_commas() {
        let resolved = resolve(&set(&["Germany", "Austria", "Austria, x"]), "x.xls").unwrap();
        assert_eq!(resolved.label, "Austria");
        assert_eq!(resolved.source, OriginSource::Ambiguous);
    }

    #[test]
    fn test_candidates_are_trimmed_and_deduplicated() {
        let mut first = MemoryGrid::new("Inflows");
        first.set(0, 0, "  Japan ");
        let mut second = MemoryGrid::new("Outflows");
        second.set(0, 0, "Japan");
        let mut blank = MemoryGrid::new("Stocks");
        blank.set(0, 0, "   ");
        let missing = MemoryGrid::new("Notes");

        let candidates = origin_candidates(&[first, second, blank, missing]);
        assert_eq!(candidates, set(&["Japan"]));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The chosen label is always one of the candidates when any exist.
        #[test]
        fn prop_resolution_picks_a_candidate(
            labels in prop::collection::btree_set("[A-Za-z]{1,8}(, [a-z]{1,5})?", 1..6),
            file_name in "[a-z]{1,8}_[A-Z]{3}\\.xls",
        ) {
            let resolved = resolve_origin(&labels, &file_name).unwrap();
            prop_assert!(labels.contains(&resolved));
        }

        /// Resolution is deterministic for a given input.
        #[test]
        fn prop_resolution_is_deterministic(
            labels in prop::collection::btree_set("[A-Za-z ,]{1,12}", 0..6),
            file_name in "[a-z_]{1,10}(\\.xls)?",
        ) {
            prop_assert_eq!(
                resolve_origin(&labels, &file_name).unwrap(),
                resolve_origin(&labels, &file_name).unwrap()
            );
        }
    }
}

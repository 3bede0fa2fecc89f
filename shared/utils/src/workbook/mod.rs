//! Workbook parsing: sheet extraction, origin resolution, and directory aggregation.

pub mod aggregator;
pub mod extractor;
pub mod reader;
pub mod resolver;

pub use aggregator::{AggregationSummary, WorkbookAggregator};
pub use extractor::{SheetExtractor, SheetLayout, SheetRecords};
pub use reader::{CalamineSource, RangeGrid, WorkbookSource};
pub use resolver::{origin_candidates, resolve, resolve_origin, OriginSource, ResolvedOrigin};

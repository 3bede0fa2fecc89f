pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod validation;
pub mod workbook;

pub use self::catalog::{CatalogClient, FetchSummary};
pub use self::config::*;
pub use self::error::*;
pub use self::logging::*;
pub use self::output::{CsvWriter, DatasetWriter, SheetSummary, WriteSummary, XlsWriter, XLS_MAX_ROWS};
pub use self::validation::*;
pub use self::workbook::*;

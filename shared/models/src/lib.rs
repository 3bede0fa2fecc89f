//! # FDI Core Domain Models
//!
//! Domain models shared by the bilateral workbook extraction pipeline.
//!
//! ## Key Models
//!
//! - **CellValue**: Typed worksheet cell (number, text or empty)
//! - **CellGrid**: Read-only view over one worksheet, implemented by readers
//! - **MemoryGrid**: In-memory worksheet used by fixtures and tests
//! - **YearHeader**: Contiguous run of year columns on a sheet's header row
//! - **Record**: One (origin, partner, year, value) observation
//! - **Dataset**: Records grouped by sheet name in extraction order

pub mod cell;
pub mod record;
pub mod dataset;


pub use cell::*;
pub use record::*;
pub use dataset::*;

//! Type definitions shared by the parser, loader and renderer.

mod cell;
mod record;

pub use cell::{CellValue, RowRecord, SheetRows};
pub(crate) use cell::format_number;
pub use record::{Dataset, Record};

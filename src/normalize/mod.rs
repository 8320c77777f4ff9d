//! Import-time normalization of spreadsheet headers and sector labels

pub mod fields;
pub mod sector;

pub use fields::{get_cell_from_row, get_field_from_row, Row, SheetCell};
pub use sector::{normalize_sector, sector_label, UNKNOWN_SECTOR};

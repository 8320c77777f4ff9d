//! Spreadsheet header matching
//!
//! Uploaded sheets name their columns inconsistently ("Facility Name",
//! "name", "facility name "). A logical field is looked up through a list of
//! accepted aliases.

use std::collections::BTreeMap;
use std::fmt;

/// A cell value as read from the sheet
///
/// Workbook cells keep their numeric type so date columns can be read as
/// serial day counts. CSV cells are always text.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Text(String),
    Number(f64),
}

impl SheetCell {
    /// The cell as text; whole numbers print without a fraction
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SheetCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for SheetCell {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for SheetCell {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for SheetCell {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

/// One spreadsheet row: column header -> cell
pub type Row = BTreeMap<String, SheetCell>;

pub const FACILITY_NAME: &[&str] = &["Facility Name", "name", "facility name"];
pub const FACILITY_SECTOR: &[&str] = &["Sector", "sector"];
pub const FACILITY_LOCATION: &[&str] = &["Location", "location"];
pub const FACILITY_DISTRICT: &[&str] = &["District", "district"];
pub const FACILITY_EXPIRY_DATE: &[&str] = &["Expiry Date", "expiry_date"];
pub const FACILITY_EFFECTIVE_DATE: &[&str] = &["Effective Date", "effective_date"];
pub const FACILITY_FILE_LOCATION: &[&str] = &["File Location ID", "file_location_id"];

pub const PAYMENT_NAME: &[&str] = &["Name", "name"];
pub const PAYMENT_SECTOR: &[&str] = &["Sector", "sector"];
pub const PAYMENT_LOCATION: &[&str] = &["Location", "location"];
pub const PAYMENT_CATEGORY: &[&str] = &["Category", "category"];
pub const PAYMENT_AMOUNT: &[&str] = &["Amount Paid", "amount_paid"];
pub const PAYMENT_DATE: &[&str] = &["Payment Date", "payment_date"];

/// Look up a logical field's cell in a row
///
/// An exact header match is tried first, in alias order, so a sheet with
/// near-duplicate headers favours the literal expected name. Otherwise each
/// alias is compared against every header ignoring case and surrounding
/// whitespace.
pub fn get_cell_from_row<'r>(row: &'r Row, aliases: &[&str]) -> Option<&'r SheetCell> {
    for alias in aliases {
        if let Some(cell) = row.get(*alias) {
            return Some(cell);
        }
    }

    for alias in aliases {
        let wanted = alias.trim().to_lowercase();
        for (header, cell) in row {
            if header.trim().to_lowercase() == wanted {
                return Some(cell);
            }
        }
    }

    None
}

/// Look up a logical field as text; a field with no matching header is an
/// empty string
pub fn get_field_from_row(row: &Row, aliases: &[&str]) -> String {
    get_cell_from_row(row, aliases)
        .map(SheetCell::text)
        .unwrap_or_default()
}

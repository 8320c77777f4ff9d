//! Export of facility and payment selections
//!
//! A selection is first laid out as an `ExportTable` (fixed headers, one row
//! per record) and then written as CSV or as an XLSX workbook. Dates that can
//! be read are written as `DD/MM/YYYY`; anything else is written as stored.

pub mod csv;
pub mod xlsx;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{PermitError, PermitResult};
use crate::lifecycle::{parse_date, serialize_date_for_export, LifecycleStatus, ParsedDate};
use crate::models::{Facility, Payment};

pub use self::csv::write_csv;
pub use self::xlsx::workbook_bytes;

pub const FACILITY_HEADERS: &[&str] = &[
    "Facility Name",
    "Sector",
    "Location",
    "District",
    "Expiry Date",
    "Effective Date",
    "File Location ID",
];

pub const PAYMENT_HEADERS: &[&str] = &[
    "Name",
    "Amount Paid",
    "Location",
    "Sector",
    "Category",
    "Payment Date",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Facilities,
    Payments,
}

impl ExportKind {
    fn sheet_name(self) -> &'static str {
        match self {
            ExportKind::Facilities => "Facilities",
            ExportKind::Payments => "Payments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            other => Err(format!("Unknown export format '{}' (expected csv or xlsx)", other)),
        }
    }
}

/// One exported cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(n) => write!(f, "{:.2}", n),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportTable {
    pub kind: ExportKind,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

impl ExportTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sheet_name(&self) -> &'static str {
        self.kind.sheet_name()
    }
}

/// Export text for a stored date
fn date_cell(stored: Option<&str>) -> Cell {
    match parse_date(stored) {
        ParsedDate::Date(date) => Cell::Text(serialize_date_for_export(date)),
        _ => Cell::Text(stored.unwrap_or_default().trim().to_string()),
    }
}

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

fn optional_text(value: Option<&str>) -> Cell {
    text(value.unwrap_or_default())
}

pub fn facility_table(facilities: &[Facility]) -> ExportTable {
    let rows = facilities
        .iter()
        .map(|f| {
            vec![
                text(&f.name),
                optional_text(f.sector.as_deref()),
                text(&f.location),
                text(&f.district),
                date_cell(f.expiry_date.as_deref()),
                date_cell(f.effective_date.as_deref()),
                text(&f.file_location_id),
            ]
        })
        .collect();

    ExportTable {
        kind: ExportKind::Facilities,
        headers: FACILITY_HEADERS,
        rows,
    }
}

pub fn payment_table(payments: &[Payment]) -> ExportTable {
    let rows = payments
        .iter()
        .map(|p| {
            vec![
                text(&p.name),
                Cell::Number(p.amount_paid.minor() as f64 / 100.0),
                text(&p.location),
                optional_text(p.sector.as_deref()),
                optional_text(p.category.as_deref()),
                date_cell(Some(p.payment_date.as_str())),
            ]
        })
        .collect();

    ExportTable {
        kind: ExportKind::Payments,
        headers: PAYMENT_HEADERS,
        rows,
    }
}

/// File name (without extension) describing an export selection
///
/// `facilities-<sector|all-sectors>-<status|all-status>` or
/// `payments-<sector|all-sectors>`. Sector names are lower-cased with
/// spaces turned into hyphens.
pub fn export_file_stem(
    kind: ExportKind,
    sector: Option<&str>,
    status: Option<LifecycleStatus>,
) -> String {
    let sector = sector
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase())
        .unwrap_or_else(|| "all-sectors".to_string());

    match kind {
        ExportKind::Facilities => {
            let status = status.map_or_else(|| "all-status".to_string(), |s| s.to_string());
            format!("facilities-{}-{}", sector, status)
        }
        ExportKind::Payments => format!("payments-{}", sector),
    }
}

/// Encode a table in the requested format
pub fn render(table: &ExportTable, format: ExportFormat) -> PermitResult<Vec<u8>> {
    if table.is_empty() {
        return Err(PermitError::Export("No data to export".into()));
    }

    match format {
        ExportFormat::Csv => {
            let mut buffer = Vec::new();
            write_csv(table, &mut buffer)?;
            Ok(buffer)
        }
        ExportFormat::Xlsx => workbook_bytes(table),
    }
}

/// Encode a table and write it to `path`
pub fn export_to_path(table: &ExportTable, format: ExportFormat, path: &Path) -> PermitResult<()> {
    let bytes = render(table, format)?;
    fs::write(path, bytes)
        .map_err(|e| PermitError::Export(format!("Failed to write {}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), rows = table.len(), %format, "export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_file_stems() {
        assert_eq!(
            export_file_stem(ExportKind::Facilities, None, None),
            "facilities-all-sectors-all-status"
        );
        assert_eq!(
            export_file_stem(
                ExportKind::Facilities,
                Some("Small Scale Mining"),
                Some(LifecycleStatus::Expiring)
            ),
            "facilities-small-scale-mining-expiring"
        );
        assert_eq!(
            export_file_stem(ExportKind::Payments, Some("HEALTH"), Some(LifecycleStatus::Valid)),
            "payments-health"
        );
        assert_eq!(
            export_file_stem(ExportKind::Payments, Some("  "), None),
            "payments-all-sectors"
        );
    }

    #[test]
    fn test_facility_rows() {
        let mut facility = Facility::new("Acme Quarry");
        facility.sector = Some("mining".into());
        facility.expiry_date = Some("2025-12-31".into());
        facility.effective_date = Some("sometime".into());

        let table = facility_table(&[facility]);
        assert_eq!(table.headers.len(), 7);
        assert_eq!(table.rows[0][4], Cell::Text("31/12/2025".into()));
        assert_eq!(table.rows[0][5], Cell::Text("sometime".into()));
        assert_eq!(table.rows[0][6], Cell::Text(String::new()));
    }

    #[test]
    fn test_payment_rows() {
        let payment = Payment::new("Acme", "Tema", Money::from_minor(125_050), "01/03/2025");
        let table = payment_table(&[payment]);
        assert_eq!(table.rows[0][1], Cell::Number(1250.5));
        assert_eq!(table.rows[0][1].to_string(), "1250.50");
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let table = facility_table(&[]);
        let err = render(&table, ExportFormat::Csv).unwrap_err();
        assert_eq!(err.to_string(), "Export error: No data to export");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}

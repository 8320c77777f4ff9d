//! Spreadsheet import service
//!
//! Bulk upload of facilities and payments from a CSV file or the first
//! worksheet of a workbook. Rows are mapped through header aliases,
//! validated, previewed, and only then committed.
//! Facilities are merged on name; payments are always inserted. Rows that
//! fail validation are never written.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::Utc;
use csv::ReaderBuilder;

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{PermitError, PermitResult};
use crate::lifecycle::{parse_date, DateInput, ParsedDate};
use crate::models::{Money, RecordScope};
use crate::normalize::fields::{
    FACILITY_DISTRICT, FACILITY_EFFECTIVE_DATE, FACILITY_EXPIRY_DATE, FACILITY_FILE_LOCATION,
    FACILITY_LOCATION, FACILITY_NAME, FACILITY_SECTOR, PAYMENT_AMOUNT, PAYMENT_CATEGORY,
    PAYMENT_DATE, PAYMENT_LOCATION, PAYMENT_NAME, PAYMENT_SECTOR,
};
use crate::normalize::{get_cell_from_row, get_field_from_row, Row, SheetCell};
use crate::storage::Storage;

use super::facility::{FacilityInput, FacilityService};
use super::payment::{PaymentInput, PaymentService};

/// A problem with one field of one sheet row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// 1-based data row (the header row is not counted)
    pub row: usize,
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(row: usize, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            row,
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {} ({})", self.row, self.message, self.field)
    }
}

/// One mapped sheet row and whatever is wrong with it
#[derive(Debug, Clone)]
pub struct ImportRow<T> {
    pub row: usize,
    pub record: T,
    pub errors: Vec<ValidationError>,
}

impl<T> ImportRow<T> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parsed and validated sheet, ready for review
#[derive(Debug, Clone)]
pub struct ImportPreview<T> {
    pub rows: Vec<ImportRow<T>>,
}

impl<T> ImportPreview<T> {
    pub fn valid_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.rows.len() - self.valid_count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.rows.iter().flat_map(|r| r.errors.iter())
    }

    fn valid_records(self) -> impl Iterator<Item = T> {
        for error in self.errors() {
            tracing::warn!(row = error.row, field = error.field, "row rejected: {}", error.message);
        }
        self.rows
            .into_iter()
            .filter(ImportRow::is_valid)
            .map(|r| r.record)
    }
}

/// Outcome of a committed import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Read a CSV sheet into header -> cell rows, dropping blank lines
pub fn read_rows<R: Read>(reader: R) -> PermitResult<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| PermitError::Import(format!("Failed to read header row: {}", e)))?
        .clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| PermitError::Import(format!("Failed to read row {}: {}", index + 1, e)))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), SheetCell::from(cell)))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Extensions read as workbooks; anything else is read as CSV
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read an upload file into rows, choosing the reader by extension
pub fn read_sheet(path: &Path) -> PermitResult<Vec<Row>> {
    let is_workbook = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WORKBOOK_EXTENSIONS.contains(&ext.to_lowercase().as_str()));

    if is_workbook {
        read_workbook_rows(path)
    } else {
        let file = File::open(path)
            .map_err(|e| PermitError::Import(format!("Failed to open {}: {}", path.display(), e)))?;
        read_rows(file)
    }
}

/// Read the first worksheet of a workbook
///
/// The first row holds the headers. Numeric and date-formatted cells stay
/// numbers so date columns can be read as serial day counts.
pub fn read_workbook_rows(path: &Path) -> PermitResult<Vec<Row>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PermitError::Import("Workbook has no worksheets".into()))??;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| workbook_cell(cell).text().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let row: Row = headers
            .iter()
            .zip(cells.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), workbook_cell(cell)))
            .collect();
        if row.values().all(|cell| cell.text().trim().is_empty()) {
            continue;
        }
        rows.push(row);
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "read workbook");
    Ok(rows)
}

fn workbook_cell(cell: &Data) -> SheetCell {
    match cell {
        Data::Int(n) => SheetCell::Number(*n as f64),
        Data::Float(n) => SheetCell::Number(*n),
        Data::DateTime(datetime) => SheetCell::Number(datetime.as_f64()),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            SheetCell::Text(text.clone())
        }
        Data::Bool(flag) => SheetCell::Text(flag.to_string()),
        Data::Error(_) | Data::Empty => SheetCell::Text(String::new()),
    }
}

/// A date column as text the record services will normalise
///
/// Numeric cells are serial day counts. A readable one becomes an ISO date,
/// which reads the same under every date order.
fn date_field(row: &Row, aliases: &[&str]) -> Option<String> {
    match get_cell_from_row(row, aliases)? {
        SheetCell::Number(days) => match parse_date(DateInput::Serial(*days)) {
            ParsedDate::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
            _ => Some(SheetCell::Number(*days).text()),
        },
        SheetCell::Text(text) => optional(text.clone()),
    }
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub struct ImportService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    pub fn preview_facilities(&self, rows: &[Row]) -> ImportPreview<FacilityInput> {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let number = index + 1;
                let record = FacilityInput {
                    name: get_field_from_row(row, FACILITY_NAME).trim().to_string(),
                    sector: optional(get_field_from_row(row, FACILITY_SECTOR)),
                    location: get_field_from_row(row, FACILITY_LOCATION),
                    district: get_field_from_row(row, FACILITY_DISTRICT),
                    expiry_date: date_field(row, FACILITY_EXPIRY_DATE),
                    effective_date: date_field(row, FACILITY_EFFECTIVE_DATE),
                    file_location_id: get_field_from_row(row, FACILITY_FILE_LOCATION),
                };

                let mut errors = Vec::new();
                if record.name.is_empty() {
                    errors.push(ValidationError::new(number, "name", "Facility name is required"));
                }

                ImportRow {
                    row: number,
                    record,
                    errors,
                }
            })
            .collect();

        ImportPreview { rows }
    }

    pub fn preview_payments(&self, rows: &[Row]) -> ImportPreview<PaymentInput> {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let number = index + 1;
                let mut errors = Vec::new();

                let name = get_field_from_row(row, PAYMENT_NAME).trim().to_string();
                if name.is_empty() {
                    errors.push(ValidationError::new(number, "name", "Name is required"));
                }

                let location = get_field_from_row(row, PAYMENT_LOCATION).trim().to_string();
                if location.is_empty() {
                    errors.push(ValidationError::new(number, "location", "Location is required"));
                }

                let amount = get_field_from_row(row, PAYMENT_AMOUNT);
                let amount_paid = match Money::parse(&amount) {
                    Ok(money) if !money.is_zero() => money,
                    _ => {
                        errors.push(ValidationError::new(
                            number,
                            "amount_paid",
                            "Valid amount is required",
                        ));
                        Money::zero()
                    }
                };

                let payment_date = date_field(row, PAYMENT_DATE).unwrap_or_default();
                if payment_date.is_empty() {
                    errors.push(ValidationError::new(
                        number,
                        "payment_date",
                        "Payment date is required",
                    ));
                }

                ImportRow {
                    row: number,
                    record: PaymentInput {
                        name,
                        location,
                        sector: optional(get_field_from_row(row, PAYMENT_SECTOR)),
                        category: optional(get_field_from_row(row, PAYMENT_CATEGORY)),
                        amount_paid,
                        payment_date,
                    },
                    errors,
                }
            })
            .collect();

        ImportPreview { rows }
    }

    /// Write valid facility rows, merging on name
    ///
    /// A merged record keeps its id, creation time and region/office.
    pub fn commit_facilities(
        &self,
        preview: ImportPreview<FacilityInput>,
        scope: &RecordScope,
    ) -> PermitResult<ImportSummary> {
        if preview.valid_count() == 0 {
            return Err(PermitError::Import("No valid data to upload".into()));
        }

        let mut summary = ImportSummary {
            skipped: preview.invalid_count(),
            ..Default::default()
        };
        let facilities = FacilityService::new(self.storage, self.settings);

        for input in preview.valid_records() {
            let mut facility = facilities.prepare(input, scope);

            match self.storage.facilities.get_by_name(&facility.name)? {
                Some(existing) => {
                    facility.id = existing.id;
                    facility.created_at = existing.created_at;
                    facility.region_id = existing.region_id;
                    facility.office_id = existing.office_id;
                    facility.updated_at = Utc::now();

                    self.storage.facilities.upsert(facility.clone())?;
                    self.storage.log_update(
                        EntityType::Facility,
                        facility.id.to_string(),
                        Some(facility.name.clone()),
                        &existing,
                        &facility,
                    )?;
                    summary.updated += 1;
                }
                None => {
                    self.storage.facilities.upsert(facility.clone())?;
                    self.storage.log_create(
                        EntityType::Facility,
                        facility.id.to_string(),
                        Some(facility.name.clone()),
                        &facility,
                    )?;
                    summary.inserted += 1;
                }
            }
        }

        self.storage.facilities.save()?;
        tracing::info!(
            inserted = summary.inserted,
            updated = summary.updated,
            skipped = summary.skipped,
            "facility import committed"
        );
        Ok(summary)
    }

    /// Insert every valid payment row
    pub fn commit_payments(
        &self,
        preview: ImportPreview<PaymentInput>,
        scope: &RecordScope,
    ) -> PermitResult<ImportSummary> {
        if preview.valid_count() == 0 {
            return Err(PermitError::Import("No valid data to upload".into()));
        }

        let mut summary = ImportSummary {
            skipped: preview.invalid_count(),
            ..Default::default()
        };
        let payments = PaymentService::new(self.storage, self.settings);

        for input in preview.valid_records() {
            let payment = payments.prepare(input, scope);
            self.storage.payments.insert(payment.clone())?;
            self.storage.log_create(
                EntityType::Payment,
                payment.id.to_string(),
                Some(payment.name.clone()),
                &payment,
            )?;
            summary.inserted += 1;
        }

        self.storage.payments.save()?;
        tracing::info!(
            inserted = summary.inserted,
            skipped = summary.skipped,
            "payment import committed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PermitPaths;
    use crate::models::RegionId;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PermitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    const FACILITY_SHEET: &str = "\
Facility Name,Sector,Location,District,Expiry Date,Effective Date,File Location ID
Acme Quarry, MINES & QUARRY ,Tema,Tema West,45292,01/01/2023,A-12
,hospitality,Cape Coast,KEEA,31/12/2025,,
,,,,,,
Sea View Hotel,Hospitality,Cape Coast,KEEA,31/12/2025,,B-3
";

    const PAYMENT_SHEET: &str = "\
name,location,sector,category,amount_paid,payment_date
Acme Quarry,Tema,Mining,Permit fee,\"1,250.50\",2025-03-01
No Location,,Mining,Permit fee,100,01/03/2025
Zero Amount,Tema,Mining,Permit fee,0,
";

    #[test]
    fn test_read_rows_skips_blank_lines() {
        let rows = read_rows(FACILITY_SHEET.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["Facility Name"], SheetCell::from("Acme Quarry"));
    }

    #[test]
    fn test_facility_preview() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ImportService::new(&storage, &settings);

        let rows = read_rows(FACILITY_SHEET.as_bytes()).unwrap();
        let preview = service.preview_facilities(&rows);

        assert_eq!(preview.valid_count(), 2);
        assert_eq!(preview.invalid_count(), 1);
        let errors: Vec<_> = preview.errors().collect();
        assert_eq!(errors[0].row, 2);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].message, "Facility name is required");
    }

    #[test]
    fn test_payment_preview_collects_every_error() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ImportService::new(&storage, &settings);

        let rows = read_rows(PAYMENT_SHEET.as_bytes()).unwrap();
        let preview = service.preview_payments(&rows);

        assert_eq!(preview.valid_count(), 1);
        assert_eq!(preview.rows[0].record.amount_paid, Money::from_minor(125_050));

        let fields: Vec<_> = preview.errors().map(|e| (e.row, e.field)).collect();
        assert_eq!(
            fields,
            [(2, "location"), (3, "amount_paid"), (3, "payment_date")]
        );
    }

    #[test]
    fn test_commit_facilities_merges_on_name() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ImportService::new(&storage, &settings);
        let region = RegionId::new();
        let scope = RecordScope::new(Some(region), None);

        let rows = read_rows(FACILITY_SHEET.as_bytes()).unwrap();
        let summary = service
            .commit_facilities(service.preview_facilities(&rows), &scope)
            .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                inserted: 2,
                updated: 0,
                skipped: 1
            }
        );

        let acme = storage.facilities.get_by_name("acme quarry").unwrap().unwrap();
        assert_eq!(acme.sector.as_deref(), Some("mines and quarry"));
        assert_eq!(acme.expiry_date.as_deref(), Some("01/01/2024"));
        assert_eq!(acme.region_id, Some(region));

        let summary = service
            .commit_facilities(service.preview_facilities(&rows), &RecordScope::all())
            .unwrap();
        assert_eq!(summary.updated, 2);
        assert_eq!(storage.facilities.count().unwrap(), 2);

        let merged = storage.facilities.get_by_name("Acme Quarry").unwrap().unwrap();
        assert_eq!(merged.id, acme.id);
        assert_eq!(merged.region_id, Some(region));
    }

    #[test]
    fn test_commit_payments_inserts_valid_rows_only() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ImportService::new(&storage, &settings);
        let changes = storage.feed().subscribe();

        let rows = read_rows(PAYMENT_SHEET.as_bytes()).unwrap();
        let summary = service
            .commit_payments(service.preview_payments(&rows), &RecordScope::all())
            .unwrap();

        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(storage.payments.count().unwrap(), 1);
        assert_eq!(changes.try_iter().count(), 1);
    }

    #[test]
    fn test_nothing_valid_is_an_error() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ImportService::new(&storage, &settings);

        let rows = read_rows("Facility Name,Sector\n,mining\n".as_bytes()).unwrap();
        let err = service
            .commit_facilities(service.preview_facilities(&rows), &RecordScope::all())
            .unwrap_err();
        assert!(matches!(err, PermitError::Import(_)));
        assert_eq!(storage.facilities.count().unwrap(), 0);
    }

    fn write_workbook(path: &Path, rows: &[&[SheetCell]]) {
        use rust_xlsxwriter::{Format, Workbook};

        let date_format = Format::new().set_num_format("dd/mm/yyyy");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, cells) in rows.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    SheetCell::Text(text) => {
                        sheet.write_string(r, c, text.as_str()).unwrap();
                    }
                    // the fourth column is date-formatted, other numbers stay plain
                    SheetCell::Number(n) if c == 3 => {
                        sheet.write_number_with_format(r, c, *n, &date_format).unwrap();
                    }
                    SheetCell::Number(n) => {
                        sheet.write_number(r, c, *n).unwrap();
                    }
                }
            }
        }
        workbook.save(path).unwrap();
    }

    fn text(s: &str) -> SheetCell {
        SheetCell::from(s)
    }

    #[test]
    fn test_workbook_import_reads_numeric_dates() {
        let (temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ImportService::new(&storage, &settings);
        let path = temp_dir.path().join("facilities.xlsx");

        write_workbook(
            &path,
            &[
                &[text("Facility Name"), text("Sector"), text("Expiry Date"), text("Effective Date")],
                &[text("Acme Quarry"), text("mining"), SheetCell::Number(45292.0), SheetCell::Number(44927.0)],
                &[text(""), text(""), text(""), text("")],
                &[text("Sea View Hotel"), text("Hospitality"), text("31/12/2025"), text("")],
            ],
        );

        let rows = read_sheet(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Expiry Date"], SheetCell::Number(45292.0));

        let summary = service
            .commit_facilities(service.preview_facilities(&rows), &RecordScope::all())
            .unwrap();
        assert_eq!(summary.inserted, 2);

        let acme = storage.facilities.get_by_name("Acme Quarry").unwrap().unwrap();
        assert_eq!(acme.expiry_date.as_deref(), Some("01/01/2024"));
        assert_eq!(acme.effective_date.as_deref(), Some("01/01/2023"));
        let hotel = storage.facilities.get_by_name("Sea View Hotel").unwrap().unwrap();
        assert_eq!(hotel.expiry_date.as_deref(), Some("31/12/2025"));
        assert_eq!(hotel.effective_date, None);
    }

    #[test]
    fn test_workbook_serial_dates_ignore_date_order() {
        let (temp_dir, storage) = create_test_storage();
        let settings = Settings {
            date_order: crate::lifecycle::DateOrder::Elimination,
            ..Settings::default()
        };
        let service = ImportService::new(&storage, &settings);
        let path = temp_dir.path().join("payments.xlsx");

        // 45323 is 1 February 2024
        write_workbook(
            &path,
            &[
                &[text("Name"), text("Location"), text("Amount Paid"), text("Payment Date")],
                &[text("Acme Quarry"), text("Tema"), SheetCell::Number(150.5), SheetCell::Number(45323.0)],
            ],
        );

        let rows = read_sheet(&path).unwrap();
        let preview = service.preview_payments(&rows);
        assert_eq!(preview.invalid_count(), 0);
        assert_eq!(preview.rows[0].record.amount_paid, Money::from_minor(15_050));

        service.commit_payments(preview, &RecordScope::all()).unwrap();
        let payments = storage.payments.get_all().unwrap();
        assert_eq!(payments[0].payment_date, "01/02/2024");
    }

    #[test]
    fn test_csv_still_read_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("facilities.csv");
        std::fs::write(&path, FACILITY_SHEET).unwrap();

        let rows = read_sheet(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["Expiry Date"], text("45292"));
    }

    #[test]
    fn test_missing_workbook_is_an_import_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_sheet(&temp_dir.path().join("absent.xlsx")).unwrap_err();
        assert!(matches!(err, PermitError::Import(_)));
    }
}

//! XLSX workbook output

use rust_xlsxwriter::{Format, Workbook};

use super::{Cell, ExportTable};
use crate::error::{PermitError, PermitResult};

/// One-sheet workbook holding the table, as bytes
pub fn workbook_bytes(table: &ExportTable) -> PermitResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(table.sheet_name())
        .map_err(|e| PermitError::Export(format!("Failed to name worksheet: {}", e)))?;

    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00");

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| {
                PermitError::Export(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(text) => worksheet.write_string(r, col, text),
                Cell::Number(n) => worksheet.write_number_with_format(r, col, *n, &money),
            }
            .map_err(|e| {
                PermitError::Export(format!("Failed to write row {} column {}: {}", r, col, e))
            })?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| PermitError::Export(format!("Failed to save workbook: {}", e)))
}

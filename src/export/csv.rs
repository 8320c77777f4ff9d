//! CSV output
//!
//! Every field is quoted, matching the sheets staff already exchange.

use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};

use super::ExportTable;
use crate::error::{PermitError, PermitResult};

pub fn write_csv<W: Write>(table: &ExportTable, writer: W) -> PermitResult<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    writer
        .write_record(table.headers)
        .map_err(|e| PermitError::Export(e.to_string()))?;

    for row in &table.rows {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(|e| PermitError::Export(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| PermitError::Export(e.to_string()))
}

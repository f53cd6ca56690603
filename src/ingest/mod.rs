//! Invoice spreadsheet ingestion.
//!
//! Reads the first sheet of an uploaded xlsx/xls/ods/csv file, skips the
//! header block and maps the fixed column layout onto `InvoiceLineItem`s.

pub mod line_items;
pub mod sheet;

use crate::error::IngestError;
use crate::models::InvoiceLineItem;

pub use line_items::{line_items_from_rows, HEADER_ROWS};
pub use sheet::{read_first_sheet, Grid};

/// Parse an uploaded invoice into line items
pub fn parse_invoice(file_name: &str, bytes: &[u8]) -> Result<Vec<InvoiceLineItem>, IngestError> {
    let rows = read_first_sheet(file_name, bytes)?;
    let items = line_items_from_rows(&rows)?;
    tracing::info!(
        "Parsed invoice {}: {} rows, {} line items",
        file_name,
        rows.len(),
        items.len()
    );
    Ok(items)
}

use crate::error::IngestError;
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::io::Cursor;

/// Spreadsheet grid: rows of cells, blank cells as `Data::Empty`
pub type Grid = Vec<Vec<Data>>;

/// Read the first sheet of an uploaded file into a grid.
/// `.csv` files go through the csv reader, everything else through calamine.
pub fn read_first_sheet(file_name: &str, bytes: &[u8]) -> Result<Grid, IngestError> {
    if is_csv(file_name) {
        read_csv(bytes)
    } else {
        read_workbook(bytes)
    }
}

fn is_csv(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn read_workbook(bytes: &[u8]) -> Result<Grid, IngestError> {
    let mut workbook: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let Some(first) = sheet_names.first() else {
        return Err(IngestError::NoSheets);
    };

    let range = workbook.worksheet_range(first)?;
    let Some((last_row, last_col)) = range.end() else {
        return Ok(Vec::new());
    };

    // Absolute positions: rows above the first used cell still count as header rows
    let grid = (0..=last_row)
        .map(|row| {
            (0..=last_col)
                .map(|col| range.get_value((row, col)).cloned().unwrap_or(Data::Empty))
                .collect()
        })
        .collect();

    Ok(grid)
}

fn read_csv(bytes: &[u8]) -> Result<Grid, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Data::Empty
                } else {
                    Data::String(field.to_string())
                }
            })
            .collect();
        grid.push(row);
    }
    Ok(grid)
}

use crate::error::IngestError;
use crate::models::InvoiceLineItem;
use calamine::Data;
use regex::Regex;
use std::sync::LazyLock;

/// Rows above the first line item (title, metadata, column headers)
pub const HEADER_ROWS: usize = 3;

// Invoice column layout
const COL_DRUG_NAME: usize = 1;
const COL_STRENGTH: usize = 2;
const COL_FORMULATION: usize = 3;
const COL_PAYER: usize = 5;
const COL_UNIT_PRICE: usize = 7;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap());

/// Turn the first sheet's rows into invoice line items.
/// Rows without a drug name are skipped.
pub fn line_items_from_rows(rows: &[Vec<Data>]) -> Result<Vec<InvoiceLineItem>, IngestError> {
    if rows.len() <= HEADER_ROWS {
        return Err(IngestError::TooFewRows(rows.len()));
    }

    let items = rows[HEADER_ROWS..]
        .iter()
        .map(|row| InvoiceLineItem {
            drug_name: cell_text(row.get(COL_DRUG_NAME)),
            unit_price: unit_price(row.get(COL_UNIT_PRICE)),
            formulation: cell_text(row.get(COL_FORMULATION)),
            strength: cell_text(row.get(COL_STRENGTH)),
            payer: cell_text(row.get(COL_PAYER)),
        })
        .filter(|item| !item.drug_name.is_empty())
        .collect();

    Ok(items)
}

/// Trimmed text of a cell; blank, zero and false cells read as empty
fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) | Some(Data::Bool(false)) => String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) if *f == 0.0 || f.is_nan() => String::new(),
        Some(Data::Int(0)) => String::new(),
        Some(Data::Float(f)) => f.to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Coerce a price cell to a non-negative amount, 0 when unparsable
fn unit_price(cell: Option<&Data>) -> f64 {
    let price = match cell {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        Some(Data::String(s)) => parse_price_text(s),
        _ => 0.0,
    };

    if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    }
}

/// `"$1,234.50"` -> 1234.5; parses the leading number and ignores trailing text
fn parse_price_text(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    LEADING_NUMBER
        .find(cleaned.trim())
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

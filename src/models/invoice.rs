use serde::{Deserialize, Serialize};

/// Invoice line item (one data row of the uploaded spreadsheet)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    pub drug_name: String,
    pub unit_price: f64,
    pub formulation: String,
    pub strength: String,
    pub payer: String,
}

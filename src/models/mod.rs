pub mod discrepancy;
pub mod invoice;
pub mod reference;

pub use discrepancy::{
    Discrepancy, DiscrepancyDetail, DiscrepancyKind, DiscrepancyReport, ReportSummary,
};
pub use invoice::InvoiceLineItem;
pub use reference::ReferenceRecord;

use crate::models::{DiscrepancyDetail, DiscrepancyReport};

const CSV_HEADER: [&str; 6] = [
    "discrepancy_type",
    "drug_name",
    "recorded_value",
    "expected_value",
    "overcharge",
    "percentage",
];

/// Render a report as CSV: one row per discrepancy, price rows first
pub fn report_to_csv(report: &DiscrepancyReport) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for d in report.iter() {
        let (recorded, expected, overcharge, percentage) = match &d.detail {
            DiscrepancyDetail::Price { recorded, expected, overcharge, percentage } => (
                recorded.to_string(),
                expected.to_string(),
                overcharge.to_string(),
                percentage.map(|p| p.to_string()).unwrap_or_default(),
            ),
            DiscrepancyDetail::Formulation { recorded, expected }
            | DiscrepancyDetail::Strength { recorded, expected }
            | DiscrepancyDetail::Payer { recorded, expected } => {
                (recorded.clone(), expected.clone(), String::new(), String::new())
            }
        };

        writer.write_record([
            d.kind().as_str(),
            d.drug_name.as_str(),
            recorded.as_str(),
            expected.as_str(),
            overcharge.as_str(),
            percentage.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

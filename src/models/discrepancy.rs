use serde::{Deserialize, Serialize};

/// Discrepancy category (`discrepancyType` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscrepancyKind {
    Price,
    Formulation,
    Strength,
    Payer,
}

impl DiscrepancyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscrepancyKind::Price => "price",
            DiscrepancyKind::Formulation => "formulation",
            DiscrepancyKind::Strength => "strength",
            DiscrepancyKind::Payer => "payer",
        }
    }
}

/// Recorded vs expected values; the variant fixes the value types.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscrepancyDetail {
    Price {
        recorded: f64,
        expected: f64,
        overcharge: f64,
        /// `None` when the expected price is zero (unbounded deviation)
        percentage: Option<f64>,
    },
    Formulation { recorded: String, expected: String },
    Strength { recorded: String, expected: String },
    Payer { recorded: String, expected: String },
}

impl DiscrepancyDetail {
    pub fn kind(&self) -> DiscrepancyKind {
        match self {
            DiscrepancyDetail::Price { .. } => DiscrepancyKind::Price,
            DiscrepancyDetail::Formulation { .. } => DiscrepancyKind::Formulation,
            DiscrepancyDetail::Strength { .. } => DiscrepancyKind::Strength,
            DiscrepancyDetail::Payer { .. } => DiscrepancyKind::Payer,
        }
    }
}

/// One detected mismatch for an invoice line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "DiscrepancyRecord", try_from = "DiscrepancyRecord")]
pub struct Discrepancy {
    pub drug_name: String,
    pub detail: DiscrepancyDetail,
}

impl Discrepancy {
    pub fn kind(&self) -> DiscrepancyKind {
        self.detail.kind()
    }

    /// Overcharge amount, price discrepancies only
    pub fn overcharge(&self) -> Option<f64> {
        match &self.detail {
            DiscrepancyDetail::Price { overcharge, .. } => Some(*overcharge),
            _ => None,
        }
    }
}

/// Flat wire form consumed by the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscrepancyRecord {
    drug_name: String,
    recorded_value: FieldValue,
    expected_value: FieldValue,
    discrepancy_type: DiscrepancyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overcharge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Amount(f64),
    Text(String),
}

impl From<Discrepancy> for DiscrepancyRecord {
    fn from(d: Discrepancy) -> Self {
        let kind = d.kind();
        let (recorded_value, expected_value, overcharge, percentage) = match d.detail {
            DiscrepancyDetail::Price { recorded, expected, overcharge, percentage } => (
                FieldValue::Amount(recorded),
                FieldValue::Amount(expected),
                Some(overcharge),
                percentage,
            ),
            DiscrepancyDetail::Formulation { recorded, expected }
            | DiscrepancyDetail::Strength { recorded, expected }
            | DiscrepancyDetail::Payer { recorded, expected } => {
                (FieldValue::Text(recorded), FieldValue::Text(expected), None, None)
            }
        };

        DiscrepancyRecord {
            drug_name: d.drug_name,
            recorded_value,
            expected_value,
            discrepancy_type: kind,
            overcharge,
            percentage,
        }
    }
}

impl TryFrom<DiscrepancyRecord> for Discrepancy {
    type Error = String;

    fn try_from(r: DiscrepancyRecord) -> Result<Self, Self::Error> {
        let detail = match (r.discrepancy_type, r.recorded_value, r.expected_value) {
            (DiscrepancyKind::Price, FieldValue::Amount(recorded), FieldValue::Amount(expected)) => {
                DiscrepancyDetail::Price {
                    recorded,
                    expected,
                    overcharge: r.overcharge.unwrap_or(recorded - expected),
                    percentage: r.percentage,
                }
            }
            (DiscrepancyKind::Formulation, FieldValue::Text(recorded), FieldValue::Text(expected)) => {
                DiscrepancyDetail::Formulation { recorded, expected }
            }
            (DiscrepancyKind::Strength, FieldValue::Text(recorded), FieldValue::Text(expected)) => {
                DiscrepancyDetail::Strength { recorded, expected }
            }
            (DiscrepancyKind::Payer, FieldValue::Text(recorded), FieldValue::Text(expected)) => {
                DiscrepancyDetail::Payer { recorded, expected }
            }
            (kind, _, _) => {
                return Err(format!(
                    "{} discrepancy for '{}' has values of the wrong type",
                    kind.as_str(),
                    r.drug_name
                ))
            }
        };

        Ok(Discrepancy { drug_name: r.drug_name, detail })
    }
}

/// Report totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_price_discrepancies: usize,
    pub total_formulation_issues: usize,
    pub total_strength_errors: usize,
    pub total_payer_mismatches: usize,
    pub total_issues: usize,
    pub total_overcharge: f64,
}

/// Full detection result, one sequence per kind in invoice order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyReport {
    pub price_discrepancies: Vec<Discrepancy>,
    pub formulation_discrepancies: Vec<Discrepancy>,
    pub strength_discrepancies: Vec<Discrepancy>,
    pub payer_discrepancies: Vec<Discrepancy>,
    pub summary: ReportSummary,
}

impl DiscrepancyReport {
    /// Assemble a report and derive its summary from the four sequences
    pub fn new(
        price_discrepancies: Vec<Discrepancy>,
        formulation_discrepancies: Vec<Discrepancy>,
        strength_discrepancies: Vec<Discrepancy>,
        payer_discrepancies: Vec<Discrepancy>,
    ) -> Self {
        let total_overcharge = price_discrepancies
            .iter()
            .filter_map(Discrepancy::overcharge)
            .sum();

        let summary = ReportSummary {
            total_price_discrepancies: price_discrepancies.len(),
            total_formulation_issues: formulation_discrepancies.len(),
            total_strength_errors: strength_discrepancies.len(),
            total_payer_mismatches: payer_discrepancies.len(),
            total_issues: price_discrepancies.len()
                + formulation_discrepancies.len()
                + strength_discrepancies.len()
                + payer_discrepancies.len(),
            total_overcharge,
        };

        Self {
            price_discrepancies,
            formulation_discrepancies,
            strength_discrepancies,
            payer_discrepancies,
            summary,
        }
    }

    /// All discrepancies: price, formulation, strength, then payer
    pub fn iter(&self) -> impl Iterator<Item = &Discrepancy> {
        self.price_discrepancies
            .iter()
            .chain(&self.formulation_discrepancies)
            .chain(&self.strength_discrepancies)
            .chain(&self.payer_discrepancies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn price(drug: &str, recorded: f64, expected: f64) -> Discrepancy {
        let overcharge = recorded - expected;
        Discrepancy {
            drug_name: drug.to_string(),
            detail: DiscrepancyDetail::Price {
                recorded,
                expected,
                overcharge,
                percentage: Some(overcharge / expected * 100.0),
            },
        }
    }

    #[test]
    fn price_discrepancy_wire_shape() {
        let d = price("Aspirin", 2.0, 1.0);
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(
            value,
            json!({
                "drugName": "Aspirin",
                "recordedValue": 2.0,
                "expectedValue": 1.0,
                "discrepancyType": "price",
                "overcharge": 1.0,
                "percentage": 100.0
            })
        );
    }

    #[test]
    fn text_discrepancy_omits_price_fields() {
        let d = Discrepancy {
            drug_name: "Ibuprofen".to_string(),
            detail: DiscrepancyDetail::Payer {
                recorded: "medicaid".to_string(),
                expected: "medicare".to_string(),
            },
        };
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(
            value,
            json!({
                "drugName": "Ibuprofen",
                "recordedValue": "medicaid",
                "expectedValue": "medicare",
                "discrepancyType": "payer"
            })
        );
    }

    #[test]
    fn unbounded_percentage_is_omitted() {
        let d = Discrepancy {
            drug_name: "Free Drug".to_string(),
            detail: DiscrepancyDetail::Price {
                recorded: 3.0,
                expected: 0.0,
                overcharge: 3.0,
                percentage: None,
            },
        };
        let value = serde_json::to_value(&d).unwrap();
        assert!(value.get("percentage").is_none());
        assert_eq!(value["overcharge"], json!(3.0));
    }

    #[test]
    fn decode_rejects_mismatched_value_types() {
        let wire = json!({
            "drugName": "Aspirin",
            "recordedValue": "Tablet",
            "expectedValue": "Capsule",
            "discrepancyType": "price"
        });
        assert!(serde_json::from_value::<Discrepancy>(wire).is_err());

        let wire = json!({
            "drugName": "Aspirin",
            "recordedValue": 1.0,
            "expectedValue": 2.0,
            "discrepancyType": "strength"
        });
        assert!(serde_json::from_value::<Discrepancy>(wire).is_err());
    }

    #[test]
    fn decodes_formulation_record() {
        let wire = json!({
            "drugName": "Aspirin",
            "recordedValue": "Capsule",
            "expectedValue": "Tablet",
            "discrepancyType": "formulation"
        });
        let d: Discrepancy = serde_json::from_value(wire).unwrap();
        assert_eq!(d.kind(), DiscrepancyKind::Formulation);
        assert_eq!(d.overcharge(), None);
    }

    #[test]
    fn summary_follows_sequences() {
        let report = DiscrepancyReport::new(
            vec![price("A", 2.0, 1.0), price("B", 5.0, 4.0)],
            vec![],
            vec![Discrepancy {
                drug_name: "C".to_string(),
                detail: DiscrepancyDetail::Strength {
                    recorded: "40 mg".to_string(),
                    expected: "20 mg".to_string(),
                },
            }],
            vec![],
        );
        assert_eq!(report.summary.total_price_discrepancies, 2);
        assert_eq!(report.summary.total_strength_errors, 1);
        assert_eq!(report.summary.total_issues, 3);
        assert_eq!(report.summary.total_overcharge, 2.0);
        assert_eq!(report.iter().count(), 3);
    }

    #[test]
    fn report_field_names() {
        let value = serde_json::to_value(DiscrepancyReport::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "priceDiscrepancies": [],
                "formulationDiscrepancies": [],
                "strengthDiscrepancies": [],
                "payerDiscrepancies": [],
                "summary": {
                    "totalPriceDiscrepancies": 0,
                    "totalFormulationIssues": 0,
                    "totalStrengthErrors": 0,
                    "totalPayerMismatches": 0,
                    "totalIssues": 0,
                    "totalOvercharge": 0.0
                }
            })
        );
    }
}

use crate::models::{
    Discrepancy, DiscrepancyDetail, DiscrepancyReport, InvoiceLineItem, ReferenceRecord,
};
use crate::service::normalize::{
    fold_drug_name, normalize_formulation, normalize_payer, normalize_strength,
};
use indexmap::IndexMap;

/// Price deviations above this percentage are flagged (strictly greater)
pub const PRICE_TOLERANCE_PERCENT: f64 = 10.0;

/// Reference records keyed by folded drug name; the first record per name wins
pub struct ReferenceIndex<'a> {
    by_name: IndexMap<String, &'a ReferenceRecord>,
}

impl<'a> ReferenceIndex<'a> {
    pub fn build(records: &'a [ReferenceRecord]) -> Self {
        let mut by_name = IndexMap::with_capacity(records.len());
        for record in records {
            by_name.entry(fold_drug_name(&record.drug_name)).or_insert(record);
        }
        Self { by_name }
    }

    pub fn find(&self, drug_name: &str) -> Option<&'a ReferenceRecord> {
        self.by_name.get(&fold_drug_name(drug_name)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Compare invoice line items against the reference catalog.
///
/// Each item is matched to the first catalog record with the same drug name
/// (ASCII case-insensitive). Unmatched items contribute nothing. Price,
/// formulation, strength and payer are checked independently, so one item
/// can appear in several sequences of the report.
pub fn detect(
    invoice_items: &[InvoiceLineItem],
    reference_records: &[ReferenceRecord],
) -> DiscrepancyReport {
    let index = ReferenceIndex::build(reference_records);

    let mut price = Vec::new();
    let mut formulation = Vec::new();
    let mut strength = Vec::new();
    let mut payer = Vec::new();
    let mut unmatched = 0usize;

    for item in invoice_items {
        let Some(reference) = index.find(&item.drug_name) else {
            unmatched += 1;
            continue;
        };

        if let Some(d) = check_price(item, reference) {
            price.push(d);
        }
        if let Some(d) = check_formulation(item, reference) {
            formulation.push(d);
        }
        if let Some(d) = check_strength(item, reference) {
            strength.push(d);
        }
        if let Some(d) = check_payer(item, reference) {
            payer.push(d);
        }
    }

    let report = DiscrepancyReport::new(price, formulation, strength, payer);

    tracing::debug!(
        invoice_items = invoice_items.len(),
        reference_names = index.len(),
        unmatched,
        total_issues = report.summary.total_issues,
        total_overcharge = report.summary.total_overcharge,
        "discrepancy detection finished"
    );

    report
}

fn check_price(item: &InvoiceLineItem, reference: &ReferenceRecord) -> Option<Discrepancy> {
    let recorded = item.unit_price;
    let expected = reference.standard_unit_price;
    let overcharge = recorded - expected;

    // Negative prices are malformed input, never a discrepancy
    if recorded < 0.0 || expected < 0.0 {
        return None;
    }

    // Zero expected price: any positive charge is flagged, with no percentage
    let percentage = if expected == 0.0 {
        if recorded > 0.0 {
            None
        } else {
            return None;
        }
    } else {
        let percent = overcharge / expected * 100.0;
        if percent.is_nan() || percent <= PRICE_TOLERANCE_PERCENT {
            return None;
        }
        Some(percent)
    };

    Some(Discrepancy {
        drug_name: item.drug_name.clone(),
        detail: DiscrepancyDetail::Price {
            recorded,
            expected,
            overcharge,
            percentage,
        },
    })
}

fn check_formulation(item: &InvoiceLineItem, reference: &ReferenceRecord) -> Option<Discrepancy> {
    if normalize_formulation(&item.formulation) == normalize_formulation(&reference.formulation) {
        return None;
    }
    Some(Discrepancy {
        drug_name: item.drug_name.clone(),
        detail: DiscrepancyDetail::Formulation {
            recorded: item.formulation.clone(),
            expected: reference.formulation.clone(),
        },
    })
}

fn check_strength(item: &InvoiceLineItem, reference: &ReferenceRecord) -> Option<Discrepancy> {
    if normalize_strength(&item.strength) == normalize_strength(&reference.strength) {
        return None;
    }
    Some(Discrepancy {
        drug_name: item.drug_name.clone(),
        detail: DiscrepancyDetail::Strength {
            recorded: item.strength.clone(),
            expected: reference.strength.clone(),
        },
    })
}

fn check_payer(item: &InvoiceLineItem, reference: &ReferenceRecord) -> Option<Discrepancy> {
    if normalize_payer(&item.payer) == normalize_payer(&reference.payer) {
        return None;
    }
    Some(Discrepancy {
        drug_name: item.drug_name.clone(),
        detail: DiscrepancyDetail::Payer {
            recorded: item.payer.clone(),
            expected: reference.payer.clone(),
        },
    })
}

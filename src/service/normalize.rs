//! Field normalization applied before invoice and reference values are compared.

use regex::Regex;
use std::sync::LazyLock;

static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*?\)").unwrap());
static UNIT_TOKENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"mg|mcg|iu|units?").unwrap());
static SLASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/+").unwrap());

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Key used to match invoice drug names against the catalog (ASCII case fold, no trimming)
pub fn fold_drug_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// `"Tablet (ER)"` -> `"tablet"`
pub fn normalize_formulation(formulation: &str) -> String {
    let without_notes = PARENTHESIZED.replace_all(formulation, "");
    strip_whitespace(&without_notes).to_lowercase()
}

/// `"20,000 IU"` -> `"20000"`, `"5mg/325mg"` -> `"5/325"`
pub fn normalize_strength(strength: &str) -> String {
    let compact = strip_whitespace(&strength.to_lowercase());
    let unitless = UNIT_TOKENS.replace_all(&compact, "");
    let digits = unitless.replace(',', "");
    SLASH_RUNS.replace_all(&digits, "/").trim().to_string()
}

/// `"Medi Care"` -> `"medicare"`
pub fn normalize_payer(payer: &str) -> String {
    strip_whitespace(payer).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formulation_drops_parenthesized_notes() {
        assert_eq!(normalize_formulation("Tablet (ER)"), "tablet");
        assert_eq!(normalize_formulation("Tablet (10mL)"), normalize_formulation("Tablet"));
        assert_eq!(normalize_formulation("Oral Solution (5mL) (cherry)"), "oralsolution");
        assert_ne!(normalize_formulation("Capsule"), normalize_formulation("Tablet"));
    }

    #[test]
    fn formulation_keeps_unbalanced_parenthesis() {
        assert_eq!(normalize_formulation("Tablet (ER"), "tablet(er");
    }

    #[test]
    fn strength_drops_units_commas_and_spaces() {
        assert_eq!(normalize_strength("20,000 IU"), "20000");
        assert_eq!(normalize_strength("20000iu"), "20000");
        assert_eq!(normalize_strength("500 mcg"), "500");
        assert_eq!(normalize_strength("10 Units"), "10");
        assert_eq!(normalize_strength("1 unit"), "1");
        assert_ne!(normalize_strength("20 mg"), normalize_strength("40 mg"));
    }

    #[test]
    fn strength_collapses_slashes() {
        assert_eq!(normalize_strength("5/325mg"), "5/325");
        assert_eq!(normalize_strength("5mg/325mg"), "5/325");
        assert_eq!(normalize_strength("5 // 325"), "5/325");
    }

    #[test]
    fn strength_keeps_other_units() {
        assert_eq!(normalize_strength("100 mg/mL"), "100/ml");
        assert_eq!(normalize_strength("0.5%"), "0.5%");
    }

    #[test]
    fn payer_ignores_spacing_and_case() {
        assert_eq!(normalize_payer("Medi Care"), "medicare");
        assert_eq!(normalize_payer(" Blue  Cross "), "bluecross");
        assert_ne!(normalize_payer("medicaid"), normalize_payer("medicare"));
    }

    #[test]
    fn drug_name_fold_keeps_whitespace() {
        assert_eq!(fold_drug_name("AsPiRiN"), "aspirin");
        assert_eq!(fold_drug_name("Aspirin "), "aspirin ");
    }
}

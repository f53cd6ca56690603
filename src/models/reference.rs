use serde::{Deserialize, Deserializer, Serialize};

/// Reference catalog record (remote drug price list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRecord {
    #[serde(deserialize_with = "numeric_id")]
    pub id: u64,
    pub drug_name: String,
    pub unit_price: f64,           // raw catalog price
    pub standard_unit_price: f64,  // expected price, used for comparison
    pub formulation: String,
    pub strength: String,
    pub payer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_notes: Option<String>,
}

/// Mock catalogs serve ids as either `1` or `"1"`
fn numeric_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

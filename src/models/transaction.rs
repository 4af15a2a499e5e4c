use serde::{Deserialize, Serialize};

/// A single ledger entry
///
/// Amounts are signed integers in minor currency units (e.g. cents), and the
/// timestamp is in seconds since the unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub amount: i64,
    pub timestamp: i64,
    /// Raw merchant category code, resolved to a label at aggregation time
    #[serde(rename = "mcc")]
    pub category_code: String,
    pub status: String,
    #[serde(rename = "owner")]
    pub owner_id: i64,
}

impl Transaction {
    /// Create a purchase with status `done`
    pub fn purchase(
        id: i64,
        owner_id: i64,
        amount: i64,
        timestamp: i64,
        category_code: impl Into<String>,
    ) -> Self {
        Self {
            id,
            tx_type: "purchase".to_string(),
            amount,
            timestamp,
            category_code: category_code.into(),
            status: "done".to_string(),
            owner_id,
        }
    }
}

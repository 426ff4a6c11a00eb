use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::utils::amount::Amount;

pub const MAX_NAME_LEN: usize = 25;
pub const MAX_CITY_LEN: usize = 15;
pub const MAX_TXID_LEN: usize = 25;

/// Placeholder transaction id for charges without a merchant reference.
pub const TXID_PLACEHOLDER: &str = "***";

/// Input fields of a static PIX charge.
///
/// Fields are stored as given; normalization (trim, truncation, the txid
/// placeholder) happens through the `clean_*` accessors at encode time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixCharge {
    pub key: String,
    pub merchant_name: String,
    pub merchant_city: String,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub txid: Option<String>,
}

impl PixCharge {
    pub fn new(key: &str, merchant_name: &str, merchant_city: &str) -> Self {
        Self {
            key: key.to_string(),
            merchant_name: merchant_name.to_string(),
            merchant_city: merchant_city.to_string(),
            amount: None,
            txid: None,
        }
    }

    /// Trimmed key, embedded verbatim; never truncated.
    pub fn clean_key(&self) -> &str {
        self.key.trim()
    }

    pub fn clean_name(&self) -> String {
        truncate(self.merchant_name.trim(), MAX_NAME_LEN, "merchant_name")
    }

    pub fn clean_city(&self) -> String {
        truncate(self.merchant_city.trim(), MAX_CITY_LEN, "merchant_city")
    }

    /// Trimmed and truncated txid, or `***` when nothing remains.
    pub fn clean_txid(&self) -> String {
        let cleaned = truncate(
            self.txid.as_deref().unwrap_or("").trim(),
            MAX_TXID_LEN,
            "txid",
        );
        if cleaned.is_empty() {
            TXID_PLACEHOLDER.to_string()
        } else {
            cleaned
        }
    }
}

fn truncate(value: &str, max_chars: usize, field: &'static str) -> String {
    if value.chars().count() > max_chars {
        warn!(field, max_chars, "field truncated");
        value.chars().take(max_chars).collect()
    } else {
        value.to_string()
    }
}

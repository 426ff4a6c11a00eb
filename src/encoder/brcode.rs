use thiserror::Error;
use tracing::debug;

use crate::encoder::crc16::crc16_ccitt;
use crate::encoder::tlv::{self, format_field};
use crate::models::charge::PixCharge;

// EMV field ids of the static BR Code layout, in emission order.
const PAYLOAD_FORMAT_INDICATOR: &str = "00";
const MERCHANT_ACCOUNT_INFO: &str = "26";
const MERCHANT_CATEGORY_CODE: &str = "52";
const TRANSACTION_CURRENCY: &str = "53";
const TRANSACTION_AMOUNT: &str = "54";
const COUNTRY_CODE: &str = "58";
const MERCHANT_NAME: &str = "59";
const MERCHANT_CITY: &str = "60";
const ADDITIONAL_DATA: &str = "62";

// Sub-fields of the composite blocks.
const ACCOUNT_GUI: &str = "00";
const ACCOUNT_KEY: &str = "01";
const ADDITIONAL_TXID: &str = "05";

/// Globally unique identifier of the PIX arrangement inside tag 26.
const PIX_GUI: &str = "BR.GOV.BCB.PIX";
/// ISO 4217 numeric code for BRL.
const CURRENCY_BRL: &str = "986";

// Fixed bytes of the tag-26 value around the key: the GUI sub-field plus
// the key sub-field header.
const ACCOUNT_OVERHEAD: usize = 22;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("pix key is empty after trimming")]
    EmptyKey,
    #[error("{field} is {len} bytes, TLV values are limited to 99")]
    FieldTooLong { field: &'static str, len: usize },
}

/// Builds the complete copy-paste payload for `charge`.
///
/// Performs no validation: a key longer than 77 bytes silently corrupts
/// the tag-26 length prefix. [`try_encode`] rejects such inputs instead.
pub fn encode(charge: &PixCharge) -> String {
    let account = format!(
        "{}{}",
        format_field(ACCOUNT_GUI, PIX_GUI),
        format_field(ACCOUNT_KEY, charge.clean_key()),
    );

    let mut payload = String::with_capacity(160);
    payload.push_str(&format_field(PAYLOAD_FORMAT_INDICATOR, "01"));
    payload.push_str(&format_field(MERCHANT_ACCOUNT_INFO, &account));
    payload.push_str(&format_field(MERCHANT_CATEGORY_CODE, "0000"));
    payload.push_str(&format_field(TRANSACTION_CURRENCY, CURRENCY_BRL));
    // Presence decides, not value: a zero amount still emits tag 54 as 0.00.
    if let Some(amount) = charge.amount {
        payload.push_str(&format_field(TRANSACTION_AMOUNT, &amount.to_string()));
    }
    payload.push_str(&format_field(COUNTRY_CODE, "BR"));
    payload.push_str(&format_field(MERCHANT_NAME, &charge.clean_name()));
    payload.push_str(&format_field(MERCHANT_CITY, &charge.clean_city()));
    payload.push_str(&format_field(
        ADDITIONAL_DATA,
        &format_field(ADDITIONAL_TXID, &charge.clean_txid()),
    ));

    // The CRC tag and its announced length are checksummed along with the
    // rest of the payload.
    payload.push_str("6304");
    let crc = crc16_ccitt(&payload);
    payload.push_str(&crc);

    debug!(len = payload.len(), %crc, "pix payload assembled");
    payload
}

/// Strict variant of [`encode`]: rejects inputs the permissive encoder
/// would turn into an unparseable stream.
pub fn try_encode(charge: &PixCharge) -> Result<String, EncodeError> {
    let key = charge.clean_key();
    if key.is_empty() {
        return Err(EncodeError::EmptyKey);
    }
    check_len("pix key", key.len())?;
    check_len("merchant account information", ACCOUNT_OVERHEAD + key.len())?;
    Ok(encode(charge))
}

fn check_len(field: &'static str, len: usize) -> Result<(), EncodeError> {
    if len > tlv::MAX_VALUE_LEN {
        Err(EncodeError::FieldTooLong { field, len })
    } else {
        Ok(())
    }
}

/// Returns true when `payload` ends in the CRC tag plus a checksum that
/// matches the rest of the string.
pub fn checksum_matches(payload: &str) -> bool {
    if payload.len() < 8 || !payload.is_char_boundary(payload.len() - 4) {
        return false;
    }
    let (data, crc) = payload.split_at(payload.len() - 4);
    data.ends_with("6304") && crc16_ccitt(data) == crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::tlv::parse_fields;
    use crate::utils::amount::Amount;

    fn charge_with(amount: Option<Amount>, txid: Option<&str>) -> PixCharge {
        let mut charge = PixCharge::new("11999998888", "Maria Silva", "Sao Paulo");
        charge.amount = amount;
        charge.txid = txid.map(str::to_string);
        charge
    }

    #[test]
    fn test_full_payload_with_amount_and_txid() {
        let charge = charge_with(Some(Amount::from_cents(2550)), Some("PED123"));
        assert_eq!(
            encode(&charge),
            "00020126330014BR.GOV.BCB.PIX011111999998888520400005303986540525.50\
             5802BR5911Maria Silva6009Sao Paulo62100506PED123630436F3"
        );
    }

    #[test]
    fn test_full_payload_with_defaults() {
        let charge = PixCharge::new("a@b.com", "Padaria Central", "Curitiba");
        assert_eq!(
            encode(&charge),
            "00020126290014BR.GOV.BCB.PIX0107a@b.com5204000053039865802BR\
             5915Padaria Central6008Curitiba62070503***63041A59"
        );
    }

    #[test]
    fn test_zero_amount_is_still_emitted() {
        let mut charge = PixCharge::new("a@b.com", "Padaria Central", "Curitiba");
        charge.amount = Some(Amount::from_cents(0));
        let payload = encode(&charge);
        assert!(payload.contains("54040.00"));
        assert!(payload.ends_with("4A12"));
    }

    #[test]
    fn test_no_amount_means_no_tag_54() {
        let payload = encode(&charge_with(None, None));
        let fields = parse_fields(&payload).unwrap();
        assert!(fields.iter().all(|f| f.id != "54"));
    }

    #[test]
    fn test_fixed_fields_appear_in_order() {
        let payload = encode(&charge_with(Some(Amount::from_cents(1000)), None));
        let mut last = 0;
        for literal in ["000201", "BR.GOV.BCB.PIX", "52040000", "5303986", "5802BR"] {
            let at = payload[last..].find(literal).expect(literal) + last;
            last = at + literal.len();
        }
    }

    #[test]
    fn test_payload_reparses_tag_by_tag() {
        let charge = charge_with(Some(Amount::from_cents(2550)), Some("PED123"));
        let payload = encode(&charge);
        let fields = parse_fields(&payload).unwrap();
        let ids: Vec<&str> = fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["00", "26", "52", "53", "54", "58", "59", "60", "62", "63"]);

        let account = parse_fields(&fields[1].value).unwrap();
        assert_eq!(account[0].value, "BR.GOV.BCB.PIX");
        assert_eq!(account[1].value, "11999998888");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let charge = charge_with(Some(Amount::from_cents(2550)), Some("PED123"));
        assert_eq!(encode(&charge), encode(&charge));
    }

    #[test]
    fn test_checksum_matches_generated_payload() {
        let payload = encode(&charge_with(None, None));
        assert!(checksum_matches(&payload));
    }

    #[test]
    fn test_checksum_rejects_tampering() {
        let mut payload = encode(&charge_with(None, None));
        payload.replace_range(10..11, "X");
        assert!(!checksum_matches(&payload));
        assert!(!checksum_matches(""));
        assert!(!checksum_matches("630400AA"));
    }

    #[test]
    fn test_try_encode_accepts_valid_charge() {
        let charge = charge_with(Some(Amount::from_cents(2550)), Some("PED123"));
        assert_eq!(try_encode(&charge).unwrap(), encode(&charge));
    }

    #[test]
    fn test_try_encode_rejects_blank_key() {
        let charge = PixCharge::new("   ", "Maria Silva", "Sao Paulo");
        assert_eq!(try_encode(&charge), Err(EncodeError::EmptyKey));
    }

    #[test]
    fn test_try_encode_rejects_key_overflowing_account_block() {
        let charge = PixCharge::new(&"k".repeat(80), "Maria Silva", "Sao Paulo");
        assert_eq!(
            try_encode(&charge),
            Err(EncodeError::FieldTooLong {
                field: "merchant account information",
                len: 102,
            })
        );
    }

    #[test]
    fn test_try_encode_rejects_oversized_key() {
        let charge = PixCharge::new(&"k".repeat(120), "Maria Silva", "Sao Paulo");
        assert_eq!(
            try_encode(&charge),
            Err(EncodeError::FieldTooLong { field: "pix key", len: 120 })
        );
    }
}

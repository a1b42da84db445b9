//! Stable transaction identity
//!
//! Every raw record gets one id: the source-native FITID when the bank
//! provides one, otherwise a deterministic digest over the fields that
//! identify the movement. The fallback must be stable across runs, platforms,
//! and locales because it is the dedup key for re-imports.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::models::RawRecord;

/// Prefix marking a locally derived (non-bank-issued) identity
const FALLBACK_TAG: &str = "TLY-";

/// Read a raw field as trimmed text. Empty and non-text values are treated
/// as absent; numbers are rendered so ids survive parsers that emit either.
pub(crate) fn text_field(raw: &RawRecord, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a raw field as a signed decimal number, accepting either a JSON
/// number or a numeric string.
pub(crate) fn number_field(raw: &RawRecord, key: &str) -> Option<f64> {
    match raw.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Assign the stable identity for a raw record.
///
/// FITID is used verbatim when present. The fallback digest is pure: no I/O,
/// no randomness, no clock.
pub fn assign_id(raw: &RawRecord) -> String {
    if let Some(fitid) = text_field(raw, "fitid") {
        return fitid;
    }

    let posted_date = text_field(raw, "posted_date");
    let amount = number_field(raw, "amount").unwrap_or(0.0);
    let name = text_field(raw, "name");
    let memo = text_field(raw, "memo");
    let checknum = text_field(raw, "checknum");

    fallback_id(
        posted_date.as_deref(),
        amount,
        name.as_deref(),
        memo.as_deref(),
        checknum.as_deref(),
    )
}

/// Deterministic fallback id when FITID is missing.
///
/// The basis string pins numeric formatting to two decimals and upper-cases
/// the free-text fields so the digest does not depend on locale or source
/// casing quirks.
pub fn fallback_id(
    posted_date: Option<&str>,
    amount: f64,
    name: Option<&str>,
    memo: Option<&str>,
    checknum: Option<&str>,
) -> String {
    let basis = [
        posted_date.unwrap_or("").to_string(),
        format!("{:.2}", amount),
        name.unwrap_or("").to_uppercase(),
        memo.unwrap_or("").to_uppercase(),
        checknum.unwrap_or("").to_string(),
    ]
    .join("|");

    let digest = Sha256::digest(basis.as_bytes());
    format!("{}{}", FALLBACK_TAG, &hex::encode(digest)[..16])
}

//! Raw record → canonical transaction
//!
//! The normalizer is the validation boundary: malformed dates and amounts are
//! rejected here with `Error::Validation` so the identity assigner and the
//! rule pipeline only ever see well-formed input. It is a pure function; the
//! original field values survive untouched in `Transaction::raw`.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::identity::{self, number_field, text_field};
use crate::models::{Direction, RawRecord, Transaction};

/// Unescape entity-encoded text from the source export, so e.g. an
/// `AT&amp;T` vendor name matches rules written against `AT&T`.
/// Covers the predefined markup entities plus the two numeric apostrophe and
/// nbsp forms that show up in bank feeds.
pub fn unescape_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Trim, unescape, and empty-to-absent a free-text source field
fn clean_text(raw: &RawRecord, key: &str) -> Option<String> {
    let value = text_field(raw, key)?;
    let cleaned = unescape_entities(&value);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Build a canonical `Transaction` from a raw export record.
///
/// Fails with `Error::Validation` when `posted_date` is missing or not a real
/// `YYYY-MM-DD` calendar date, or when `amount` is missing or unparseable.
/// The record is rejected, never coerced to a default.
pub fn normalize(raw: &RawRecord, source_file: Option<&str>) -> Result<Transaction> {
    let posted_date = text_field(raw, "posted_date")
        .ok_or_else(|| Error::Validation("missing posted_date".to_string()))?;
    NaiveDate::parse_from_str(&posted_date, "%Y-%m-%d")
        .map_err(|e| Error::Validation(format!("invalid posted_date '{}': {}", posted_date, e)))?;

    let amount = number_field(raw, "amount").ok_or_else(|| {
        Error::Validation(format!(
            "invalid amount '{}'",
            raw.get("amount").map(|v| v.to_string()).unwrap_or_default()
        ))
    })?;

    // Identity reads the raw fields directly; entity unescaping is for rule
    // matching only and must not shift the dedup key.
    let id = identity::assign_id(raw);

    Ok(Transaction {
        id,
        posted_date,
        amount,
        direction: Direction::from_amount(amount),
        name: clean_text(raw, "name"),
        memo: clean_text(raw, "memo"),
        kind: clean_text(raw, "type"),
        checknum: clean_text(raw, "checknum"),
        source_file: source_file.map(|s| s.to_string()),
        raw: raw.clone(),
        tags: Vec::new(),
        notes: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(fields: serde_json::Value) -> RawRecord {
        fields.as_object().unwrap().clone()
    }

    #[test]
    fn test_normalize_basic_debit() {
        let r = raw(json!({
            "posted_date": "2024-07-01",
            "amount": -42.19,
            "name": "DEBIT CARD PURCHASE",
            "memo": "HOME DEPOT 1234",
            "fitid": "ABC123",
        }));
        let tx = normalize(&r, Some("july.qfx")).unwrap();
        assert_eq!(tx.id, "ABC123");
        assert_eq!(tx.direction, Direction::Debit);
        assert_eq!(tx.name.as_deref(), Some("DEBIT CARD PURCHASE"));
        assert_eq!(tx.source_file.as_deref(), Some("july.qfx"));
        // raw is preserved verbatim
        assert_eq!(tx.raw.get("memo").unwrap(), "HOME DEPOT 1234");
    }

    #[test]
    fn test_missing_date_rejected() {
        let r = raw(json!({ "amount": 1.0 }));
        assert!(matches!(
            normalize(&r, None),
            Err(Error::Validation(msg)) if msg.contains("posted_date")
        ));
    }

    #[test]
    fn test_non_calendar_date_rejected() {
        // Right shape, not a real date
        let r = raw(json!({ "posted_date": "2024-02-30", "amount": 1.0 }));
        assert!(normalize(&r, None).is_err());
    }

    #[test]
    fn test_bad_amount_rejected() {
        let r = raw(json!({ "posted_date": "2024-07-01", "amount": "12,50" }));
        assert!(matches!(normalize(&r, None), Err(Error::Validation(_))));
    }

    #[test]
    fn test_amount_as_numeric_string() {
        let r = raw(json!({ "posted_date": "2024-07-01", "amount": "1200.00", "name": "RENT" }));
        let tx = normalize(&r, None).unwrap();
        assert_eq!(tx.amount, 1200.00);
        assert_eq!(tx.direction, Direction::Credit);
    }

    #[test]
    fn test_entities_unescaped_but_raw_untouched() {
        let r = raw(json!({
            "posted_date": "2024-07-01",
            "amount": -89.99,
            "name": "  AT&amp;T PAYMENT  ",
        }));
        let tx = normalize(&r, None).unwrap();
        assert_eq!(tx.name.as_deref(), Some("AT&T PAYMENT"));
        assert_eq!(tx.raw.get("name").unwrap(), "  AT&amp;T PAYMENT  ");
    }

    #[test]
    fn test_empty_optional_fields_become_absent() {
        let r = raw(json!({
            "posted_date": "2024-07-01",
            "amount": -5.0,
            "name": "",
            "memo": "   ",
        }));
        let tx = normalize(&r, None).unwrap();
        assert_eq!(tx.name, None);
        assert_eq!(tx.memo, None);
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_entities("AT&amp;T"), "AT&T");
        assert_eq!(unescape_entities("&lt;&gt;"), "<>");
        assert_eq!(unescape_entities("O&#39;BRIEN"), "O'BRIEN");
        assert_eq!(unescape_entities("no entities"), "no entities");
    }
}

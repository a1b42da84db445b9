//! QFX statement ingest
//!
//! QFX is SGML-ish: tags are rarely closed, values run to the next tag or
//! end of line. The reader stays close to the original fields for
//! traceability; validation happens in the normalizer, per record, so one
//! bad row never poisons a batch unless the caller asks for strict mode.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{RawRecord, Transaction};
use crate::normalize;

/// One record rejected during ingest, with the specific reason
#[derive(Debug, Clone)]
pub struct RejectedRecord {
    /// Zero-based position within the source file
    pub index: usize,
    pub reason: String,
}

/// Result of ingesting one export file
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<RejectedRecord>,
}

/// Parse QFX text into raw field maps, one per `<STMTTRN>` block.
///
/// Field values are preserved as found; the only derivations are
/// `posted_date` (from DTPOSTED) and a numeric `amount` when TRNAMT parses.
/// An unparseable TRNAMT is kept as its original string so the normalizer
/// rejects the record instead of coercing it to zero.
pub fn parse_qfx_to_raw<R: Read>(mut reader: R) -> Result<Vec<RawRecord>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = String::from_utf8_lossy(&bytes);

    let block_re = Regex::new(r"(?s)<STMTTRN>(.*?)</STMTTRN>")?;
    // Values run to the next tag or end of line (QFX tags are unclosed)
    let tag_re = |tag: &str| Regex::new(&format!(r"<{}>([^<\r\n]*)", tag));
    let type_re = tag_re("TRNTYPE")?;
    let posted_re = tag_re("DTPOSTED")?;
    let amount_re = tag_re("TRNAMT")?;
    let fitid_re = tag_re("FITID")?;
    let checknum_re = tag_re("CHECKNUM")?;
    let name_re = tag_re("NAME")?;
    let memo_re = tag_re("MEMO")?;

    let extract = |re: &Regex, block: &str| -> Option<String> {
        re.captures(block)
            .map(|c| c[1].trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let mut raw_txs = Vec::new();
    for block in block_re.captures_iter(&text) {
        let block = &block[1];

        let posted_raw = extract(&posted_re, block);
        let amount_raw = extract(&amount_re, block);

        let mut raw = RawRecord::new();
        let mut put = |key: &str, value: Option<String>| {
            raw.insert(
                key.to_string(),
                value.map(Value::String).unwrap_or(Value::Null),
            );
        };

        put("type", extract(&type_re, block));
        put("posted_raw", posted_raw.clone());
        put("posted_date", normalize_qfx_date(posted_raw.as_deref()));
        put("fitid", extract(&fitid_re, block));
        put("checknum", extract(&checknum_re, block));
        put("name", extract(&name_re, block));
        put("memo", extract(&memo_re, block));

        let amount_value = match amount_raw {
            Some(s) => match s.parse::<f64>() {
                Ok(n) => serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .unwrap_or(Value::String(s)),
                Err(_) => Value::String(s),
            },
            None => Value::Null,
        };
        raw.insert("amount".to_string(), amount_value);

        raw_txs.push(raw);
    }

    debug!("Parsed {} QFX statement blocks", raw_txs.len());
    Ok(raw_txs)
}

/// Convert a QFX DTPOSTED like `20240701120000.000[-5:EST]` to `2024-07-01`
fn normalize_qfx_date(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() < 8 {
        return None;
    }
    NaiveDate::parse_from_str(&digits[..8], "%Y%m%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Normalize a batch of raw records into canonical transactions.
///
/// In lenient mode a record that fails validation is skipped and recorded
/// with its reason; in strict mode the first failure aborts the batch.
pub fn ingest_records(
    raws: &[RawRecord],
    source_file: Option<&str>,
    strict: bool,
) -> Result<IngestOutcome> {
    let mut outcome = IngestOutcome::default();

    for (index, raw) in raws.iter().enumerate() {
        match normalize::normalize(raw, source_file) {
            Ok(tx) => outcome.transactions.push(tx),
            Err(Error::Validation(reason)) if !strict => {
                warn!("Skipping record {}: {}", index, reason);
                outcome.rejected.push(RejectedRecord { index, reason });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(outcome)
}

/// Read a QFX file into canonical transactions
pub fn ingest_qfx(path: &Path, strict: bool) -> Result<IngestOutcome> {
    let file = fs::File::open(path)?;
    let raws = parse_qfx_to_raw(file)?;
    ingest_records(&raws, path.to_str(), strict)
}

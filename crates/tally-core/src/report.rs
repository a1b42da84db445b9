//! Month summary reporting

use std::collections::HashMap;

use crate::models::Transaction;

/// Credit/debit totals for one slice of transactions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub count: usize,
    pub credits_count: usize,
    pub debits_count: usize,
    pub credits_total: f64,
    pub debits_total: f64,
    pub net_total: f64,
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn summarize(txs: &[Transaction]) -> Summary {
    let mut s = Summary::default();

    for tx in txs {
        s.count += 1;
        if tx.amount > 0.0 {
            s.credits_total += tx.amount;
            s.credits_count += 1;
        } else {
            // negative by convention
            s.debits_total += tx.amount;
            s.debits_count += 1;
        }
    }

    s.credits_total = round_cents(s.credits_total);
    s.debits_total = round_cents(s.debits_total);
    s.net_total = round_cents(s.credits_total + s.debits_total);
    s
}

/// Display key for spend aggregation: memo, else name, else "Unknown"
fn vendor_key(tx: &Transaction) -> String {
    tx.memo
        .as_deref()
        .or(tx.name.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

fn rank(totals: HashMap<String, f64>, n: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(k, v)| (k, round_cents(v)))
        .collect();
    // Stable output: break total ties by name
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

/// Top-N spend totals across debit transactions, keyed by memo-or-name
pub fn top_spend_vendors(txs: &[Transaction], n: usize) -> Vec<(String, f64)> {
    let mut totals: HashMap<String, f64> = HashMap::new();

    for tx in txs {
        if tx.amount >= 0.0 {
            continue;
        }
        *totals.entry(vendor_key(tx)).or_default() += tx.amount.abs();
    }

    rank(totals, n)
}

/// Coarse spend bucket a debit falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpendKind {
    Check,
    Transfer,
    OtherDebit,
}

impl SpendKind {
    pub const ALL: [SpendKind; 3] = [Self::Check, Self::Transfer, Self::OtherDebit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Check => "CHECK",
            Self::Transfer => "TRANSFER",
            Self::OtherDebit => "OTHER_DEBIT",
        }
    }
}

impl std::fmt::Display for SpendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bucket one transaction by what kind of spend it looks like.
/// Check signals outrank transfer signals.
pub fn spend_kind(tx: &Transaction) -> SpendKind {
    let kind = tx.kind.as_deref().unwrap_or("").to_uppercase();
    let name = tx.name.as_deref().unwrap_or("").to_uppercase();
    let memo = tx.memo.as_deref().unwrap_or("").to_uppercase();

    if tx.checknum.is_some() || kind == "CHECK" || name.contains("CHECK") {
        return SpendKind::Check;
    }
    if name.contains("TRANSFER") || memo.contains("TRANSFER") || kind == "XFER" || kind == "TRANSFER" {
        return SpendKind::Transfer;
    }
    SpendKind::OtherDebit
}

/// Top-N spend per kind bucket, in `SpendKind::ALL` order. Buckets with no
/// debits come back empty rather than missing.
pub fn top_spend_by_kind(txs: &[Transaction], n: usize) -> Vec<(SpendKind, Vec<(String, f64)>)> {
    let mut checks: HashMap<String, f64> = HashMap::new();
    let mut transfers: HashMap<String, f64> = HashMap::new();
    let mut other: HashMap<String, f64> = HashMap::new();

    for tx in txs {
        if tx.amount >= 0.0 {
            continue;
        }
        let totals = match spend_kind(tx) {
            SpendKind::Check => &mut checks,
            SpendKind::Transfer => &mut transfers,
            SpendKind::OtherDebit => &mut other,
        };
        *totals.entry(vendor_key(tx)).or_default() += tx.amount.abs();
    }

    vec![
        (SpendKind::Check, rank(checks, n)),
        (SpendKind::Transfer, rank(transfers, n)),
        (SpendKind::OtherDebit, rank(other, n)),
    ]
}

/// Transactions that look like checks, in input order
pub fn detect_checks(txs: &[Transaction]) -> Vec<&Transaction> {
    txs.iter().filter(|tx| spend_kind(tx) == SpendKind::Check).collect()
}

//! Review queue workflow
//!
//! Low-confidence or policy-flagged transactions are queued for human triage
//! in month-keyed JSONL files. The cardinal rule: re-importing a batch may
//! refresh what an item displays, but never what a human decided.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::config::RuleConfig;
use crate::error::Result;
use crate::models::{ReviewItem, ReviewStatus, Transaction};

/// Why a transaction was routed to review.
///
/// This is the single authoritative routing check; the import pipeline and
/// the month report both call it rather than keeping separate copies of the
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewReason {
    /// |amount| at or above the configured threshold with no memo
    LargeAmountMissingMemo,
    /// Display name absent or a generic placeholder (POS, ONLINE, ...)
    GenericOrMissingName,
}

impl ReviewReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LargeAmountMissingMemo => "large amount, missing memo",
            Self::GenericOrMissingName => "generic or missing name",
        }
    }
}

impl std::fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evaluate every review-routing policy against one transaction.
///
/// All matching reasons are returned in policy order; callers that only
/// record one take the first.
pub fn review_reasons(tx: &Transaction, cfg: &RuleConfig) -> Vec<ReviewReason> {
    let mut reasons = Vec::new();

    let memo_empty = tx.memo.as_deref().map_or(true, |m| m.trim().is_empty());
    if tx.amount.abs() >= cfg.review_amount_threshold && memo_empty {
        reasons.push(ReviewReason::LargeAmountMissingMemo);
    }

    let name = tx.name.as_deref().unwrap_or("").trim().to_uppercase();
    if name.is_empty() || cfg.placeholder_names.iter().any(|p| p.to_uppercase() == name) {
        reasons.push(ReviewReason::GenericOrMissingName);
    }

    reasons
}

/// Build the display snapshot a queue item is created or refreshed from
pub fn snapshot(tx: &Transaction, reason: Option<ReviewReason>) -> ReviewItem {
    ReviewItem {
        id: tx.id.clone(),
        status: ReviewStatus::Open,
        category: None,
        vendor: None,
        note: None,
        posted_date: tx.posted_date.clone(),
        amount: tx.amount,
        name: tx.name.clone(),
        memo: tx.memo.clone(),
        reason: reason.map(|r| r.as_str().to_string()),
    }
}

/// Insert or refresh a queue item.
///
/// A fresh item starts `Open`. An existing item gets its display fields
/// refreshed from the snapshot while `status` and any non-null human-entered
/// `category`/`vendor`/`note` survive - human decisions win over
/// re-derivation, and terminal states never silently reopen.
pub fn upsert(items: &mut BTreeMap<String, ReviewItem>, base: ReviewItem) {
    match items.get_mut(&base.id) {
        Some(existing) => {
            existing.posted_date = base.posted_date;
            existing.amount = base.amount;
            existing.name = base.name;
            existing.memo = base.memo;
            existing.reason = base.reason.or(existing.reason.take());
        }
        None => {
            items.insert(base.id.clone(), base);
        }
    }
}

/// The triage cursor: lowest-id open item, stable across calls on an
/// unmodified queue.
pub fn find_next_open(items: &BTreeMap<String, ReviewItem>) -> Option<&ReviewItem> {
    items.values().find(|item| item.status == ReviewStatus::Open)
}

/// Month-keyed JSONL persistence for review items.
///
/// Files are rewritten in full on save, one JSON object per line, sorted
/// ascending by id, UTF-8, trailing newline when non-empty.
pub struct ReviewStore {
    dir: PathBuf,
}

impl ReviewStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for_month(&self, ym: &str) -> PathBuf {
        self.dir.join(format!("review_{}.jsonl", ym))
    }

    /// Load a month's items, keyed by id. A missing file is an empty queue.
    pub fn load(&self, ym: &str) -> Result<BTreeMap<String, ReviewItem>> {
        let path = self.path_for_month(ym);
        let mut items = BTreeMap::new();
        if !path.exists() {
            return Ok(items);
        }

        for line in fs::read_to_string(&path)?.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let item: ReviewItem = serde_json::from_str(line)?;
            if !item.id.is_empty() {
                items.insert(item.id.clone(), item);
            }
        }
        debug!("Loaded {} review items from {}", items.len(), path.display());
        Ok(items)
    }

    /// Rewrite a month's file from the in-memory queue
    pub fn save(&self, ym: &str, items: &BTreeMap<String, ReviewItem>) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let mut out = String::new();
        for item in items.values() {
            out.push_str(&serde_json::to_string(item)?);
            out.push('\n');
        }

        let path = self.path_for_month(ym);
        fs::write(&path, out)?;
        debug!("Saved {} review items to {}", items.len(), path.display());
        Ok(())
    }
}

/// Route one transaction: queue it (or refresh its existing item) when any
/// review policy matches. Returns the recorded reason, if any.
pub fn route(
    items: &mut BTreeMap<String, ReviewItem>,
    tx: &Transaction,
    cfg: &RuleConfig,
) -> Option<ReviewReason> {
    let reasons = review_reasons(tx, cfg);
    let first = *reasons.first()?;
    upsert(items, snapshot(tx, Some(first)));
    Some(first)
}

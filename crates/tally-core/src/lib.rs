//! Tally core library
//!
//! Shared functionality for the tally transaction ledger:
//! - Stable transaction identity and cross-import deduplication
//! - Raw-record normalization and validation
//! - Ordered rule-based classification
//! - Human review queue with month-keyed JSONL persistence
//! - SQLite storage adapter
//! - QFX statement ingest

pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod report;
pub mod review;

pub use classify::{classify, Rule, PIPELINE};
pub use config::{RuleConfig, VendorRule};
pub use db::{Database, Store, UpsertStats};
pub use error::{Error, Result};
pub use identity::{assign_id, fallback_id};
pub use ingest::{ingest_qfx, IngestOutcome, RejectedRecord};
pub use models::{
    Classification, Confidence, Direction, RawRecord, ReviewItem, ReviewStatus, Transaction,
};
pub use normalize::normalize;
pub use report::{
    detect_checks, spend_kind, summarize, top_spend_by_kind, top_spend_vendors, SpendKind, Summary,
};
pub use review::{find_next_open, review_reasons, ReviewReason, ReviewStore};

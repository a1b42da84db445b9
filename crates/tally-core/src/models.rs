//! Domain models for tally

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw field map produced by an export parser, preserved verbatim on the
/// canonical record for traceability.
pub type RawRecord = Map<String, Value>;

/// Direction of money movement, derived from the sign of the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    /// Derive direction from a signed amount. Zero is a debit.
    pub fn from_amount(amount: f64) -> Self {
        if amount > 0.0 {
            Self::Credit
        } else {
            Self::Debit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical transaction record
///
/// Conventions:
/// - amount: positive = credit, negative = debit
/// - direction: redundant on purpose; helps rules and humans
/// - id: source-native FITID if available, else stable deterministic fallback
/// - raw: preserves original parsed fields for debugging and traceability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Calendar date, YYYY-MM-DD
    pub posted_date: String,
    pub amount: f64,
    pub direction: Direction,

    pub name: Option<String>,
    pub memo: Option<String>,
    /// Source transaction type (QFX TRNTYPE)
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub checknum: Option<String>,

    /// File the import batch came from
    pub source_file: Option<String>,
    #[serde(default)]
    pub raw: RawRecord,

    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

impl Transaction {
    /// YYYY-MM prefix of the posted date
    pub fn year_month(&self) -> &str {
        &self.posted_date[..self.posted_date.len().min(7)]
    }
}

/// Rule author certainty: `Hard` rules are definitive, `Guess` rules are
/// heuristic and subject to human override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Hard,
    Guess,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Guess => "guess",
        }
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hard" => Ok(Self::Hard),
            "guess" => Ok(Self::Guess),
            _ => Err(format!("Unknown confidence: {}", s)),
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of running the rule pipeline over one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Option<String>,
    pub confidence: Confidence,
    pub note: Option<String>,
}

/// Review workflow state. Terminal states only change via explicit human
/// action, never by re-import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Open,
    Resolved,
    Dismissed,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "resolved" => Ok(Self::Resolved),
            "dismissed" => Ok(Self::Dismissed),
            _ => Err(format!("Unknown review status: {}", s)),
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One queued human-triage record, keyed by the same identity as its
/// transaction. Display fields are a snapshot so the queue renders without
/// a join back to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: String,
    #[serde(default)]
    pub status: ReviewStatus,

    // Human-entered overrides; preserved across re-derivation
    pub category: Option<String>,
    pub vendor: Option<String>,
    pub note: Option<String>,

    // Display snapshot of the underlying transaction
    pub posted_date: String,
    pub amount: f64,
    pub name: Option<String>,
    pub memo: Option<String>,

    /// First routing reason recorded when the item was queued
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_amount() {
        assert_eq!(Direction::from_amount(12.5), Direction::Credit);
        assert_eq!(Direction::from_amount(-42.19), Direction::Debit);
        // Zero is a debit by convention
        assert_eq!(Direction::from_amount(0.0), Direction::Debit);
    }

    #[test]
    fn test_year_month() {
        let tx = Transaction {
            id: "T1".to_string(),
            posted_date: "2024-07-01".to_string(),
            amount: -5.0,
            direction: Direction::Debit,
            name: None,
            memo: None,
            kind: None,
            checknum: None,
            source_file: None,
            raw: RawRecord::new(),
            tags: Vec::new(),
            notes: None,
        };
        assert_eq!(tx.year_month(), "2024-07");
    }

    #[test]
    fn test_review_status_round_trip() {
        for s in ["open", "resolved", "dismissed"] {
            let status: ReviewStatus = s.parse().unwrap();
            assert_eq!(status.as_str(), s);
        }
        assert!("reopened".parse::<ReviewStatus>().is_err());
    }

    #[test]
    fn test_transaction_serde_uses_type_key() {
        let tx = Transaction {
            id: "T1".to_string(),
            posted_date: "2024-07-01".to_string(),
            amount: -5.0,
            direction: Direction::Debit,
            name: Some("COFFEE".to_string()),
            memo: None,
            kind: Some("DEBIT".to_string()),
            checknum: None,
            source_file: None,
            raw: RawRecord::new(),
            tags: Vec::new(),
            notes: None,
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "DEBIT");
        assert_eq!(json["direction"], "debit");
    }
}

//! Rule configuration
//!
//! Configuration is an explicitly constructed, immutable value handed to the
//! classifier and review routing at call time. Compiled-in defaults always
//! work; a JSON override file can replace any field. A malformed override is
//! a warning, never a startup failure.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Confidence;

/// One configured substring-match-to-category mapping.
/// Evaluation order is the configured order; rules are never re-sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorRule {
    /// Case-insensitive substring matched against the cleaned display name
    pub needle: String,
    pub category: String,
    pub confidence: Confidence,
    #[serde(default)]
    pub note: Option<String>,
}

impl VendorRule {
    fn new(needle: &str, category: &str, confidence: Confidence, note: Option<&str>) -> Self {
        Self {
            needle: needle.to_string(),
            category: category.to_string(),
            confidence,
            note: note.map(|s| s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Treat every credit as rental income (single-property landlord mode)
    pub assume_all_income_is_rental: bool,
    /// |amount| at or above this with no memo routes to review
    pub review_amount_threshold: f64,
    /// Peer-payment service markers; credits naming one are never
    /// auto-classified as income
    pub payment_app_markers: Vec<String>,
    /// Generic display names that route to review on their own
    pub placeholder_names: Vec<String>,
    /// Ordered vendor rules, first match wins
    pub vendor_rules: Vec<VendorRule>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        use Confidence::{Guess, Hard};
        Self {
            assume_all_income_is_rental: true,
            review_amount_threshold: 500.0,
            payment_app_markers: [
                "CASH APP",
                "VENMO",
                "PAYPAL",
                "ZELLE",
                "APPLE CASH",
                "META PAY",
            ]
            .map(String::from)
            .to_vec(),
            placeholder_names: ["POS", "ONLINE", "PAYMENT"].map(String::from).to_vec(),
            vendor_rules: vec![
                VendorRule::new("AMERICAN EXPRESS", "Credit Card Payment", Hard, None),
                VendorRule::new("AMEX", "Credit Card Payment", Hard, None),
                VendorRule::new("CITI", "Credit Card Payment", Hard, None),
                VendorRule::new("CITIBANK", "Credit Card Payment", Hard, None),
                VendorRule::new("AT&T", "Phone Expense", Hard, None),
                VendorRule::new(
                    "HOME DEPOT",
                    "Credit Card Payment",
                    Guess,
                    Some("verify if always CC payment"),
                ),
                VendorRule::new("TRANSFER TO CASH APP", "Personal Transfer", Guess, None),
                VendorRule::new("TRANSFER FROM CASH APP", "Rental Income", Guess, None),
                VendorRule::new("TRANSFER TO", "Personal Transfer", Guess, None),
            ],
        }
    }
}

impl RuleConfig {
    /// Load the config, overriding defaults from a JSON file when present.
    ///
    /// Never fails: a missing file means defaults, a malformed file logs a
    /// warning and means defaults.
    pub fn load(override_path: &Path) -> Self {
        if !override_path.exists() {
            debug!("No rule config override at {}", override_path.display());
            return Self::default();
        }

        match fs::read_to_string(override_path) {
            Ok(content) => match serde_json::from_str::<Self>(&content) {
                Ok(cfg) => {
                    debug!("Loaded rule config from {}", override_path.display());
                    cfg
                }
                Err(e) => {
                    warn!(
                        "Could not parse rule config {}: {} - using defaults",
                        override_path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!(
                    "Could not read rule config {}: {} - using defaults",
                    override_path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = RuleConfig::default();
        assert!(cfg.assume_all_income_is_rental);
        assert_eq!(cfg.review_amount_threshold, 500.0);
        assert_eq!(cfg.vendor_rules[0].needle, "AMERICAN EXPRESS");
        // Rule order is load-bearing: the broad TRANSFER TO rule comes last
        assert_eq!(cfg.vendor_rules.last().unwrap().needle, "TRANSFER TO");
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{ "assume_all_income_is_rental": false, "review_amount_threshold": 250 }"#;
        let cfg: RuleConfig = serde_json::from_str(json).unwrap();
        assert!(!cfg.assume_all_income_is_rental);
        assert_eq!(cfg.review_amount_threshold, 250.0);
        // Unmentioned fields keep defaults
        assert!(!cfg.vendor_rules.is_empty());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let cfg = RuleConfig::load(Path::new("/nonexistent/rules.json"));
        assert_eq!(cfg.review_amount_threshold, 500.0);
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "{ not json").unwrap();
        let cfg = RuleConfig::load(&path);
        assert!(cfg.assume_all_income_is_rental);
    }
}

//! Rule-based classification engine
//!
//! The engine is a fixed-order pipeline of rule cases; the first case that
//! produces a result wins. Precedence lives in `PIPELINE`, not inside the
//! cases, so each case stays testable in isolation. `classify` is pure and
//! total: given a well-formed transaction it always returns a result, and
//! the same input always returns the same output.

use crate::config::RuleConfig;
use crate::models::{Classification, Confidence, Direction, Transaction};

/// One case of the classification pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Credits naming a peer-payment service are never auto-classified.
    /// Outranks the income default: a payment-app inflow is not reliably
    /// rental or ordinary income.
    PaymentAppGuard,
    /// Config toggle: treat every remaining credit as rental income
    IncomeDefault,
    /// Ordered substring rules from the config, first hit wins
    VendorSubstring,
    /// Checks with no payee information need a human
    UnknownCheck,
    /// Always matches
    Fallback,
}

/// Evaluation order. Changing this changes classification semantics.
pub const PIPELINE: [Rule; 5] = [
    Rule::PaymentAppGuard,
    Rule::IncomeDefault,
    Rule::VendorSubstring,
    Rule::UnknownCheck,
    Rule::Fallback,
];

impl Rule {
    /// Evaluate this case against one transaction. `name` is the cleaned
    /// display name upper-cased once by the caller.
    fn evaluate(&self, tx: &Transaction, name: &str, cfg: &RuleConfig) -> Option<Classification> {
        let is_credit = tx.direction == Direction::Credit;

        match self {
            Rule::PaymentAppGuard => {
                let hit = is_credit
                    && cfg
                        .payment_app_markers
                        .iter()
                        .any(|marker| name.contains(&marker.to_uppercase()));
                hit.then(|| Classification {
                    category: None,
                    confidence: Confidence::Guess,
                    note: Some("payment app income - classify manually".to_string()),
                })
            }
            Rule::IncomeDefault => {
                (is_credit && cfg.assume_all_income_is_rental).then(|| Classification {
                    category: Some("Rental Income".to_string()),
                    confidence: Confidence::Guess,
                    note: None,
                })
            }
            Rule::VendorSubstring => cfg
                .vendor_rules
                .iter()
                .find(|rule| name.contains(&rule.needle.to_uppercase()))
                .map(|rule| Classification {
                    category: Some(rule.category.clone()),
                    confidence: rule.confidence,
                    note: rule.note.clone(),
                }),
            Rule::UnknownCheck => {
                let hit = name.contains("CHECK #") || tx.checknum.is_some();
                hit.then(|| Classification {
                    category: None,
                    confidence: Confidence::Guess,
                    note: Some("unknown check payee".to_string()),
                })
            }
            Rule::Fallback => Some(Classification {
                category: None,
                confidence: Confidence::Guess,
                note: None,
            }),
        }
    }
}

/// Classify one transaction against the configured rules
pub fn classify(tx: &Transaction, cfg: &RuleConfig) -> Classification {
    let name = tx.name.as_deref().unwrap_or("").to_uppercase();

    PIPELINE
        .iter()
        .find_map(|rule| rule.evaluate(tx, &name, cfg))
        .unwrap_or(Classification {
            category: None,
            confidence: Confidence::Guess,
            note: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;

    fn tx(amount: f64, name: Option<&str>) -> Transaction {
        Transaction {
            id: "T1".to_string(),
            posted_date: "2024-07-01".to_string(),
            amount,
            direction: Direction::from_amount(amount),
            name: name.map(|s| s.to_string()),
            memo: None,
            kind: None,
            checknum: None,
            source_file: None,
            raw: RawRecord::new(),
            tags: Vec::new(),
            notes: None,
        }
    }

    #[test]
    fn test_payment_app_guard_beats_income_default() {
        let cfg = RuleConfig::default();
        assert!(cfg.assume_all_income_is_rental);

        let result = classify(&tx(1200.00, Some("TRANSFER FROM CASH APP")), &cfg);
        assert_eq!(result.category, None);
        assert_eq!(result.confidence, Confidence::Guess);
        assert_eq!(
            result.note.as_deref(),
            Some("payment app income - classify manually")
        );
    }

    #[test]
    fn test_guard_applies_regardless_of_toggle() {
        let cfg = RuleConfig {
            assume_all_income_is_rental: false,
            ..RuleConfig::default()
        };
        let result = classify(&tx(50.0, Some("VENMO CASHOUT")), &cfg);
        assert_eq!(result.category, None);
    }

    #[test]
    fn test_guard_ignores_debits() {
        // Paying someone through a payment app is not income
        let cfg = RuleConfig::default();
        let result = classify(&tx(-80.0, Some("TRANSFER TO CASH APP")), &cfg);
        assert_eq!(result.category.as_deref(), Some("Personal Transfer"));
    }

    #[test]
    fn test_income_default() {
        let cfg = RuleConfig::default();
        let result = classify(&tx(950.0, Some("DEPOSIT")), &cfg);
        assert_eq!(result.category.as_deref(), Some("Rental Income"));
        assert_eq!(result.confidence, Confidence::Guess);
    }

    #[test]
    fn test_income_default_off() {
        let cfg = RuleConfig {
            assume_all_income_is_rental: false,
            ..RuleConfig::default()
        };
        let result = classify(&tx(950.0, Some("DEPOSIT")), &cfg);
        assert_eq!(result.category, None);
        assert_eq!(result.note, None);
    }

    #[test]
    fn test_vendor_rule_match() {
        let cfg = RuleConfig::default();
        let result = classify(&tx(-42.19, Some("DEBIT CARD PURCHASE HOME DEPOT 1234")), &cfg);
        assert_eq!(result.category.as_deref(), Some("Credit Card Payment"));
        assert_eq!(result.confidence, Confidence::Guess);
        assert_eq!(result.note.as_deref(), Some("verify if always CC payment"));
    }

    #[test]
    fn test_vendor_rule_case_insensitive() {
        let cfg = RuleConfig::default();
        let result = classify(&tx(-89.99, Some("at&t payment")), &cfg);
        assert_eq!(result.category.as_deref(), Some("Phone Expense"));
        assert_eq!(result.confidence, Confidence::Hard);
    }

    #[test]
    fn test_vendor_rule_order_preserved() {
        use crate::config::VendorRule;
        // Two rules both match; the first configured one must win
        let cfg = RuleConfig {
            vendor_rules: vec![
                VendorRule {
                    needle: "TRANSFER".to_string(),
                    category: "First".to_string(),
                    confidence: Confidence::Guess,
                    note: None,
                },
                VendorRule {
                    needle: "TRANSFER TO".to_string(),
                    category: "Second".to_string(),
                    confidence: Confidence::Hard,
                    note: None,
                },
            ],
            ..RuleConfig::default()
        };
        let result = classify(&tx(-10.0, Some("TRANSFER TO SAVINGS")), &cfg);
        assert_eq!(result.category.as_deref(), Some("First"));
    }

    #[test]
    fn test_unknown_check_by_name_marker() {
        let cfg = RuleConfig::default();
        let result = classify(&tx(-300.0, Some("CHECK # 1041")), &cfg);
        assert_eq!(result.category, None);
        assert_eq!(result.note.as_deref(), Some("unknown check payee"));
    }

    #[test]
    fn test_unknown_check_by_checknum() {
        let cfg = RuleConfig::default();
        let mut t = tx(-300.0, Some("WITHDRAWAL"));
        t.checknum = Some("1041".to_string());
        let result = classify(&t, &cfg);
        assert_eq!(result.note.as_deref(), Some("unknown check payee"));
    }

    #[test]
    fn test_fallback_is_total() {
        let cfg = RuleConfig::default();
        let result = classify(&tx(-7.25, None), &cfg);
        assert_eq!(result.category, None);
        assert_eq!(result.confidence, Confidence::Guess);
        assert_eq!(result.note, None);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let cfg = RuleConfig::default();
        let t = tx(-42.19, Some("HOME DEPOT 1234"));
        assert_eq!(classify(&t, &cfg), classify(&t, &cfg));
    }
}

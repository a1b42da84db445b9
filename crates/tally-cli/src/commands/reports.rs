//! Months listing and month report

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use tally_core::{classify, report, review, Store};

use super::{load_config, open_db, parse_month, truncate};

pub fn cmd_months(db_path: &Path, limit: usize) -> Result<()> {
    let db = open_db(db_path)?;

    let months = db.list_month_buckets()?;
    if months.is_empty() {
        println!("No transactions in the database.");
        return Ok(());
    }

    println!("Months (newest first):");
    for (ym, count) in months.iter().take(limit) {
        println!("  {}  ({})", ym, count);
    }
    Ok(())
}

pub fn cmd_report(db_path: &Path, data_dir: &Path, month: &str) -> Result<()> {
    let (year, month_num) = parse_month(month)?;
    let db = open_db(db_path)?;
    let cfg = load_config(data_dir);

    let txs = db.query(Some((year, month_num)), 10_000)?;

    let s = report::summarize(&txs);
    println!("Month: {:04}-{:02}", year, month_num);
    println!("Count  : {}", s.count);
    println!("Credits: {}  Total: {:.2}", s.credits_count, s.credits_total);
    println!("Debits : {}  Total: {:.2}", s.debits_count, s.debits_total);
    println!("Net    : {:.2}", s.net_total);

    // Classification breakdown: category -> (count, total)
    let mut by_category: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for tx in &txs {
        let result = classify::classify(tx, &cfg);
        let key = result.category.unwrap_or_else(|| "(unclassified)".to_string());
        let entry = by_category.entry(key).or_default();
        entry.0 += 1;
        entry.1 += tx.amount;
    }

    println!("\nCategories:");
    for (category, (count, total)) in &by_category {
        println!("  {:<24} {:>4}  {:>12.2}", category, count, total);
    }

    let top = report::top_spend_vendors(&txs, 10);
    if !top.is_empty() {
        println!("\nTop spend vendors:");
        for (vendor, total) in &top {
            println!("  {:>10.2}  {}", total, truncate(vendor, 48));
        }

        println!("\nTop spend by kind:");
        for (kind, ranked) in report::top_spend_by_kind(&txs, 10) {
            if ranked.is_empty() {
                continue;
            }
            println!("  {}:", kind);
            for (vendor, total) in &ranked {
                println!("  {:>10.2}  {}", total, truncate(vendor, 48));
            }
        }
    }

    let checks = report::detect_checks(&txs);
    if !checks.is_empty() {
        println!("\nDetected checks: {}", checks.len());
    }

    // Same routing policy the import path uses to populate the queue
    let needs_review: Vec<_> = txs
        .iter()
        .filter_map(|tx| {
            review::review_reasons(tx, &cfg)
                .first()
                .map(|reason| (tx, *reason))
        })
        .collect();

    if needs_review.is_empty() {
        println!("\nNeeds review: none");
    } else {
        println!("\nNeeds review:");
        for (tx, reason) in needs_review.iter().take(15) {
            println!(
                "  {}  {:>10.2}  {:<32}  ({})",
                tx.posted_date,
                tx.amount,
                truncate(tx.name.as_deref().unwrap_or("-"), 32),
                reason
            );
        }
    }

    Ok(())
}

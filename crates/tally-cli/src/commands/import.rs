//! QFX import command

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{ingest, review, Store};

use super::{load_config, open_db};

pub fn cmd_import(db_path: &Path, data_dir: &Path, file: &Path, strict: bool) -> Result<()> {
    let db = open_db(db_path)?;
    let cfg = load_config(data_dir);

    println!("Importing {}...", file.display());

    let outcome = ingest::ingest_qfx(file, strict)
        .with_context(|| format!("Failed to ingest {}", file.display()))?;

    println!("   Parsed: {}", outcome.transactions.len() + outcome.rejected.len());

    if !outcome.rejected.is_empty() {
        println!("   Rejected: {}", outcome.rejected.len());
        for r in &outcome.rejected {
            println!("     record {}: {}", r.index, r.reason);
        }
    }

    let stats = db.upsert_many(&outcome.transactions)?;

    println!("   Inserted (new): {}", stats.inserted);
    println!("   Seen (duplicates): {}", stats.seen);
    println!("   DB total: {}", db.count_transactions()?);

    // Route policy-flagged transactions into their month's review queue.
    // Re-derivation refreshes display fields but never human decisions.
    let store = review::ReviewStore::new(data_dir);
    let mut by_month: BTreeMap<String, Vec<&tally_core::Transaction>> = BTreeMap::new();
    for tx in &outcome.transactions {
        by_month.entry(tx.year_month().to_string()).or_default().push(tx);
    }

    let mut queued = 0;
    for (ym, txs) in &by_month {
        let mut items = store.load(ym)?;
        for tx in txs {
            if review::route(&mut items, tx, &cfg).is_some() {
                queued += 1;
            }
        }
        store.save(ym, &items)?;
    }

    if queued > 0 {
        println!("   Needs review: {} (see `tally review next <YYYY-MM>`)", queued);
    }

    Ok(())
}

//! Review queue triage commands

use std::path::Path;

use anyhow::{bail, Result};
use tally_core::{review, ReviewItem, ReviewStatus};

use super::{parse_month, truncate};

/// Validate and normalize a month argument to the `YYYY-MM` file key
fn month_key(month: &str) -> Result<String> {
    let (year, month_num) = parse_month(month)?;
    Ok(format!("{:04}-{:02}", year, month_num))
}

fn print_item(item: &ReviewItem) {
    println!(
        "  {}  {}  {:>10.2}  {:<32}  [{}]{}",
        item.id,
        item.posted_date,
        item.amount,
        truncate(item.name.as_deref().unwrap_or("-"), 32),
        item.status,
        item.reason
            .as_deref()
            .map(|r| format!("  ({})", r))
            .unwrap_or_default(),
    );
    if let Some(category) = &item.category {
        println!("      category: {}", category);
    }
    if let Some(vendor) = &item.vendor {
        println!("      vendor:   {}", vendor);
    }
    if let Some(note) = &item.note {
        println!("      note:     {}", note);
    }
}

pub fn cmd_review_next(data_dir: &Path, month: &str) -> Result<()> {
    let month = &month_key(month)?;
    let store = review::ReviewStore::new(data_dir);
    let items = store.load(month)?;

    match review::find_next_open(&items) {
        Some(item) => {
            println!("Next open item for {}:", month);
            print_item(item);
        }
        None => println!("No open review items for {}.", month),
    }
    Ok(())
}

pub fn cmd_review_list(data_dir: &Path, month: &str) -> Result<()> {
    let month = &month_key(month)?;
    let store = review::ReviewStore::new(data_dir);
    let items = store.load(month)?;

    if items.is_empty() {
        println!("No review items for {}.", month);
        return Ok(());
    }

    let open = items
        .values()
        .filter(|i| i.status == ReviewStatus::Open)
        .count();
    println!("Review items for {} ({} open):", month, open);
    for item in items.values() {
        print_item(item);
    }
    Ok(())
}

/// Close an open item as resolved or dismissed.
///
/// Open is the only state a human can transition out of; terminal states
/// stay put.
#[allow(clippy::too_many_arguments)]
pub fn cmd_review_close(
    data_dir: &Path,
    month: &str,
    id: &str,
    status: ReviewStatus,
    category: Option<String>,
    vendor: Option<String>,
    note: Option<String>,
) -> Result<()> {
    let month = &month_key(month)?;
    let store = review::ReviewStore::new(data_dir);
    let mut items = store.load(month)?;

    let Some(item) = items.get_mut(id) else {
        bail!("No review item '{}' in {}", id, month);
    };

    if item.status != ReviewStatus::Open {
        bail!("Item '{}' is already {}", id, item.status);
    }

    item.status = status;
    if category.is_some() {
        item.category = category;
    }
    if vendor.is_some() {
        item.vendor = vendor;
    }
    if note.is_some() {
        item.note = note;
    }

    store.save(month, &items)?;
    println!("Item '{}' marked {}.", id, status);
    Ok(())
}

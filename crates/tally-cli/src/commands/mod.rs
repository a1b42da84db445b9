//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - init and shared utilities (open_db, config loading)
//! - `import` - QFX import (ingest, dedup, classify, review routing)
//! - `reports` - months listing and the month report
//! - `review` - review queue triage commands

pub mod core;
pub mod import;
pub mod reports;
pub mod review;

pub use core::*;
pub use import::*;
pub use reports::*;
pub use review::*;

use anyhow::{anyhow, Result};

/// Parse a `YYYY-MM` argument into (year, month)
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let (year_s, month_s) = s
        .split_once('-')
        .ok_or_else(|| anyhow!("Expected YYYY-MM, got '{}'", s))?;

    let year: i32 = year_s
        .parse()
        .map_err(|_| anyhow!("Invalid year in '{}'", s))?;
    let month: u32 = month_s
        .parse()
        .map_err(|_| anyhow!("Invalid month in '{}'", s))?;

    if !(1..=12).contains(&month) {
        return Err(anyhow!("Month must be 1..12, got {}", month));
    }
    Ok((year, month))
}

/// Truncate a string to a maximum length in characters, adding "..." if
/// truncated. Counts chars, not bytes, so a multi-byte vendor name never
/// splits mid-character.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

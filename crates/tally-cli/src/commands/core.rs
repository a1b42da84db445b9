//! Core commands and shared utilities

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{Database, RuleConfig};

/// Open the database, creating it if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path = db_path
        .to_str()
        .with_context(|| format!("Invalid database path: {}", db_path.display()))?;
    Database::new(path).with_context(|| format!("Failed to open database at {}", path))
}

/// Load the rule config, with `data_dir/rules.json` as the override source.
/// A malformed override logs a warning and falls back to defaults.
pub fn load_config(data_dir: &Path) -> RuleConfig {
    RuleConfig::load(&data_dir.join("rules.json"))
}

pub fn cmd_init(db_path: &Path, data_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    let db = open_db(db_path)?;

    println!("Database ready at {}", db.path());
    println!("Data directory ready at {}", data_dir.display());
    Ok(())
}

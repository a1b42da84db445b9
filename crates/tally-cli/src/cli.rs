//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - import, classify, and triage bank transactions
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Bank-export ledger with rule classification and a review queue", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Directory for review files and the rule-config override (rules.json)
    #[arg(long, default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and data directory
    Init,

    /// Import transactions from a QFX statement file
    Import {
        /// QFX file to import
        file: PathBuf,

        /// Abort the whole batch on the first malformed record instead of
        /// skipping it
        #[arg(long)]
        strict: bool,
    },

    /// List months with stored transactions, newest first
    Months {
        /// Maximum number of months to show
        #[arg(long, default_value = "60")]
        limit: usize,
    },

    /// Month report: summary, classification, needs-review
    Report {
        /// Month to report on, YYYY-MM
        month: String,
    },

    /// Work the review queue
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
}

#[derive(Subcommand)]
pub enum ReviewAction {
    /// Show the next open item for a month
    Next {
        /// Month, YYYY-MM
        month: String,
    },

    /// List a month's review items
    List {
        /// Month, YYYY-MM
        month: String,
    },

    /// Resolve an open item, optionally recording category/vendor/note
    Resolve {
        /// Item id
        id: String,

        /// Month the item lives in, YYYY-MM
        #[arg(long)]
        month: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        vendor: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },

    /// Dismiss an open item
    Dismiss {
        /// Item id
        id: String,

        /// Month the item lives in, YYYY-MM
        #[arg(long)]
        month: String,

        #[arg(long)]
        note: Option<String>,
    },
}

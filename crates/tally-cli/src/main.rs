//! Tally CLI - bank-export ledger
//!
//! Usage:
//!   tally init                    Initialize database and data directory
//!   tally import statement.qfx    Import a QFX statement (dedup on re-import)
//!   tally months                  List months with stored transactions
//!   tally report 2024-07          Month summary, classification, needs-review
//!   tally review next 2024-07     Triage the review queue

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, &cli.data_dir),
        Commands::Import { file, strict } => {
            commands::cmd_import(&cli.db, &cli.data_dir, &file, strict)
        }
        Commands::Months { limit } => commands::cmd_months(&cli.db, limit),
        Commands::Report { month } => commands::cmd_report(&cli.db, &cli.data_dir, &month),
        Commands::Review { action } => match action {
            ReviewAction::Next { month } => commands::cmd_review_next(&cli.data_dir, &month),
            ReviewAction::List { month } => commands::cmd_review_list(&cli.data_dir, &month),
            ReviewAction::Resolve {
                id,
                month,
                category,
                vendor,
                note,
            } => commands::cmd_review_close(
                &cli.data_dir,
                &month,
                &id,
                tally_core::ReviewStatus::Resolved,
                category,
                vendor,
                note,
            ),
            ReviewAction::Dismiss { id, month, note } => commands::cmd_review_close(
                &cli.data_dir,
                &month,
                &id,
                tally_core::ReviewStatus::Dismissed,
                None,
                None,
                note,
            ),
        },
    }
}

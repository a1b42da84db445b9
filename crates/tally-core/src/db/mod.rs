//! Storage layer with connection pooling and migrations
//!
//! The core pipeline depends on the `Store` trait, not on SQLite directly;
//! `Database` is the SQLite implementation. The contract that matters for
//! correctness: inserts are idempotent on transaction id, so overlapping
//! batches and re-runs after a partial failure are always safe.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;
use crate::models::Transaction;

mod transactions;

pub use transactions::UpsertStats;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Identity-keyed persistence contract for canonical transactions.
///
/// Duplicate identities are the dedup mechanism, not errors: `upsert_many`
/// absorbs them silently and reports how many rows were new vs already seen.
pub trait Store {
    /// Create the schema if needed
    fn init(&self) -> Result<()>;

    /// Insert transactions, skipping ids already present
    fn upsert_many(&self, txs: &[Transaction]) -> Result<UpsertStats>;

    /// Newest-first by posted date, ties broken by descending |amount|,
    /// optionally restricted to one (year, month)
    fn query(&self, year_month: Option<(i32, u32)>, limit: i64) -> Result<Vec<Transaction>>;

    /// (YYYY-MM, count) pairs, newest month first
    fn list_month_buckets(&self) -> Result<Vec<(String, i64)>>;
}

/// SQLite-backed store with a connection pool
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    db_path: String,
}

impl Database {
    /// Open (or create) the database at `path` and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database for testing
    ///
    /// Uses a temporary file rather than `:memory:` because each pooled
    /// connection would otherwise get its own private in-memory database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/tally_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Canonical transactions, keyed by stable import identity
            CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                posted_date TEXT NOT NULL,
                amount REAL NOT NULL,
                direction TEXT NOT NULL,
                name TEXT,
                memo TEXT,
                kind TEXT,
                checknum TEXT,
                source_file TEXT,
                raw_json TEXT,                 -- original parsed fields, verbatim
                tags_json TEXT,
                notes TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_tx_posted_date ON transactions(posted_date);
            CREATE INDEX IF NOT EXISTS idx_tx_amount ON transactions(amount);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests;

//! Transaction persistence operations

use rusqlite::params;
use tracing::debug;

use super::{Database, Store};
use crate::error::Result;
use crate::models::{Direction, Transaction};

/// Outcome of an idempotent batch insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpsertStats {
    /// Rows newly inserted by this call
    pub inserted: usize,
    /// Rows whose identity was already present (silently skipped)
    pub seen: usize,
}

impl Database {
    /// Total stored transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl Store for Database {
    fn init(&self) -> Result<()> {
        // Migrations already ran in `new`; keep the contract explicit for
        // callers holding a `dyn Store`.
        let conn = self.conn()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    fn upsert_many(&self, txs: &[Transaction]) -> Result<UpsertStats> {
        let conn = self.conn()?;
        let mut stats = UpsertStats::default();

        for tx in txs {
            let changed = conn.execute(
                r#"
                INSERT OR IGNORE INTO transactions
                (id, posted_date, amount, direction, name, memo, kind, checknum, source_file, raw_json, tags_json, notes)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    tx.id,
                    tx.posted_date,
                    tx.amount,
                    tx.direction.as_str(),
                    tx.name,
                    tx.memo,
                    tx.kind,
                    tx.checknum,
                    tx.source_file,
                    serde_json::to_string(&tx.raw)?,
                    serde_json::to_string(&tx.tags)?,
                    tx.notes,
                ],
            )?;

            if changed == 1 {
                stats.inserted += 1;
            } else {
                stats.seen += 1;
            }
        }

        debug!(
            "Upserted batch: {} inserted, {} seen",
            stats.inserted, stats.seen
        );
        Ok(stats)
    }

    fn query(&self, year_month: Option<(i32, u32)>, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let (where_sql, prefix) = match year_month {
            Some((year, month)) => (
                "WHERE posted_date LIKE ?",
                Some(format!("{:04}-{:02}-%", year, month)),
            ),
            None => ("", None),
        };

        let sql = format!(
            r#"
            SELECT id, posted_date, amount, direction, name, memo, kind, checknum,
                   source_file, raw_json, tags_json, notes
            FROM transactions
            {}
            ORDER BY posted_date DESC, ABS(amount) DESC
            LIMIT ?
            "#,
            where_sql
        );

        let mut stmt = conn.prepare(&sql)?;

        type Row = (
            String,
            String,
            f64,
            String,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
        );

        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<Row> {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get(9)?,
                row.get(10)?,
                row.get(11)?,
            ))
        };

        let rows: Vec<Row> = match prefix {
            Some(p) => stmt
                .query_map(params![p, limit], map_row)?
                .collect::<rusqlite::Result<_>>()?,
            None => stmt
                .query_map(params![limit], map_row)?
                .collect::<rusqlite::Result<_>>()?,
        };

        let mut out = Vec::with_capacity(rows.len());
        for (
            id,
            posted_date,
            amount,
            direction,
            name,
            memo,
            kind,
            checknum,
            source_file,
            raw_json,
            tags_json,
            notes,
        ) in rows
        {
            out.push(Transaction {
                id,
                posted_date,
                amount,
                // Stored direction always mirrors the sign; the sign is the
                // recovery path if the text column is ever off
                direction: direction
                    .parse()
                    .unwrap_or_else(|_| Direction::from_amount(amount)),
                name,
                memo,
                kind,
                checknum,
                source_file,
                raw: match raw_json {
                    Some(json) => serde_json::from_str(&json)?,
                    None => Default::default(),
                },
                tags: match tags_json {
                    Some(json) => serde_json::from_str(&json)?,
                    None => Vec::new(),
                },
                notes,
            });
        }

        Ok(out)
    }

    fn list_month_buckets(&self) -> Result<Vec<(String, i64)>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT SUBSTR(posted_date, 1, 7) AS ym, COUNT(*) AS c
            FROM transactions
            WHERE posted_date IS NOT NULL AND posted_date != ''
            GROUP BY ym
            ORDER BY ym DESC
            "#,
        )?;

        let buckets = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(buckets)
    }
}

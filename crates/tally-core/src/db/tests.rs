//! Database tests

use super::*;
use crate::models::*;

fn tx(id: &str, posted_date: &str, amount: f64) -> Transaction {
    Transaction {
        id: id.to_string(),
        posted_date: posted_date.to_string(),
        amount,
        direction: Direction::from_amount(amount),
        name: Some("TEST VENDOR".to_string()),
        memo: None,
        kind: None,
        checknum: None,
        source_file: Some("test.qfx".to_string()),
        raw: RawRecord::new(),
        tags: Vec::new(),
        notes: None,
    }
}

#[test]
fn test_upsert_is_idempotent() {
    let db = Database::in_memory().unwrap();
    let batch = vec![tx("A", "2024-07-01", -10.0), tx("B", "2024-07-02", 20.0)];

    let first = db.upsert_many(&batch).unwrap();
    assert_eq!(first, UpsertStats { inserted: 2, seen: 0 });

    // Re-importing the same batch inserts nothing and errors nothing
    let second = db.upsert_many(&batch).unwrap();
    assert_eq!(second, UpsertStats { inserted: 0, seen: 2 });

    assert_eq!(db.count_transactions().unwrap(), 2);
}

#[test]
fn test_overlapping_batches() {
    let db = Database::in_memory().unwrap();
    db.upsert_many(&[tx("A", "2024-07-01", -10.0)]).unwrap();

    let stats = db
        .upsert_many(&[tx("A", "2024-07-01", -10.0), tx("C", "2024-07-03", -30.0)])
        .unwrap();
    assert_eq!(stats, UpsertStats { inserted: 1, seen: 1 });
    assert_eq!(db.count_transactions().unwrap(), 2);
}

#[test]
fn test_query_order_newest_first_ties_by_abs_amount() {
    let db = Database::in_memory().unwrap();
    db.upsert_many(&[
        tx("A", "2024-07-01", -10.0),
        tx("B", "2024-07-02", 5.0),
        tx("C", "2024-07-02", -500.0),
        tx("D", "2024-06-30", -999.0),
    ])
    .unwrap();

    let txs = db.query(None, 50).unwrap();
    let ids: Vec<&str> = txs.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["C", "B", "A", "D"]);
}

#[test]
fn test_query_month_filter_and_limit() {
    let db = Database::in_memory().unwrap();
    db.upsert_many(&[
        tx("A", "2024-07-01", -10.0),
        tx("B", "2024-07-15", -20.0),
        tx("C", "2024-06-30", -30.0),
    ])
    .unwrap();

    let july = db.query(Some((2024, 7)), 50).unwrap();
    assert_eq!(july.len(), 2);
    assert!(july.iter().all(|t| t.posted_date.starts_with("2024-07")));

    let limited = db.query(Some((2024, 7)), 1).unwrap();
    assert_eq!(limited.len(), 1);
}

#[test]
fn test_month_buckets_newest_first() {
    let db = Database::in_memory().unwrap();
    db.upsert_many(&[
        tx("A", "2024-07-01", -10.0),
        tx("B", "2024-07-15", -20.0),
        tx("C", "2024-06-30", -30.0),
    ])
    .unwrap();

    let buckets = db.list_month_buckets().unwrap();
    assert_eq!(
        buckets,
        vec![("2024-07".to_string(), 2), ("2024-06".to_string(), 1)]
    );
}

#[test]
fn test_raw_and_tags_round_trip() {
    let db = Database::in_memory().unwrap();
    let mut t = tx("A", "2024-07-01", -10.0);
    t.raw = serde_json::json!({ "name": "AT&amp;T", "amount": -10.0 })
        .as_object()
        .unwrap()
        .clone();
    t.tags = vec!["utilities".to_string()];
    db.upsert_many(&[t]).unwrap();

    let stored = &db.query(None, 1).unwrap()[0];
    assert_eq!(stored.raw.get("name").unwrap(), "AT&amp;T");
    assert_eq!(stored.tags, vec!["utilities".to_string()]);
}

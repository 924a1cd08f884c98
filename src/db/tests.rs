#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::Direction;
use rust_decimal_macros::dec;

fn record(user: &str, month: &str, name: &str, money_out: Decimal) -> TransactionRecord {
    let mut r = TransactionRecord::new(user.into(), month.into());
    r.item_name = name.into();
    r.category = "Food".into();
    r.book(money_out, Direction::MoneyOut);
    r
}

fn seed(db: &mut Database) {
    let mut records = vec![
        record("alice", "2025-05", "Groceries", dec!(1200)),
        record("alice", "2025-06", "Rent", dec!(15000)),
        record("alice", "2025-06", "Coffee", dec!(180)),
        record("bob", "2025-06", "Fuel", dec!(2000)),
    ];
    for (i, r) in records.iter_mut().enumerate() {
        r.created_at = format!("2025-07-01T00:00:0{i}+00:00");
    }
    db.insert_records_batch(&records).unwrap();
}

// ── Record CRUD ───────────────────────────────────────────────

#[test]
fn test_insert_and_get_record() {
    let db = Database::open_in_memory().unwrap();
    let mut r = record("alice", "2025-06", "Rent", dec!(15000));
    r.notes = "June rent".into();
    let id = db.insert_record(&r).unwrap();

    let fetched = db.get_record("alice", id).unwrap().unwrap();
    assert_eq!(fetched.id, Some(id));
    assert_eq!(fetched.item_name, "Rent");
    assert_eq!(fetched.money_out, dec!(15000));
    assert_eq!(fetched.money_in, Decimal::ZERO);
    assert_eq!(fetched.notes, "June rent");
    assert_eq!(fetched.created_at, r.created_at);
}

#[test]
fn test_get_record_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_record("alice", 99999).unwrap().is_none());
}

#[test]
fn test_get_records_by_month() {
    let mut db = Database::open_in_memory().unwrap();
    seed(&mut db);

    let june = db.get_records("alice", Some("2025-06")).unwrap();
    assert_eq!(june.len(), 2);
    assert!(june.iter().all(|r| r.month == "2025-06"));

    assert!(db.get_records("alice", Some("2024-01")).unwrap().is_empty());
}

#[test]
fn test_get_records_newest_first() {
    let mut db = Database::open_in_memory().unwrap();
    seed(&mut db);

    let all = db.get_records("alice", None).unwrap();
    let names: Vec<&str> = all.iter().map(|r| r.item_name.as_str()).collect();
    assert_eq!(names, vec!["Coffee", "Rent", "Groceries"]);
}

#[test]
fn test_update_record() {
    let db = Database::open_in_memory().unwrap();
    let id = db.insert_record(&record("alice", "2025-06", "Rent", dec!(15000))).unwrap();

    let mut r = db.get_record("alice", id).unwrap().unwrap();
    r.category = "Housing".into();
    r.book(dec!(16000.50), Direction::MoneyOut);
    r.updated_at = "2025-07-02T00:00:00+00:00".into();
    assert!(db.update_record(&r).unwrap());

    let fetched = db.get_record("alice", id).unwrap().unwrap();
    assert_eq!(fetched.category, "Housing");
    assert_eq!(fetched.amount, dec!(16000.50));
    assert_eq!(fetched.updated_at, "2025-07-02T00:00:00+00:00");
    assert_eq!(fetched.created_at, r.created_at);
}

#[test]
fn test_update_record_without_id_fails() {
    let db = Database::open_in_memory().unwrap();
    let r = record("alice", "2025-06", "Rent", dec!(1));
    assert!(db.update_record(&r).is_err());
}

#[test]
fn test_delete_record() {
    let db = Database::open_in_memory().unwrap();
    let id = db.insert_record(&record("alice", "2025-06", "Rent", dec!(1))).unwrap();

    assert!(db.delete_record("alice", id).unwrap());
    assert!(db.get_record("alice", id).unwrap().is_none());
    assert!(!db.delete_record("alice", id).unwrap());
}

// ── User isolation ────────────────────────────────────────────

#[test]
fn test_records_scoped_by_user() {
    let mut db = Database::open_in_memory().unwrap();
    seed(&mut db);

    let bob = db.get_records("bob", None).unwrap();
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].item_name, "Fuel");
    assert!(db.get_records("carol", None).unwrap().is_empty());
}

#[test]
fn test_foreign_ids_behave_as_missing() {
    let db = Database::open_in_memory().unwrap();
    let id = db.insert_record(&record("alice", "2025-06", "Rent", dec!(1))).unwrap();

    assert!(db.get_record("bob", id).unwrap().is_none());
    assert!(!db.delete_record("bob", id).unwrap());

    let mut hijack = db.get_record("alice", id).unwrap().unwrap();
    hijack.user_id = "bob".into();
    hijack.item_name = "Stolen".into();
    assert!(!db.update_record(&hijack).unwrap());
    assert_eq!(db.get_record("alice", id).unwrap().unwrap().item_name, "Rent");
}

#[test]
fn test_months_distinct_newest_first() {
    let mut db = Database::open_in_memory().unwrap();
    seed(&mut db);
    assert_eq!(db.get_months("alice").unwrap(), vec!["2025-06", "2025-05"]);
    assert_eq!(db.get_months("bob").unwrap(), vec!["2025-06"]);
}

// ── Batch insert ──────────────────────────────────────────────

#[test]
fn test_batch_insert_returns_count() {
    let mut db = Database::open_in_memory().unwrap();
    let records = vec![
        record("alice", "2025-06", "A", dec!(1)),
        record("alice", "2025-06", "B", dec!(2)),
    ];
    assert_eq!(db.insert_records_batch(&records).unwrap(), 2);
    assert_eq!(db.get_records("alice", None).unwrap().len(), 2);
}

#[test]
fn test_batch_insert_is_all_or_nothing() {
    let mut db = Database::open_in_memory().unwrap();
    db.conn
        .execute_batch(
            "CREATE TRIGGER reject_boom BEFORE INSERT ON records
             WHEN NEW.item_name = 'boom'
             BEGIN SELECT RAISE(ABORT, 'boom'); END;",
        )
        .unwrap();

    let records = vec![
        record("alice", "2025-06", "fine", dec!(1)),
        record("alice", "2025-06", "boom", dec!(2)),
    ];
    assert!(db.insert_records_batch(&records).is_err());
    assert!(db.get_records("alice", None).unwrap().is_empty());
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_insert_category_once() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.insert_category("alice", "Travel").unwrap());
    assert!(!db.insert_category("alice", "Travel").unwrap());
    assert_eq!(db.get_categories("alice").unwrap(), vec!["Travel"]);
}

#[test]
fn test_categories_merge_saved_and_used() {
    let mut db = Database::open_in_memory().unwrap();
    seed(&mut db);
    db.insert_category("alice", "Travel").unwrap();
    db.insert_category("alice", "Food").unwrap();

    let mut blank = record("alice", "2025-06", "Mystery", dec!(5));
    blank.category = "  ".into();
    db.insert_record(&blank).unwrap();

    assert_eq!(db.get_categories("alice").unwrap(), vec!["Food", "Travel"]);
}

#[test]
fn test_categories_scoped_by_user() {
    let db = Database::open_in_memory().unwrap();
    db.insert_category("alice", "Travel").unwrap();
    assert!(db.get_categories("bob").unwrap().is_empty());
    assert!(db.insert_category("bob", "Travel").unwrap());
}

// ── Schema migration ──────────────────────────────────────────

#[test]
fn test_schema_version_set() {
    let db = Database::open_in_memory().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_double_migrate_idempotent() {
    let mut db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_open_upgrades_older_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spendo.db");
    {
        let db = Database::open(&path).unwrap();
        db.insert_record(&record("alice", "2025-06", "Rent", dec!(1))).unwrap();
        db.conn
            .execute("UPDATE schema_version SET version = 0", [])
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
    assert_eq!(db.get_records("alice", None).unwrap().len(), 1);
}

#[test]
fn test_open_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spendo.db");
    {
        let db = Database::open(&path).unwrap();
        db.insert_record(&record("alice", "2025-06", "Rent", dec!(1))).unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_records("alice", None).unwrap().len(), 1);
}

// ── Decimal precision ─────────────────────────────────────────

#[test]
fn test_decimal_precision_preserved() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_record(&record("alice", "2024-01", "Precise", dec!(1234.5678)))
        .unwrap();
    let fetched = db.get_record("alice", id).unwrap().unwrap();
    assert_eq!(fetched.money_out, dec!(1234.5678));
}

#[test]
fn test_large_amounts() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_record(&record("alice", "2024-01", "House", dec!(350000.00)))
        .unwrap();
    let fetched = db.get_record("alice", id).unwrap().unwrap();
    assert_eq!(fetched.amount, dec!(350000.00));
}

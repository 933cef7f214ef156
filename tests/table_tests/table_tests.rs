//! Tests for RecordTable
//!
//! These tests verify:
//! - Insert/replace/remove semantics
//! - Id counter never moves backwards
//! - Journal replay via `apply`
//! - Filtered, ordered selection

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use subtrack::journal::Operation;
use subtrack::table::{RecordFilter, RecordTable};
use subtrack::{RecordFields, RecordId, Status, SubscriptionRecord};

// =============================================================================
// Helper Functions
// =============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
}

fn record(id: u64, name: &str, end: NaiveDate) -> SubscriptionRecord {
    let fields = RecordFields::new(name, "Monthly 150", Decimal::from(150), end - Days::new(30), end);
    SubscriptionRecord::from_fields(RecordId(id), fields, Utc::now())
}

// =============================================================================
// Basic Operations
// =============================================================================

#[test]
fn test_new_table_is_empty() {
    let table = RecordTable::new();

    assert!(table.is_empty());
    assert_eq!(table.next_id(), RecordId(1));
}

#[test]
fn test_insert_advances_next_id() {
    let mut table = RecordTable::new();

    table.insert(record(1, "A", today()));
    assert_eq!(table.next_id(), RecordId(2));

    table.insert(record(10, "B", today()));
    assert_eq!(table.next_id(), RecordId(11));

    // Lower id does not move the counter back
    table.insert(record(4, "C", today()));
    assert_eq!(table.next_id(), RecordId(11));
    assert_eq!(table.len(), 3);
}

#[test]
fn test_insert_max_id_does_not_overflow() {
    let mut table = RecordTable::new();

    table.insert(record(u64::MAX, "Edge", today()));

    assert_eq!(table.next_id(), RecordId(u64::MAX));
    assert!(table.contains(RecordId(u64::MAX)));
}

#[test]
fn test_replace_existing_and_missing() {
    let mut table = RecordTable::new();
    table.insert(record(1, "A", today()));

    assert!(table.replace(record(1, "A2", today())));
    assert_eq!(table.get(RecordId(1)).unwrap().name, "A2");

    assert!(!table.replace(record(2, "Ghost", today())));
    assert!(table.get(RecordId(2)).is_none());
}

#[test]
fn test_remove_keeps_next_id() {
    let mut table = RecordTable::new();
    table.insert(record(1, "A", today()));
    table.insert(record(2, "B", today()));

    assert!(table.remove(RecordId(2)).is_some());
    assert!(table.remove(RecordId(2)).is_none());
    assert_eq!(table.next_id(), RecordId(3));
}

#[test]
fn test_from_rows_respects_higher_next_id() {
    let table = RecordTable::from_rows(vec![record(2, "A", today())], 7);
    assert_eq!(table.next_id(), RecordId(7));

    let table = RecordTable::from_rows(vec![record(9, "A", today())], 3);
    assert_eq!(table.next_id(), RecordId(10));
}

// =============================================================================
// Replay
// =============================================================================

#[test]
fn test_apply_operations() {
    let mut table = RecordTable::new();

    table.apply(Operation::Insert(record(1, "A", today())));
    table.apply(Operation::Insert(record(2, "B", today())));
    table.apply(Operation::Update(record(1, "A2", today())));
    table.apply(Operation::Delete { id: RecordId(2) });

    assert_eq!(table.len(), 1);
    assert_eq!(table.get(RecordId(1)).unwrap().name, "A2");
}

#[test]
fn test_apply_is_idempotent() {
    let ops = vec![
        Operation::Insert(record(1, "A", today())),
        Operation::Insert(record(2, "B", today())),
        Operation::Delete { id: RecordId(1) },
    ];

    let mut table = RecordTable::new();
    for op in ops.iter().cloned() {
        table.apply(op);
    }
    for op in ops {
        table.apply(op);
    }

    assert_eq!(table.len(), 1);
    assert!(table.contains(RecordId(2)));
    assert_eq!(table.next_id(), RecordId(3));
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_select_orders_by_end_date_then_id() {
    let mut table = RecordTable::new();
    table.insert(record(1, "Late", today() + Days::new(9)));
    table.insert(record(2, "Tie-b", today()));
    table.insert(record(3, "Early", today() - Days::new(9)));
    table.insert(record(0, "Tie-a", today()));

    let names: Vec<_> = table
        .select(&RecordFilter::all())
        .iter()
        .map(|r| r.name.as_str())
        .collect();

    assert_eq!(names, vec!["Early", "Tie-a", "Tie-b", "Late"]);
}

#[test]
fn test_filter_matches_phone() {
    let mut table = RecordTable::new();
    let mut with_phone = record(1, "Nour", today());
    with_phone.phone = Some("+20 100 ALI".to_string());
    table.insert(with_phone);
    table.insert(record(2, "Omar", today()));

    let found = table.select(&RecordFilter::matching("ali"));

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, RecordId(1));
}

#[test]
fn test_filter_by_status() {
    let mut table = RecordTable::new();
    table.insert(record(1, "Expired", today() - Days::new(1)));
    table.insert(record(2, "Warning", today() + Days::new(3)));
    table.insert(record(3, "Active", today() + Days::new(10)));

    let filter = RecordFilter::all().with_status(Status::Expired, today());
    let found = table.select(&filter);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Expired");
}

#[test]
fn test_empty_term_clears_filter() {
    let filter = RecordFilter::matching("");
    assert_eq!(filter.term(), None);
    assert_eq!(filter, RecordFilter::all());
}

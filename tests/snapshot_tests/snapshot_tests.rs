//! Tests for Snapshot files
//!
//! These tests verify:
//! - Writing and loading a table snapshot
//! - Empty snapshots
//! - Atomic replacement of an older snapshot
//! - Detection of bad magic, version, checksum and truncation

use std::path::PathBuf;

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use subtrack::snapshot::{SnapshotReader, SnapshotWriter};
use subtrack::{RecordFields, RecordId, SubsError, SubscriptionRecord};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_snapshot() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("records.tbl");
    (temp_dir, path)
}

fn record(id: u64, name: &str) -> SubscriptionRecord {
    let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let mut fields = RecordFields::new(name, "Quarterly 100", Decimal::new(10000, 2), start, end)
        .notify_days(7);
    if id % 2 == 0 {
        fields = fields.phone(format!("010{}", id)).notes("even");
    }
    let created_at = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
    SubscriptionRecord::from_fields(RecordId(id), fields, created_at)
}

fn write_snapshot(path: &PathBuf, records: &[SubscriptionRecord], next_id: u64) {
    let mut writer = SnapshotWriter::new(path, next_id).unwrap();
    for r in records {
        writer.add(r).unwrap();
    }
    writer.finish().unwrap();
}

// =============================================================================
// Write/Load Tests
// =============================================================================

#[test]
fn test_write_and_load() {
    let (_temp, path) = setup_temp_snapshot();
    let records: Vec<_> = (1..=4).map(|i| record(i, &format!("Customer {}", i))).collect();

    let mut writer = SnapshotWriter::new(&path, 5).unwrap();
    for r in &records {
        writer.add(r).unwrap();
    }
    let meta = writer.finish().unwrap();

    assert_eq!(meta.record_count, 4);
    assert_eq!(meta.next_id, 5);
    assert_eq!(meta.file_size, std::fs::metadata(&path).unwrap().len());

    let snapshot = SnapshotReader::load(&path).unwrap();
    assert_eq!(snapshot.next_id, 5);
    assert_eq!(snapshot.records, records);
}

#[test]
fn test_empty_snapshot() {
    let (_temp, path) = setup_temp_snapshot();
    write_snapshot(&path, &[], 12);

    let snapshot = SnapshotReader::load(&path).unwrap();

    assert!(snapshot.records.is_empty());
    assert_eq!(snapshot.next_id, 12);
}

#[test]
fn test_finish_replaces_previous_snapshot() {
    let (temp, path) = setup_temp_snapshot();
    write_snapshot(&path, &[record(1, "Old")], 2);
    write_snapshot(&path, &[record(1, "New"), record(2, "Second")], 3);

    let snapshot = SnapshotReader::load(&path).unwrap();
    assert_eq!(snapshot.records.len(), 2);
    assert_eq!(snapshot.records[0].name, "New");

    // No temporary file left behind
    let leftovers: Vec<_> = std::fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn test_unfinished_writer_leaves_old_snapshot() {
    let (_temp, path) = setup_temp_snapshot();
    write_snapshot(&path, &[record(1, "Kept")], 2);

    let mut writer = SnapshotWriter::new(&path, 9).unwrap();
    writer.add(&record(5, "Abandoned")).unwrap();
    drop(writer);

    let snapshot = SnapshotReader::load(&path).unwrap();
    assert_eq!(snapshot.records.len(), 1);
    assert_eq!(snapshot.records[0].name, "Kept");
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_bad_magic() {
    let (_temp, path) = setup_temp_snapshot();
    write_snapshot(&path, &[record(1, "A")], 2);

    let mut bytes = std::fs::read(&path).unwrap();
    bytes[0] = b'X';
    std::fs::write(&path, bytes).unwrap();

    assert!(matches!(SnapshotReader::load(&path), Err(SubsError::Storage(_))));
}

#[test]
fn test_bad_version() {
    let (_temp, path) = setup_temp_snapshot();
    write_snapshot(&path, &[record(1, "A")], 2);

    let mut bytes = std::fs::read(&path).unwrap();
    bytes[4] = 99;
    std::fs::write(&path, bytes).unwrap();

    assert!(matches!(SnapshotReader::load(&path), Err(SubsError::Storage(_))));
}

#[test]
fn test_checksum_mismatch() {
    let (_temp, path) = setup_temp_snapshot();
    write_snapshot(&path, &[record(1, "A"), record(2, "B")], 3);

    let mut bytes = std::fs::read(&path).unwrap();
    bytes[30] ^= 0x55;
    std::fs::write(&path, bytes).unwrap();

    let err = SnapshotReader::load(&path).unwrap_err();
    assert!(err.to_string().contains("checksum"));
}

#[test]
fn test_truncated_file() {
    let (_temp, path) = setup_temp_snapshot();
    write_snapshot(&path, &[record(1, "A")], 2);

    std::fs::write(&path, b"SUBT\x01\x00").unwrap();

    assert!(matches!(SnapshotReader::load(&path), Err(SubsError::Storage(_))));
}

#[test]
fn test_count_mismatch() {
    let (_temp, path) = setup_temp_snapshot();
    write_snapshot(&path, &[record(1, "A")], 2);

    let mut bytes = std::fs::read(&path).unwrap();
    bytes[6..14].copy_from_slice(&3u64.to_le_bytes());
    std::fs::write(&path, bytes).unwrap();

    let err = SnapshotReader::load(&path).unwrap_err();
    assert!(err.to_string().contains("count mismatch"));
}

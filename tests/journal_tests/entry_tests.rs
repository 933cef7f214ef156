//! Tests for Journal Entry framing
//!
//! These tests verify:
//! - Frames decode back to the same entry for every operation kind
//! - CRC32 corruption detection
//! - Edge cases (truncation, oversized length fields)

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use subtrack::journal::{JournalEntry, Operation, HEADER_SIZE, MAX_PAYLOAD_SIZE};
use subtrack::{RecordFields, RecordId, SubsError, SubscriptionRecord};

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_record(id: u64) -> SubscriptionRecord {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let fields = RecordFields::new("Alice", "Monthly 100", Decimal::new(9999, 2), start, end)
        .phone("0100")
        .notes("paid cash");
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
    SubscriptionRecord::from_fields(RecordId(id), fields, created_at)
}

// =============================================================================
// Framing Tests
// =============================================================================

#[test]
fn test_insert_frame_decodes_to_same_entry() {
    let entry = JournalEntry::new(1, Operation::Insert(sample_record(7)));

    let bytes = entry.serialize().unwrap();
    let recovered = JournalEntry::deserialize(&bytes).unwrap();

    assert_eq!(entry, recovered);
    match recovered.operation {
        Operation::Insert(record) => {
            assert_eq!(record.amount, Decimal::new(9999, 2));
            assert_eq!(record.notes.as_deref(), Some("paid cash"));
        }
        other => panic!("expected insert, got {:?}", other),
    }
}

#[test]
fn test_delete_frame_decodes_to_same_entry() {
    let entry = JournalEntry::new(42, Operation::Delete { id: RecordId(3) });

    let bytes = entry.serialize().unwrap();
    let recovered = JournalEntry::deserialize(&bytes).unwrap();

    assert_eq!(entry, recovered);
    assert_eq!(recovered.operation.record_id(), RecordId(3));
    assert_eq!(recovered.operation.kind(), "delete");
}

#[test]
fn test_header_layout() {
    let entry = JournalEntry::new(5, Operation::Delete { id: RecordId(1) });
    let bytes = entry.serialize().unwrap();

    let lsn = u64::from_le_bytes(bytes[0..8].try_into().unwrap());
    let len = u32::from_le_bytes(bytes[12..16].try_into().unwrap()) as usize;

    assert_eq!(lsn, 5);
    assert_eq!(bytes.len(), HEADER_SIZE + len);
}

#[test]
fn test_trailing_bytes_ignored() {
    let entry = JournalEntry::new(1, Operation::Update(sample_record(1)));
    let mut bytes = entry.serialize().unwrap();
    bytes.extend_from_slice(b"next frame");

    assert_eq!(JournalEntry::deserialize(&bytes).unwrap(), entry);
}

// =============================================================================
// Corruption Detection Tests
// =============================================================================

#[test]
fn test_crc_corruption_detected() {
    let entry = JournalEntry::new(1, Operation::Insert(sample_record(1)));
    let mut bytes = entry.serialize().unwrap();

    // Flip a bit in the payload
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;

    let result = JournalEntry::deserialize(&bytes);
    assert!(matches!(result, Err(SubsError::JournalCorruption(_))));
}

#[test]
fn test_lsn_tamper_detected() {
    let entry = JournalEntry::new(1, Operation::Delete { id: RecordId(1) });
    let mut bytes = entry.serialize().unwrap();

    bytes[0] = 2; // LSN is covered by the CRC

    let result = JournalEntry::deserialize(&bytes);
    assert!(matches!(result, Err(SubsError::JournalCorruption(_))));
}

#[test]
fn test_truncated_header() {
    let result = JournalEntry::deserialize(&[0u8; HEADER_SIZE - 1]);
    assert!(matches!(result, Err(SubsError::JournalCorruption(_))));
}

#[test]
fn test_truncated_payload() {
    let entry = JournalEntry::new(1, Operation::Insert(sample_record(1)));
    let bytes = entry.serialize().unwrap();

    let result = JournalEntry::deserialize(&bytes[..bytes.len() - 4]);
    assert!(matches!(result, Err(SubsError::JournalCorruption(_))));
}

#[test]
fn test_oversized_length_rejected() {
    let mut bytes = vec![0u8; HEADER_SIZE];
    bytes[12..16].copy_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_le_bytes());

    let result = JournalEntry::deserialize(&bytes);
    assert!(matches!(result, Err(SubsError::JournalCorruption(_))));
}

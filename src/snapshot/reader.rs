//! Snapshot Reader
//!
//! Loads and verifies a snapshot file.

use std::fs;
use std::path::Path;

use crate::error::{Result, SubsError};
use crate::record::SubscriptionRecord;

use super::{FOOTER_SIZE, HEADER_SIZE, MAGIC, VERSION};

/// Contents of a snapshot file
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub records: Vec<SubscriptionRecord>,
    pub next_id: u64,
}

/// Reader for snapshot files
pub struct SnapshotReader;

impl SnapshotReader {
    /// Load a snapshot, checking magic, version, checksum and record count
    pub fn load(path: &Path) -> Result<Snapshot> {
        let bytes = fs::read(path)?;

        if bytes.len() < HEADER_SIZE + FOOTER_SIZE {
            return Err(SubsError::Storage(format!(
                "Snapshot too short: {} bytes",
                bytes.len()
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(SubsError::Storage(format!(
                "Invalid snapshot magic: expected SUBT, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(SubsError::Storage(format!(
                "Unsupported snapshot version: {}",
                version
            )));
        }

        let record_count = read_u64(&bytes, 6);
        let next_id = read_u64(&bytes, 14);

        let rows_end = bytes.len() - FOOTER_SIZE;
        let rows = &bytes[HEADER_SIZE..rows_end];

        let stored_crc = read_u32(&bytes, rows_end);
        let computed_crc = crc32fast::hash(rows);
        if stored_crc != computed_crc {
            return Err(SubsError::Storage(format!(
                "Snapshot checksum mismatch: stored {:08x}, computed {:08x}",
                stored_crc, computed_crc
            )));
        }

        let mut records = Vec::new();
        let mut pos = 0;
        while pos < rows.len() {
            if pos + 4 > rows.len() {
                return Err(SubsError::Storage("Snapshot row length cut short".to_string()));
            }
            let row_len = read_u32(rows, pos) as usize;
            pos += 4;

            if pos + row_len > rows.len() {
                return Err(SubsError::Storage(format!(
                    "Snapshot row cut short: expected {} bytes, {} left",
                    row_len,
                    rows.len() - pos
                )));
            }
            let record: SubscriptionRecord = bincode::deserialize(&rows[pos..pos + row_len])?;
            pos += row_len;

            records.push(record);
        }

        if records.len() as u64 != record_count {
            return Err(SubsError::Storage(format!(
                "Snapshot record count mismatch: header says {}, found {}",
                record_count,
                records.len()
            )));
        }

        Ok(Snapshot { records, next_id })
    }
}

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(buf)
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

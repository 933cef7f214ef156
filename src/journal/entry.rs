//! Journal Entry definitions
//!
//! Defines the structure of individual journal entries and their framing.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SubsError};
use crate::record::{RecordId, SubscriptionRecord};

/// Frame header size: LSN (8) + CRC (4) + Len (4)
pub const HEADER_SIZE: usize = 16;

/// Maximum payload size (16 MB); anything larger is treated as corruption
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// A single entry in the journal
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    /// Log Sequence Number - monotonically increasing from 1
    pub lsn: u64,

    /// The mutation to replay
    pub operation: Operation,

    /// Timestamp (unix millis) when entry was created
    pub timestamp: u64,
}

/// Mutations that can be logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// A newly added record (id already assigned)
    Insert(SubscriptionRecord),

    /// Full replacement of an existing record
    Update(SubscriptionRecord),

    /// Removal by id
    Delete { id: RecordId },
}

impl Operation {
    /// Id of the record this operation touches
    pub fn record_id(&self) -> RecordId {
        match self {
            Operation::Insert(record) | Operation::Update(record) => record.id,
            Operation::Delete { id } => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Insert(_) => "insert",
            Operation::Update(_) => "update",
            Operation::Delete { .. } => "delete",
        }
    }
}

impl JournalEntry {
    /// Create an entry stamped with the current time
    pub fn new(lsn: u64, operation: Operation) -> Self {
        Self {
            lsn,
            operation,
            timestamp: Utc::now().timestamp_millis().max(0) as u64,
        }
    }

    /// Encode as a complete frame: header + payload
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(&(&self.operation, self.timestamp))?;
        if payload.len() > MAX_PAYLOAD_SIZE as usize {
            return Err(SubsError::Serialization(format!(
                "Journal payload too large: {} bytes (max {})",
                payload.len(),
                MAX_PAYLOAD_SIZE
            )));
        }

        let crc = Self::compute_crc(self.lsn, &payload);

        let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
        frame.extend_from_slice(&self.lsn.to_le_bytes());
        frame.extend_from_slice(&crc.to_le_bytes());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&payload);

        Ok(frame)
    }

    /// Decode one complete frame
    ///
    /// Trailing bytes past the frame are ignored.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(SubsError::JournalCorruption(format!(
                "Incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&bytes[..HEADER_SIZE]);
        let (_, _, payload_len) = Self::parse_header(&header)?;

        let total_len = HEADER_SIZE + payload_len;
        if bytes.len() < total_len {
            return Err(SubsError::JournalCorruption(format!(
                "Incomplete payload: expected {} bytes, got {}",
                total_len,
                bytes.len()
            )));
        }

        Self::from_parts(&header, &bytes[HEADER_SIZE..total_len])
    }

    /// Split a header into (lsn, crc, payload_len)
    pub(crate) fn parse_header(header: &[u8; HEADER_SIZE]) -> Result<(u64, u32, usize)> {
        let mut lsn = [0u8; 8];
        let mut crc = [0u8; 4];
        let mut len = [0u8; 4];
        lsn.copy_from_slice(&header[0..8]);
        crc.copy_from_slice(&header[8..12]);
        len.copy_from_slice(&header[12..16]);

        let payload_len = u32::from_le_bytes(len);
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(SubsError::JournalCorruption(format!(
                "Payload length {} exceeds max {}",
                payload_len, MAX_PAYLOAD_SIZE
            )));
        }

        Ok((u64::from_le_bytes(lsn), u32::from_le_bytes(crc), payload_len as usize))
    }

    /// Verify the checksum and decode the payload
    pub(crate) fn from_parts(header: &[u8; HEADER_SIZE], payload: &[u8]) -> Result<Self> {
        let (lsn, stored_crc, payload_len) = Self::parse_header(header)?;
        if payload.len() != payload_len {
            return Err(SubsError::JournalCorruption(format!(
                "Payload length mismatch at LSN {}: header says {}, got {}",
                lsn,
                payload_len,
                payload.len()
            )));
        }

        let computed_crc = Self::compute_crc(lsn, payload);
        if computed_crc != stored_crc {
            return Err(SubsError::JournalCorruption(format!(
                "CRC mismatch at LSN {}: stored {:08x}, computed {:08x}",
                lsn, stored_crc, computed_crc
            )));
        }

        let (operation, timestamp): (Operation, u64) = bincode::deserialize(payload)
            .map_err(|e| SubsError::JournalCorruption(format!("Bad payload at LSN {}: {}", lsn, e)))?;

        Ok(Self {
            lsn,
            operation,
            timestamp,
        })
    }

    /// CRC32 over the LSN bytes followed by the payload
    pub fn compute_crc(lsn: u64, payload: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&lsn.to_le_bytes());
        hasher.update(payload);
        hasher.finalize()
    }
}

//! Journal Recovery
//!
//! Handles crash recovery by replaying the journal.

use std::fs::OpenOptions;
use std::path::Path;

use crate::error::{Result, SubsError};
use super::{JournalEntry, JournalReader};

/// Handles journal recovery after a crash
pub struct JournalRecovery;

/// Result of a recovery operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of entries successfully recovered
    pub entries_recovered: u64,

    /// Number of corrupted entries found (scanning stops at the first)
    pub entries_corrupted: u64,

    /// Last valid LSN (0 if none)
    pub last_lsn: u64,

    /// Whether bytes past the last valid entry were (or would be) cut off
    pub was_truncated: bool,

    /// Length of the valid prefix in bytes
    pub valid_len: u64,
}

impl JournalRecovery {
    /// Recover entries from a journal file
    ///
    /// This will:
    /// 1. Read entries until the first incomplete, corrupt, or out-of-sequence frame
    /// 2. Truncate the file to the valid prefix
    /// 3. Return all valid entries in order
    pub fn recover(path: &Path) -> Result<(Vec<JournalEntry>, RecoveryResult)> {
        let (entries, result) = Self::scan(path)?;

        if result.was_truncated {
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(result.valid_len)?;
            file.sync_all()?;

            tracing::warn!(
                path = %path.display(),
                valid_len = result.valid_len,
                corrupted = result.entries_corrupted,
                "Truncated journal tail"
            );
        }

        Ok((entries, result))
    }

    /// Verify integrity of a journal file without modifying it
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        Self::scan(path).map(|(_, result)| result)
    }

    fn scan(path: &Path) -> Result<(Vec<JournalEntry>, RecoveryResult)> {
        let file_len = std::fs::metadata(path)?.len();
        let mut reader = JournalReader::open(path)?;
        let mut entries = Vec::new();
        let mut result = RecoveryResult::default();

        loop {
            match reader.next_entry() {
                Ok(Some(entry)) => {
                    if entry.lsn != result.last_lsn + 1 {
                        tracing::debug!(
                            expected = result.last_lsn + 1,
                            found = entry.lsn,
                            "Journal LSN out of sequence"
                        );
                        result.entries_corrupted += 1;
                        break;
                    }
                    result.last_lsn = entry.lsn;
                    result.entries_recovered += 1;
                    result.valid_len = reader.position();
                    entries.push(entry);
                }
                Ok(None) => break,
                Err(SubsError::JournalCorruption(reason)) => {
                    tracing::debug!(%reason, "Journal corruption");
                    result.entries_corrupted += 1;
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        result.was_truncated = result.valid_len < file_len;

        Ok((entries, result))
    }
}

//! Journal Writer
//!
//! Handles appending entries to the journal file.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::JournalSyncStrategy;
use crate::error::{Result, SubsError};
use super::{JournalEntry, JournalRecovery, Operation};

/// Writes entries to the journal file
///
/// Expects a journal that is either empty or already recovered; LSNs
/// continue from the last entry found on open.
pub struct JournalWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    next_lsn: u64,
    sync_strategy: JournalSyncStrategy,

    /// Entries appended since the last fsync
    uncommitted: usize,

    /// Entries currently in the file
    entry_count: usize,

    /// Byte length of the accepted entries; a failed append is cut back to this
    written_len: u64,

    /// Set when a failed append could not be cut back; writes are refused
    /// until the journal is reopened (and recovered)
    broken: bool,
}

impl JournalWriter {
    /// Open or create a journal file
    pub fn open(path: &Path, sync_strategy: JournalSyncStrategy) -> Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        let existing = JournalRecovery::verify(path)?;
        if existing.was_truncated {
            file.set_len(existing.valid_len)?;
        }
        file.seek(SeekFrom::Start(existing.valid_len))?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            next_lsn: existing.last_lsn + 1,
            sync_strategy,
            uncommitted: 0,
            entry_count: existing.entries_recovered as usize,
            written_len: existing.valid_len,
            broken: false,
        })
    }

    /// Append an operation to the journal; returns its LSN
    ///
    /// On failure nothing of the frame stays in the file or the buffer, and
    /// the LSN is not consumed.
    pub fn append(&mut self, operation: Operation) -> Result<u64> {
        self.ensure_writable()?;

        let lsn = self.next_lsn;
        let frame = JournalEntry::new(lsn, operation).serialize()?;

        let pending = self.uncommitted + 1;
        let should_sync = match self.sync_strategy {
            JournalSyncStrategy::EveryWrite => true,
            JournalSyncStrategy::EveryNEntries { count } => pending >= count,
        };

        if let Err(e) = self.write_frame(&frame, should_sync) {
            self.discard_failed_write();
            return Err(e.into());
        }

        self.next_lsn += 1;
        self.entry_count += 1;
        self.written_len += frame.len() as u64;
        self.uncommitted = if should_sync { 0 } else { pending };

        Ok(lsn)
    }

    fn write_frame(&mut self, frame: &[u8], sync: bool) -> io::Result<()> {
        self.writer.write_all(frame)?;
        self.writer.flush()?;
        if sync {
            self.writer.get_ref().sync_data()?;
        }
        Ok(())
    }

    /// Drop whatever part of a failed frame is buffered or on disk
    fn discard_failed_write(&mut self) {
        if let Err(e) = self.reset_to_written_len() {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Could not cut back failed journal write"
            );
            self.broken = true;
        }
    }

    fn reset_to_written_len(&mut self) -> io::Result<()> {
        let file = self.writer.get_ref().try_clone()?;
        let failed = std::mem::replace(&mut self.writer, BufWriter::new(file));
        // into_parts hands back the buffer without flushing it
        let (_, _unwritten) = failed.into_parts();

        let file = self.writer.get_mut();
        file.set_len(self.written_len)?;
        file.seek(SeekFrom::Start(self.written_len))?;
        Ok(())
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.broken {
            return Err(SubsError::Storage(format!(
                "Journal {} has an unrecovered failed write; reopen the store",
                self.path.display()
            )));
        }
        Ok(())
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        self.uncommitted = 0;
        Ok(())
    }

    /// Drop every entry (after a checkpoint made them redundant)
    pub fn truncate(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.writer.flush()?;
        let file = self.writer.get_mut();
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.sync_all()?;

        self.next_lsn = 1;
        self.uncommitted = 0;
        self.entry_count = 0;
        self.written_len = 0;
        Ok(())
    }

    /// LSN the next append will receive
    pub fn current_lsn(&self) -> u64 {
        self.next_lsn
    }

    /// Entries appended but not yet fsynced
    pub fn uncommitted_count(&self) -> usize {
        self.uncommitted
    }

    /// Entries currently in the journal
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

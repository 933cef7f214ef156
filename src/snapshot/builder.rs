//! Snapshot Writer
//!
//! Writes every record of the table to a new snapshot file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, SubsError};
use crate::record::SubscriptionRecord;

use super::{SnapshotMeta, COUNT_OFFSET, MAGIC, VERSION};

/// Builder for a snapshot file
pub struct SnapshotWriter {
    /// Final path, replaced on `finish()`
    path: PathBuf,
    /// Where rows are written until the snapshot is complete
    tmp_path: PathBuf,
    writer: BufWriter<File>,
    record_count: u64,
    next_id: u64,
    /// Running CRC over the rows section
    rows_hasher: crc32fast::Hasher,
}

impl SnapshotWriter {
    /// Start a snapshot destined for `path`
    ///
    /// Writes the header immediately; call `add()` per record, then
    /// `finish()` to write the footer and move the file into place.
    pub fn new(path: &Path, next_id: u64) -> Result<Self> {
        let tmp_path = path.with_extension("tbl.tmp");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;

        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u64.to_le_bytes())?; // Placeholder for record count
        writer.write_all(&next_id.to_le_bytes())?;

        Ok(Self {
            path: path.to_path_buf(),
            tmp_path,
            writer,
            record_count: 0,
            next_id,
            rows_hasher: crc32fast::Hasher::new(),
        })
    }

    /// Append one record row
    pub fn add(&mut self, record: &SubscriptionRecord) -> Result<()> {
        let row = bincode::serialize(record)?;
        let row_len = u32::try_from(row.len()).map_err(|_| {
            SubsError::Storage(format!("Record {} too large for snapshot", record.id))
        })?;
        let len_bytes = row_len.to_le_bytes();

        self.writer.write_all(&len_bytes)?;
        self.writer.write_all(&row)?;

        self.rows_hasher.update(&len_bytes);
        self.rows_hasher.update(&row);
        self.record_count += 1;

        Ok(())
    }

    /// Write the footer, fix up the header, and atomically replace the old snapshot
    pub fn finish(mut self) -> Result<SnapshotMeta> {
        let rows_crc = self.rows_hasher.finalize();

        self.writer.write_all(&rows_crc.to_le_bytes())?;
        self.writer.write_all(&[0u8; 4])?; // Padding for alignment
        self.writer.flush()?;

        let mut file = self.writer.into_inner().map_err(|e| {
            SubsError::Storage(format!("Failed to flush snapshot: {}", e))
        })?;
        file.seek(SeekFrom::Start(COUNT_OFFSET))?;
        file.write_all(&self.record_count.to_le_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.tmp_path, &self.path)?;
        let file_size = fs::metadata(&self.path)?.len();

        Ok(SnapshotMeta {
            path: self.path,
            record_count: self.record_count,
            next_id: self.next_id,
            file_size,
        })
    }
}

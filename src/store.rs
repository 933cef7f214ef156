//! Store Module
//!
//! The record store that coordinates all components.
//!
//! ## Responsibilities
//! - Validate input and assign identifiers
//! - Journal every mutation before applying it to the table
//! - Checkpoint the table to a snapshot and truncate the journal
//! - Recover from the journal on startup

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};

use crate::config::Config;
use crate::digest::Digest;
use crate::error::{Result, SubsError};
use crate::journal::{JournalRecovery, JournalWriter, Operation};
use crate::record::{RecordId, RecordInput, SubscriptionRecord};
use crate::snapshot::{SnapshotReader, SnapshotWriter};
use crate::table::{RecordFilter, RecordTable};

/// The subscription record store
///
/// An explicit, owned handle: callers pass it where it is needed and
/// mutate through `&mut self`. One process, one thread, one store.
///
/// ## Write Path
/// validate → journal append → table update → (maybe) checkpoint
///
/// A failed validation or journal write leaves the table untouched.
///
/// ## Recovery
/// Replaying journal operations is idempotent against a snapshot that
/// already contains them, so a crash between writing the snapshot and
/// truncating the journal is harmless.
pub struct Store {
    /// Store configuration
    config: Config,

    /// Path of the table snapshot
    snapshot_path: PathBuf,

    /// Mutations since the last checkpoint
    journal: JournalWriter,

    /// Every live record
    table: RecordTable,
}

impl Store {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const JOURNAL_FILENAME: &'static str = "journal.log";
    const SNAPSHOT_FILENAME: &'static str = "records.tbl";

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Open/create data directory
    /// 2. Load the snapshot if one exists
    /// 3. Recover and replay the journal
    /// 4. Checkpoint if anything was replayed
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        // Step 1: Create data directory if it doesn't exist
        fs::create_dir_all(&config.data_dir)?;

        // Step 2: Compute paths (derived from data_dir, not configurable)
        let snapshot_path = config.data_dir.join(Self::SNAPSHOT_FILENAME);
        let journal_path = config.data_dir.join(Self::JOURNAL_FILENAME);

        // Step 3: Load the last checkpoint
        let mut table = if snapshot_path.exists() {
            let snapshot = SnapshotReader::load(&snapshot_path)?;
            RecordTable::from_rows(snapshot.records, snapshot.next_id)
        } else {
            RecordTable::new()
        };

        // Step 4: Replay whatever the journal holds on top of it
        let mut replayed = 0u64;
        if journal_path.exists() {
            let (entries, recovery) = JournalRecovery::recover(&journal_path)?;

            if recovery.entries_recovered > 0 || recovery.entries_corrupted > 0 {
                tracing::info!(
                    recovered = recovery.entries_recovered,
                    corrupted = recovery.entries_corrupted,
                    last_lsn = recovery.last_lsn,
                    "Journal recovery"
                );
            }

            for entry in entries {
                table.apply(entry.operation);
                replayed += 1;
            }
        }

        let journal = JournalWriter::open(&journal_path, config.journal_sync_strategy)?;

        let mut store = Self {
            config,
            snapshot_path,
            journal,
            table,
        };

        // Step 5: Fold replayed entries into a fresh snapshot
        if replayed > 0 {
            store.checkpoint()?;
        }

        tracing::info!(
            data_dir = %store.config.data_dir.display(),
            records = store.table.len(),
            "Store opened"
        );

        Ok(store)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a record; returns its freshly assigned id
    pub fn add<I: RecordInput>(&mut self, input: I) -> Result<RecordId> {
        let fields = input.into_fields(self.config.default_notify_days)?;

        let id = self.table.next_id();
        let record = SubscriptionRecord::from_fields(id, fields, Utc::now());

        self.journal.append(Operation::Insert(record.clone()))?;
        self.table.insert(record);

        tracing::debug!(%id, "Record added");
        self.maybe_checkpoint();

        Ok(id)
    }

    /// Replace every editable field of record `id`
    ///
    /// The id and creation timestamp are kept.
    pub fn update<I: RecordInput>(&mut self, id: RecordId, input: I) -> Result<()> {
        let existing = self.table.get(id).ok_or(SubsError::RecordNotFound(id))?;
        let fields = input.into_fields(self.config.default_notify_days)?;
        let record = existing.with_fields(fields);

        self.journal.append(Operation::Update(record.clone()))?;
        self.table.replace(record);

        tracing::debug!(%id, "Record updated");
        self.maybe_checkpoint();
        Ok(())
    }

    /// Remove record `id`
    pub fn delete(&mut self, id: RecordId) -> Result<()> {
        if !self.table.contains(id) {
            return Err(SubsError::RecordNotFound(id));
        }

        self.journal.append(Operation::Delete { id })?;
        self.table.remove(id);

        tracing::debug!(%id, "Record deleted");
        self.maybe_checkpoint();
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get(&self, id: RecordId) -> Option<&SubscriptionRecord> {
        self.table.get(id)
    }

    /// Records passing `filter` (all records if `None`), by end date ascending
    pub fn list(&self, filter: Option<&RecordFilter>) -> Vec<&SubscriptionRecord> {
        match filter {
            Some(filter) => self.table.select(filter),
            None => self.table.select(&RecordFilter::all()),
        }
    }

    /// Records whose name or phone contains `term`, case-insensitively
    pub fn search(&self, term: &str) -> Vec<&SubscriptionRecord> {
        self.table.select(&RecordFilter::matching(term))
    }

    /// Expired and expiring records as of `today`, in listing order
    pub fn digest(&self, today: NaiveDate) -> Digest {
        Digest::collect(self.list(None), today)
    }

    // =========================================================================
    // Durability
    // =========================================================================

    /// Write the whole table to a new snapshot and empty the journal
    pub fn checkpoint(&mut self) -> Result<()> {
        let mut writer = SnapshotWriter::new(&self.snapshot_path, self.table.next_id().get())?;
        for record in self.table.iter() {
            writer.add(record)?;
        }
        let meta = writer.finish()?;

        self.journal.truncate()?;

        tracing::info!(
            records = meta.record_count,
            bytes = meta.file_size,
            "Checkpoint written"
        );
        Ok(())
    }

    /// Checkpoint once the journal is long enough
    ///
    /// Runs after a mutation is already journaled, so a failure here is only
    /// logged: the journal still holds the data and the next checkpoint (or
    /// reopen) folds it in.
    fn maybe_checkpoint(&mut self) {
        if self.journal.entry_count() < self.config.checkpoint_after {
            return;
        }
        if let Err(e) = self.checkpoint() {
            tracing::warn!(
                error = %e,
                pending = self.journal.entry_count(),
                "Automatic checkpoint failed"
            );
        }
    }

    /// Close the store gracefully
    ///
    /// Checkpoints any journaled mutations and syncs to disk
    pub fn close(mut self) -> Result<()> {
        if self.journal.entry_count() > 0 {
            self.checkpoint()?;
        }
        self.journal.sync()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Path of the table snapshot file
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Path of the journal file
    pub fn journal_path(&self) -> &Path {
        self.journal.path()
    }

    /// Mutations journaled since the last checkpoint
    pub fn journal_entry_count(&self) -> usize {
        self.journal.entry_count()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

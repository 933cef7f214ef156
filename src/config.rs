//! Configuration for SubTrack
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, SubsError};
use crate::record::DEFAULT_NOTIFY_DAYS;

/// Main configuration for a SubTrack store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── journal.log      (mutations since last checkpoint)
    ///     └── records.tbl      (record table snapshot)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Journal Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: how often to fsync the journal
    pub journal_sync_strategy: JournalSyncStrategy,

    /// Journal entries to accumulate before writing a fresh snapshot
    pub checkpoint_after: usize,

    // -------------------------------------------------------------------------
    // Record Configuration
    // -------------------------------------------------------------------------
    /// Notification threshold used when a form leaves it blank
    pub default_notify_days: u32,

    /// Max entries shown per section of the expiry digest
    pub digest_limit: usize,
}

/// Journal sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalSyncStrategy {
    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// fsync after N uncommitted entries
    EveryNEntries { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./subtrack_data"),
            journal_sync_strategy: JournalSyncStrategy::EveryWrite,
            checkpoint_after: 256,
            default_notify_days: DEFAULT_NOTIFY_DAYS,
            digest_limit: 5,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the store cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.checkpoint_after == 0 {
            return Err(SubsError::Config(
                "checkpoint_after must be at least 1".to_string(),
            ));
        }
        if let JournalSyncStrategy::EveryNEntries { count: 0 } = self.journal_sync_strategy {
            return Err(SubsError::Config(
                "journal sync count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the journal sync strategy
    pub fn journal_sync_strategy(mut self, strategy: JournalSyncStrategy) -> Self {
        self.config.journal_sync_strategy = strategy;
        self
    }

    /// Set how many journal entries trigger a checkpoint
    pub fn checkpoint_after(mut self, entries: usize) -> Self {
        self.config.checkpoint_after = entries;
        self
    }

    /// Set the default notification threshold (in days)
    pub fn default_notify_days(mut self, days: u32) -> Self {
        self.config.default_notify_days = days;
        self
    }

    /// Set the per-section cap for the expiry digest
    pub fn digest_limit(mut self, limit: usize) -> Self {
        self.config.digest_limit = limit;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

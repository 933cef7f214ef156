//! Snapshot Module
//!
//! The persisted record table: every live record, written at checkpoints.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Header (22 bytes)                                           │
//! │   Magic: "SUBT" (4) | Version: u16 (2) | Count: u64 (8)     │
//! │   NextId: u64 (8)                                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Rows (variable)                                             │
//! │   [RowLen: u32][bincode SubscriptionRecord]                 │
//! │   ... repeated for each record, in id order ...             │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Footer (8 bytes)                                            │
//! │   RowsCRC: u32 (4) | Padding (4)                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Columns of a row: id, name, phone, package, amount, start_date, end_date,
//! notify_days, notes, created_at. A snapshot is written to a temporary file
//! and renamed over the previous one, so readers see either the old or the
//! new table.

mod builder;
mod reader;

use std::path::PathBuf;

pub use builder::SnapshotWriter;
pub use reader::{Snapshot, SnapshotReader};

// =============================================================================
// Shared Constants (used by writer and reader)
// =============================================================================

/// Magic bytes identifying a SubTrack table file
pub(crate) const MAGIC: &[u8; 4] = b"SUBT";

/// Current table format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + Count (8) + NextId (8)
pub(crate) const HEADER_SIZE: usize = 22;

/// Offset of the record count inside the header
pub(crate) const COUNT_OFFSET: u64 = 6;

/// Footer size: RowsCRC (4) + Padding (4)
pub(crate) const FOOTER_SIZE: usize = 8;

// =============================================================================
// Snapshot Metadata
// =============================================================================

/// Summary of a freshly written snapshot
#[derive(Debug, Clone)]
pub struct SnapshotMeta {
    pub path: PathBuf,
    pub record_count: u64,
    pub next_id: u64,
    pub file_size: u64,
}

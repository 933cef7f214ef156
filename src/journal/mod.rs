//! Journal Module
//!
//! Append-only log of record mutations since the last checkpoint.
//!
//! ## Responsibilities
//! - Append an entry before the in-memory table changes
//! - CRC32 checksums for corruption detection
//! - Log Sequence Numbers (LSN) for ordering
//! - Crash recovery and replay
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Entry 1                                 │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ LSN (8) │ CRC (4) │Len (4) │ Data   │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Entry 2                                 │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ LSN (8) │ CRC (4) │Len (4) │ Data   │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! └─────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. `Data` is the bincode encoding of the
//! operation and its timestamp; the CRC covers the LSN bytes and `Data`.

mod entry;
mod writer;
mod reader;
mod recovery;

pub use entry::{JournalEntry, Operation, HEADER_SIZE, MAX_PAYLOAD_SIZE};
pub use writer::JournalWriter;
pub use reader::{JournalIterator, JournalReader};
pub use recovery::{JournalRecovery, RecoveryResult};

//! Table Module
//!
//! In-memory table holding every live record.
//!
//! ## Responsibilities
//! - Point lookups by id
//! - Id allocation (monotonic, never reused)
//! - Replay of journal operations
//! - Filtered listing ordered by end date
//!
//! ## Data Structure Choice
//! BTreeMap keyed by id: ordered iteration for snapshots, and the record
//! counts this store is meant for make a full scan per listing cheap.

mod filter;
mod records;

pub use filter::RecordFilter;
pub use records::RecordTable;

//! # SubTrack
//!
//! A local customer subscription tracker with:
//! - A record store with create/update/delete/list/search
//! - Expiry classification (active / warning / expired)
//! - A journal with crash recovery and checkpointed table snapshots
//! - A preset package catalog and an expiry digest
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      subtrack CLI                            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Store                                  │
//! │        (validation, ids, filters, checkpoints)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Journal   │          │ RecordTable │
//!   │  (Append)   │          │ (BTreeMap)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  Snapshot   │
//!                           │ (records.tbl)│
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod status;
pub mod catalog;
pub mod digest;

pub mod journal;
pub mod table;
pub mod snapshot;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SubsError, Result};
pub use config::Config;
pub use record::{RecordFields, RecordForm, RecordId, RecordInput, SubscriptionRecord};
pub use status::{classify, Classification, Status};
pub use table::RecordFilter;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SubTrack
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

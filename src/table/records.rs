//! RecordTable implementation
//!
//! BTreeMap-based table of live records.

use std::collections::BTreeMap;

use crate::journal::Operation;
use crate::record::{RecordId, SubscriptionRecord};
use super::RecordFilter;

/// In-memory table of every live record
#[derive(Debug, Clone)]
pub struct RecordTable {
    rows: BTreeMap<RecordId, SubscriptionRecord>,

    /// Next id to hand out; always greater than any id ever seen
    next_id: u64,
}

impl RecordTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Rebuild a table from snapshot rows
    ///
    /// `next_id` is raised if any row would otherwise collide with it.
    pub fn from_rows(rows: Vec<SubscriptionRecord>, next_id: u64) -> Self {
        let mut table = Self {
            rows: BTreeMap::new(),
            next_id: next_id.max(1),
        };
        for record in rows {
            table.insert(record);
        }
        table
    }

    /// Id the next insert should use (does not reserve it)
    pub fn next_id(&self) -> RecordId {
        RecordId(self.next_id)
    }

    pub fn get(&self, id: RecordId) -> Option<&SubscriptionRecord> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.rows.contains_key(&id)
    }

    /// Insert or overwrite a record, advancing the id counter past it
    pub fn insert(&mut self, record: SubscriptionRecord) {
        self.next_id = self.next_id.max(record.id.get().saturating_add(1));
        self.rows.insert(record.id, record);
    }

    /// Replace an existing record; returns false if the id is unknown
    pub fn replace(&mut self, record: SubscriptionRecord) -> bool {
        match self.rows.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: RecordId) -> Option<SubscriptionRecord> {
        self.rows.remove(&id)
    }

    /// Apply a journal operation (replay path)
    pub fn apply(&mut self, operation: Operation) {
        match operation {
            Operation::Insert(record) | Operation::Update(record) => self.insert(record),
            Operation::Delete { id } => {
                self.remove(id);
            }
        }
    }

    /// Records passing `filter`, ordered by end date then id
    pub fn select(&self, filter: &RecordFilter) -> Vec<&SubscriptionRecord> {
        let mut selected: Vec<&SubscriptionRecord> =
            self.rows.values().filter(|r| filter.matches(r)).collect();
        selected.sort_by_key(|r| (r.end_date, r.id));
        selected
    }

    /// All records in id order
    pub fn iter(&self) -> impl Iterator<Item = &SubscriptionRecord> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for RecordTable {
    fn default() -> Self {
        Self::new()
    }
}

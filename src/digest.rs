//! Expiry digest
//!
//! Which records need attention as of a date: expired ones and ones inside
//! their warning window. Computing the digest is all this crate does about
//! notifications; delivering them is up to the caller.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::record::{RecordId, SubscriptionRecord};
use crate::status::Status;

/// One record that made it into the digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEntry {
    pub id: RecordId,
    pub name: String,
    pub days_remaining: i64,
}

/// Records needing attention, split by status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Digest {
    pub expired: Vec<DigestEntry>,
    pub warnings: Vec<DigestEntry>,
}

impl Digest {
    /// Classify every record as of `today`; input order is preserved
    ///
    /// `Store::digest` feeds records by end date ascending (ties by id), so
    /// each section starts with the longest-expired or soonest-expiring
    /// record rather than the oldest entry.
    pub fn collect<'a, I>(records: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a SubscriptionRecord>,
    {
        let mut digest = Digest::default();

        for record in records {
            let classification = record.classify(today);
            let entry = DigestEntry {
                id: record.id,
                name: record.name.clone(),
                days_remaining: classification.days_remaining,
            };
            match classification.status {
                Status::Expired => digest.expired.push(entry),
                Status::Warning => digest.warnings.push(entry),
                Status::Active => {}
            }
        }

        digest
    }

    pub fn is_empty(&self) -> bool {
        self.expired.is_empty() && self.warnings.is_empty()
    }

    /// Plain-text summary showing at most `limit` names per section
    pub fn render(&self, limit: usize) -> String {
        let mut out = String::new();

        if !self.expired.is_empty() {
            out.push_str("Expired subscriptions:\n");
            render_section(&mut out, &self.expired, limit, |e| {
                format!("expired {} days ago", e.days_remaining.abs())
            });
        }

        if !self.warnings.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("Expiring soon:\n");
            render_section(&mut out, &self.warnings, limit, |e| {
                format!("{} days left", e.days_remaining)
            });
        }

        out
    }
}

fn render_section<F>(out: &mut String, entries: &[DigestEntry], limit: usize, describe: F)
where
    F: Fn(&DigestEntry) -> String,
{
    for entry in entries.iter().take(limit) {
        let _ = writeln!(out, "• {} - {}", entry.name, describe(entry));
    }
    if entries.len() > limit {
        let _ = writeln!(out, "... and {} more", entries.len() - limit);
    }
}

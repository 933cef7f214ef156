//! Record filters
//!
//! Narrow a listing by search term and/or status.

use chrono::NaiveDate;

use crate::record::SubscriptionRecord;
use crate::status::Status;

/// Listing filter; the default matches every record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Lowercased search term; `None` matches everything
    term: Option<String>,

    /// Required status and the date to classify against
    status: Option<(Status, NaiveDate)>,
}

impl RecordFilter {
    /// Filter matching every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on a name/phone substring
    pub fn matching(term: impl AsRef<str>) -> Self {
        Self::default().with_term(term)
    }

    /// Case-insensitive name or phone substring; an empty term clears it
    pub fn with_term(mut self, term: impl AsRef<str>) -> Self {
        let term = term.as_ref().to_lowercase();
        self.term = if term.is_empty() { None } else { Some(term) };
        self
    }

    /// Only records in `status` as of `today`
    pub fn with_status(mut self, status: Status, today: NaiveDate) -> Self {
        self.status = Some((status, today));
        self
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn matches(&self, record: &SubscriptionRecord) -> bool {
        if let Some(term) = &self.term {
            let in_name = record.name.to_lowercase().contains(term.as_str());
            let in_phone = record
                .phone
                .as_deref()
                .map(|p| p.to_lowercase().contains(term.as_str()))
                .unwrap_or(false);
            if !in_name && !in_phone {
                return false;
            }
        }

        if let Some((status, today)) = self.status {
            if record.classify(today).status != status {
                return false;
            }
        }

        true
    }
}

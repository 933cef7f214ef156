//! Subscription records
//!
//! The single flat entity tracked by the store, plus the two input shapes
//! accepted by `Store::add` / `Store::update`:
//! - [`RecordForm`]: raw text, parsed and validated on the way in
//! - [`RecordFields`]: already typed, still validated

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SubsError};
use crate::status::{classify, Classification};

/// Threshold used when none is given
pub const DEFAULT_NOTIFY_DAYS: u32 = 5;

/// Calendar date format for input and display
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Identifier
// =============================================================================

/// Store-assigned record identifier (starts at 1, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

// =============================================================================
// Stored Record
// =============================================================================

/// One customer's subscription entry as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub id: RecordId,
    pub name: String,
    pub phone: Option<String>,
    pub package: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notify_days: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SubscriptionRecord {
    /// Build a stored record from validated fields
    pub fn from_fields(id: RecordId, fields: RecordFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            phone: fields.phone,
            package: fields.package,
            amount: fields.amount,
            start_date: fields.start_date,
            end_date: fields.end_date,
            notify_days: fields.notify_days,
            notes: fields.notes,
            created_at,
        }
    }

    /// Same record with every editable field replaced; id and creation time kept
    pub fn with_fields(&self, fields: RecordFields) -> Self {
        Self::from_fields(self.id, fields, self.created_at)
    }

    /// Editable fields of this record
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            name: self.name.clone(),
            phone: self.phone.clone(),
            package: self.package.clone(),
            amount: self.amount,
            start_date: self.start_date,
            end_date: self.end_date,
            notify_days: self.notify_days,
            notes: self.notes.clone(),
        }
    }

    /// Remaining days and status as of `today`
    pub fn classify(&self, today: NaiveDate) -> Classification {
        classify(self.end_date, self.notify_days, today)
    }

    /// Form prefilled with this record's values, for partial edits
    pub fn to_form(&self) -> RecordForm {
        RecordForm {
            name: self.name.clone(),
            phone: self.phone.clone().unwrap_or_default(),
            package: self.package.clone(),
            amount: self.amount.to_string(),
            start_date: self.start_date.format(DATE_FORMAT).to_string(),
            end_date: self.end_date.format(DATE_FORMAT).to_string(),
            notify_days: self.notify_days.to_string(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}

// =============================================================================
// Typed Input
// =============================================================================

/// Editable fields of a record, already parsed
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields {
    pub name: String,
    pub phone: Option<String>,
    pub package: String,
    pub amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notify_days: u32,
    pub notes: Option<String>,
}

impl RecordFields {
    /// Minimal fields; phone and notes absent, default threshold
    pub fn new(
        name: impl Into<String>,
        package: impl Into<String>,
        amount: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            phone: None,
            package: package.into(),
            amount,
            start_date,
            end_date,
            notify_days: DEFAULT_NOTIFY_DAYS,
            notes: None,
        }
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn notify_days(mut self, days: u32) -> Self {
        self.notify_days = days;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Trim text fields, drop blank optionals, and check record invariants
    pub fn normalize(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(SubsError::validation("customer name is required"));
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(SubsError::validation("amount must not be negative"));
        }
        if self.end_date < self.start_date {
            return Err(SubsError::validation(format!(
                "end date {} is before start date {}",
                self.end_date.format(DATE_FORMAT),
                self.start_date.format(DATE_FORMAT)
            )));
        }

        Ok(Self {
            name,
            phone: non_blank(self.phone),
            package: self.package.trim().to_string(),
            notes: non_blank(self.notes),
            ..self
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Text Input
// =============================================================================

/// Raw record input as typed by a user
///
/// Every field is text. Blank phone/notes mean "absent", a blank threshold
/// means the configured default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordForm {
    pub name: String,
    pub phone: String,
    pub package: String,
    pub amount: String,
    pub start_date: String,
    pub end_date: String,
    pub notify_days: String,
    pub notes: String,
}

impl RecordForm {
    /// Parse into typed fields
    pub fn parse(&self, default_notify_days: u32) -> Result<RecordFields> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SubsError::validation("customer name is required"));
        }

        let amount = self.amount.trim();
        if amount.is_empty() {
            return Err(SubsError::validation("amount is required"));
        }
        let amount = Decimal::from_str(amount)
            .map_err(|_| SubsError::validation(format!("amount must be a number, got '{}'", amount)))?;

        let notify_days = match self.notify_days.trim() {
            "" => default_notify_days,
            days => days.parse::<u32>().map_err(|_| {
                SubsError::validation(format!(
                    "notification days must be a non-negative whole number, got '{}'",
                    days
                ))
            })?,
        };

        let fields = RecordFields {
            name: name.to_string(),
            phone: Some(self.phone.clone()),
            package: self.package.clone(),
            amount,
            start_date: parse_date("start date", &self.start_date)?,
            end_date: parse_date("end date", &self.end_date)?,
            notify_days,
            notes: Some(self.notes.clone()),
        };

        fields.normalize()
    }
}

/// Parse a `YYYY-MM-DD` date, naming the field in the error
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SubsError::validation(format!("{} is required", field)));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        SubsError::validation(format!("{} must be YYYY-MM-DD, got '{}'", field, value))
    })
}

// =============================================================================
// Input Seam
// =============================================================================

/// Anything the store can turn into validated record fields
pub trait RecordInput {
    fn into_fields(self, default_notify_days: u32) -> Result<RecordFields>;
}

impl RecordInput for RecordFields {
    fn into_fields(self, _default_notify_days: u32) -> Result<RecordFields> {
        self.normalize()
    }
}

impl RecordInput for RecordForm {
    fn into_fields(self, default_notify_days: u32) -> Result<RecordFields> {
        self.parse(default_notify_days)
    }
}

impl RecordInput for &RecordForm {
    fn into_fields(self, default_notify_days: u32) -> Result<RecordFields> {
        self.parse(default_notify_days)
    }
}

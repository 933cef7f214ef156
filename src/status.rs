//! Expiry classification
//!
//! Pure date arithmetic: no clock access, callers pass `today`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

/// Where a subscription stands relative to its end date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// More than `threshold` days left
    Active,

    /// Between 0 and `threshold` days left (inclusive)
    Warning,

    /// End date already passed
    Expired,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Warning => "warning",
            Status::Expired => "expired",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Status::Active),
            "warning" => Ok(Status::Warning),
            "expired" => Ok(Status::Expired),
            other => Err(format!(
                "unknown status '{}' (expected active, warning or expired)",
                other
            )),
        }
    }
}

/// Result of classifying one end date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// `end_date - today` in whole days; negative once expired
    pub days_remaining: i64,
    pub status: Status,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Status::Expired => write!(f, "expired {} days ago", self.days_remaining.abs()),
            Status::Warning => write!(f, "warning - {} days left", self.days_remaining),
            Status::Active => write!(f, "active - {} days left", self.days_remaining),
        }
    }
}

/// Classify a subscription ending on `end_date` as of `today`
pub fn classify(end_date: NaiveDate, threshold_days: u32, today: NaiveDate) -> Classification {
    let days_remaining = end_date.signed_duration_since(today).num_days();

    let status = if days_remaining < 0 {
        Status::Expired
    } else if days_remaining <= i64::from(threshold_days) {
        Status::Warning
    } else {
        Status::Active
    };

    Classification {
        days_remaining,
        status,
    }
}

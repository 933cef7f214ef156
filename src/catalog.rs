//! Package catalog
//!
//! Preset subscription packages. Picking one prefills the amount and, for
//! packages with a duration, derives the end date from the start date
//! (one month counts as 30 days).

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::record::{RecordForm, DATE_FORMAT};

/// Days counted per package month
pub const DAYS_PER_MONTH: u64 = 30;

/// Label of the free-form package that carries no preset values
pub const CUSTOM_PACKAGE: &str = "Other";

/// A preset package
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub label: String,
    pub price: Decimal,
    /// Duration in months; 0 means the end date is chosen by hand
    pub months: u32,
}

impl Package {
    pub fn new(label: impl Into<String>, price: u32, months: u32) -> Self {
        Self {
            label: label.into(),
            price: Decimal::from(price),
            months,
        }
    }

    /// End date for a subscription starting on `start`, if this package has a duration
    pub fn end_date_from(&self, start: NaiveDate) -> Option<NaiveDate> {
        if self.months == 0 {
            return None;
        }
        start.checked_add_days(Days::new(u64::from(self.months) * DAYS_PER_MONTH))
    }

    /// Whether choosing this package should prefill the amount
    pub fn has_preset_price(&self) -> bool {
        self.label != CUSTOM_PACKAGE
    }
}

/// Ordered list of preset packages
#[derive(Debug, Clone)]
pub struct PackageCatalog {
    packages: Vec<Package>,
}

impl Default for PackageCatalog {
    fn default() -> Self {
        Self {
            packages: vec![
                Package::new("Monthly 100", 100, 1),
                Package::new("Monthly 150", 150, 1),
                Package::new("Monthly 75", 75, 1),
                Package::new("Quarterly 100", 100, 3),
                Package::new("Half-yearly", 0, 6),
                Package::new("Yearly", 0, 12),
                Package::new(CUSTOM_PACKAGE, 0, 0),
            ],
        }
    }
}

impl PackageCatalog {
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    /// Look up a package by exact label
    pub fn get(&self, label: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.label == label)
    }

    /// Fill in what the form's package implies
    ///
    /// The preset price replaces the amount unless one was given or the
    /// package is the custom one; the end date is derived from the start
    /// date unless one was given. Unknown labels and unparsable start dates
    /// leave the form as it is.
    pub fn prefill(&self, form: &mut RecordForm, amount_given: bool, end_given: bool) {
        let Some(package) = self.get(form.package.trim()) else {
            return;
        };

        if !amount_given && package.has_preset_price() {
            form.amount = package.price.to_string();
        }

        if !end_given {
            let start = NaiveDate::parse_from_str(form.start_date.trim(), DATE_FORMAT).ok();
            if let Some(end) = start.and_then(|s| package.end_date_from(s)) {
                form.end_date = end.format(DATE_FORMAT).to_string();
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

//! ISO week keys for plan records.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::Weekday;

/// Identifies a weekly plan by ISO year and week number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    /// Build a key, rejecting weeks that do not exist in the ISO calendar.
    pub fn new(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, chrono::Weekday::Mon)?;
        Some(Self { year, week })
    }

    /// Calendar date of a weekday in this week.
    pub fn date_of(&self, day: Weekday) -> NaiveDate {
        // `new` has already proven the week exists, so every weekday does too.
        NaiveDate::from_isoywd_opt(self.year, self.week, day.to_chrono()).unwrap_or_default()
    }

    /// Key of the ISO week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Storage record key, e.g. `2024-W07`.
    pub fn record_key(&self) -> String {
        format!("{}-W{:02}", self.year, self.week)
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.record_key())
    }
}

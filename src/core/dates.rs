//! Calendar-date helpers shared by the engine, the merger, and the bot layer.
//!
//! Dates are always plain local calendar days rendered as `YYYY-MM-DD`. Nothing
//! in this module touches UTC offsets, so a date never shifts by a day when it
//! crosses a timezone boundary.

use crate::errors::{Error, Result};
use chrono::{Local, NaiveDate};

/// Wire format for every date in the stored blob and in user input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local timezone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a `YYYY-MM-DD` string.
///
/// Surrounding whitespace is ignored so values pasted into a slash command
/// still parse.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The calendar day after `date`. Saturates at the last representable date.
#[must_use]
pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

/// The calendar day before `date`. Saturates at the first representable date.
#[must_use]
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

/// Absolute number of calendar days between two dates.
#[must_use]
pub fn days_between(a: NaiveDate, b: NaiveDate) -> u64 {
    b.signed_duration_since(a).num_days().unsigned_abs()
}

/// Serde adapter for an optional date that tolerates junk.
///
/// Older saves may carry an empty string or a garbled value; those decode to
/// `None` instead of failing the whole blob.
pub mod lenient_date {
    use super::{DATE_FORMAT, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Writes `Some(date)` as `YYYY-MM-DD` and `None` as `null`.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Reads a date string, mapping anything unparsable to `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()))
    }
}

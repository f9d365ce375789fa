//! Seams between the scoring core and its host: the durable key-value
//! medium, the form view, and the clock.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};

use crate::error::StorageError;
use crate::model::{CheckedItem, FieldId, ScoreRecord};
use crate::rubric::ItemId;

// ---------------------------------------------------------------------------
// Key-value medium
// ---------------------------------------------------------------------------

/// A durable string key-value store (a browser profile's local storage, a
/// directory on disk, or memory in tests).
///
/// Every call is a single-shot request that either applies fully or fails.
pub trait KeyValueMedium {
    /// Read a value. Missing keys yield `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// Form view
// ---------------------------------------------------------------------------

/// Severity of a user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What the session controller needs from the UI layer.
pub trait FormView {
    /// Current value of a text field.
    fn field(&self, field: FieldId) -> String;

    fn set_field(&mut self, field: FieldId, value: &str);

    /// Currently checked items as persisted triples.
    fn checked_items(&self) -> Vec<CheckedItem>;

    /// Check or uncheck a single rubric item.
    fn set_checked(&mut self, id: ItemId, checked: bool);

    fn clear_checked(&mut self);

    /// Show the saved-record list; each entry offers load/delete by id.
    fn render_records(&mut self, records: &[ScoreRecord]);

    /// Refresh the score display.
    fn render_scores(&mut self, stats: &crate::engine::ScoreStatistics);

    /// Show a transient message.
    fn show_message(&mut self, message: &str, severity: Severity);
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the current time, injectable for tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// The calendar date where the user is, used for date validation and
    /// for pre-filling the interview date.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time; `today` follows the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at one instant, seen from a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    /// Frozen at `now`, in UTC.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            offset: Utc.fix(),
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.offset).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn fixed_clock_today_follows_offset() {
        let late = Utc.with_ymd_and_hms(2025, 6, 10, 23, 30, 0).unwrap();
        let clock = FixedClock::new(late);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());

        let tokyo = clock.with_offset(FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(tokyo.today(), NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
        assert_eq!(tokyo.now(), late);

        let early = Utc.with_ymd_and_hms(2025, 6, 11, 2, 0, 0).unwrap();
        let new_york =
            FixedClock::new(early).with_offset(FixedOffset::west_opt(4 * 3600).unwrap());
        assert_eq!(new_york.today(), NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
    }
}

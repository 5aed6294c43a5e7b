//! Service calendars: which dates a service id operates on.
//!
//! Mirrors GTFS `calendar.txt` (a date window plus weekday columns) with
//! optional `calendar_dates.txt` style exceptions layered on top.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

use crate::identifiers::ServiceIdentifier;
use crate::models::types::{Result, TransitError};

/// Weekdays a service runs on, one bit per day starting at Monday
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeekdayFlags(u8);

impl WeekdayFlags {
    pub fn new() -> Self {
        Self(0)
    }

    /// Flags for every day of the week
    pub fn all() -> Self {
        Self(0b111_1111)
    }

    fn bit(weekday: Weekday) -> u8 {
        1 << weekday.num_days_from_monday()
    }

    pub fn set(&mut self, weekday: Weekday) {
        self.0 |= Self::bit(weekday);
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0 & Self::bit(weekday) != 0
    }

    /// Monday-first booleans
    pub fn from_bools(days: [bool; 7]) -> Self {
        let mut flags = Self::new();
        let mut weekday = Weekday::Mon;
        for runs in days {
            if runs {
                flags.set(weekday);
            }
            weekday = weekday.succ();
        }
        flags
    }

    /// Monday-first GTFS columns, where `1` means the service runs
    pub fn from_gtfs(columns: [u8; 7]) -> Self {
        Self::from_bools(columns.map(|value| value == 1))
    }
}

#[derive(Clone, Debug)]
pub struct ServiceCalendar {
    pub service_id: ServiceIdentifier,
    /// First operating date, inclusive
    pub start_date: NaiveDate,
    /// Last operating date, inclusive
    pub end_date: NaiveDate,
    pub weekdays: WeekdayFlags,
    /// Dates the service runs regardless of the regular schedule
    pub added_dates: HashSet<NaiveDate>,
    /// Dates the service does not run regardless of the regular schedule
    pub removed_dates: HashSet<NaiveDate>,
}

impl ServiceCalendar {
    pub fn new(
        service_id: impl Into<ServiceIdentifier>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        weekdays: WeekdayFlags,
    ) -> Result<Self> {
        let service_id = service_id.into();
        if end_date < start_date {
            return Err(TransitError::InvalidData(format!(
                "service {service_id} ends ({end_date}) before it starts ({start_date})"
            )));
        }

        Ok(Self {
            service_id,
            start_date,
            end_date,
            weekdays,
            added_dates: HashSet::new(),
            removed_dates: HashSet::new(),
        })
    }

    pub fn with_added_date(mut self, date: NaiveDate) -> Self {
        self.added_dates.insert(date);
        self
    }

    pub fn with_removed_date(mut self, date: NaiveDate) -> Self {
        self.removed_dates.insert(date);
        self
    }

    /// Whether the service operates on `date`
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        if self.added_dates.contains(&date) {
            return true;
        }
        if self.removed_dates.contains(&date) {
            return false;
        }
        if date < self.start_date || date > self.end_date {
            return false;
        }
        self.weekdays.contains(date.weekday())
    }
}

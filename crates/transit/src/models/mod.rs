//! Feed records, calendars and the crate error type.

pub mod calendar;
pub mod types;

// Re-exports for convenience
pub use calendar::{ServiceCalendar, WeekdayFlags};
pub use types::{Result, Stop, StopRecord, StopTime, TransitError, Trip, TripRecord};

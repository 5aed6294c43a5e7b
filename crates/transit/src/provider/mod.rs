//! Day-level views over loaded feed tables.

pub mod service_day;

pub use service_day::{FeedTables, ServiceDay};

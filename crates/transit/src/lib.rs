//! # transit-stops
//!
//! Spatial index over transit stops for fast rectangle and radius lookups.
//!
//! ## Features
//!
//! - **Flat-earth projection**: latitude/longitude become planar miles from a
//!   fixed reference point
//! - **Partition tree**: fixed-depth, alternating-axis median splits with
//!   pruned rectangle and circle queries
//! - **Boundary traversal**: split lines as plain segments for an external
//!   renderer
//! - **Service days**: resolve which trips and stops run on a date and index
//!   only those stops
//!
//! ## Example
//!
//! ```
//! use transit_stops::prelude::*;
//!
//! let reference = GeoReference::MADISON_CAPITOL;
//! let records = vec![
//!     StopRecord::new("capitol", reference.lat, reference.lon, 1),
//!     StopRecord::new("east", reference.lat, reference.lon + 0.01, 0),
//!     StopRecord::new("north", reference.lat + 0.5, reference.lon, 0),
//! ];
//!
//! let index = StopIndex::from_records(&records, IndexConfig::default()).unwrap();
//!
//! // Everything within a mile of the capitol
//! let nearby = index.stops_near(reference.lat, reference.lon, 1.0).unwrap();
//! assert_eq!(nearby.len(), 2);
//!
//! // Split lines for drawing, one per keyed split
//! let bounds = Bounds::new(-50.0, 50.0, -50.0, 50.0).unwrap();
//! assert_eq!(index.traverse_boundaries(bounds).count(), index.split_count());
//! ```

pub mod config;
pub mod identifiers;
pub mod models;
pub mod provider;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::IndexConfig;
    pub use crate::identifiers::*;
    pub use crate::models::{calendar::*, types::*};
    pub use crate::provider::{FeedTables, ServiceDay};
    pub use crate::spatial::{
        haversine_miles, Axis, AxisRange, BoundarySegment, Bounds, GeoReference, Location,
        StopIndex,
    };
}

pub use prelude::*;

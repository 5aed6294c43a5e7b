//! Spatial indexing and query utilities.

pub mod index;
pub mod location;
pub mod queries;
pub mod tree;

pub use index::StopIndex;
pub use location::{GeoReference, Location};
pub use queries::{haversine_miles, AxisRange, Bounds, EARTH_RADIUS_MILES};
pub use tree::{Axis, Boundaries, BoundarySegment};

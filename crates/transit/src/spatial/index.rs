//! Read-only stop index answering rectangle and radius queries.
//!
//! ## Two-Stage Filtering
//!
//! Radius queries run in two stages:
//! 1. **Tree filter**: a rectangle query over the square the circle is
//!    inscribed in, pruning whole subtrees by their split coordinate
//! 2. **Distance filter**: an exact Euclidean check on the survivors,
//!    excluding stops that lie exactly on the circle
//!
//! The index is immutable once built. To pick up a changed stop set, build a
//! new index and swap it in; readers holding the old one are unaffected.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::IndexConfig;
use crate::models::types::{Result, Stop, StopRecord, TransitError};
use crate::spatial::location::Location;
use crate::spatial::queries::{AxisRange, Bounds};
use crate::spatial::tree::{Axis, Boundaries, Node};

#[derive(Debug)]
pub struct StopIndex {
    root: Node,
    config: IndexConfig,
    /// Every indexed stop, sorted by id
    stops: Vec<Arc<Stop>>,
    split_count: usize,
}

impl StopIndex {
    /// Build with the default configuration
    pub fn build(stops: Vec<Stop>) -> Self {
        Self::assemble(stops, IndexConfig::default())
    }

    /// Build with an explicit configuration
    pub fn with_config(stops: Vec<Stop>, config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(stops, config))
    }

    /// Project raw stop rows through `config.reference` and build over them
    ///
    /// Fails on the first row with a non-finite coordinate; nothing is built.
    pub fn from_records(records: &[StopRecord], config: IndexConfig) -> Result<Self> {
        config.validate()?;
        let stops = records
            .iter()
            .map(|record| Stop::from_record(record, &config.reference))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::assemble(stops, config))
    }

    fn assemble(stops: Vec<Stop>, config: IndexConfig) -> Self {
        let mut stops: Vec<Arc<Stop>> = stops.into_iter().map(Arc::new).collect();
        stops.sort();

        let root = Node::build(stops.clone(), 0, config.max_depth);
        let split_count = root.split_count();

        debug!(
            stops = stops.len(),
            max_depth = config.max_depth,
            split_count,
            "built stop index"
        );

        Self {
            root,
            config,
            stops,
            split_count,
        }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.config.max_depth
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of split lines [`StopIndex::traverse_boundaries`] yields
    pub fn split_count(&self) -> usize {
        self.split_count
    }

    /// All indexed stops, sorted by id
    pub fn stops(&self) -> &[Arc<Stop>] {
        &self.stops
    }

    /// Stops inside the inclusive rectangle `x_range` × `y_range`, sorted by id
    ///
    /// Returns [`TransitError::InvalidRange`] if either range has its lower
    /// bound above its upper bound.
    pub fn query_rect(&self, x_range: (f64, f64), y_range: (f64, f64)) -> Result<Vec<Arc<Stop>>> {
        let x = AxisRange::new(Axis::X, x_range.0, x_range.1)?;
        let y = AxisRange::new(Axis::Y, y_range.0, y_range.1)?;
        Ok(self.query_ranges(&x, &y))
    }

    /// Rectangle query over already validated ranges
    pub fn query_ranges(&self, x: &AxisRange, y: &AxisRange) -> Vec<Arc<Stop>> {
        let mut found = Vec::new();
        self.root.collect_in_rect(x, y, &mut found);
        found.sort();

        trace!(
            x_lower = x.lower(),
            x_upper = x.upper(),
            y_lower = y.lower(),
            y_upper = y.upper(),
            hits = found.len(),
            "rectangle query"
        );
        found
    }

    /// Stops strictly closer than `radius` miles to `center`, sorted by id
    ///
    /// A radius of zero or less matches nothing.
    pub fn query_circle(&self, center: Location, radius: f64) -> Result<Vec<Arc<Stop>>> {
        if radius.is_nan() {
            return Err(TransitError::InvalidInput("radius must not be NaN".into()));
        }
        if radius <= 0.0 {
            return Ok(Vec::new());
        }

        let x = AxisRange::new(Axis::X, center.x() - radius, center.x() + radius)?;
        let y = AxisRange::new(Axis::Y, center.y() - radius, center.y() + radius)?;

        let mut found = self.query_ranges(&x, &y);
        found.retain(|stop| stop.location.distance(&center) < radius);

        trace!(%center, radius, hits = found.len(), "circle query");
        Ok(found)
    }

    /// Radius query around a latitude/longitude, projected through the
    /// configured reference point
    pub fn stops_near(&self, lat: f64, lon: f64, radius: f64) -> Result<Vec<Arc<Stop>>> {
        let center = self.config.reference.project(lat, lon)?;
        self.query_circle(center, radius)
    }

    /// Pre-order split lines of the tree, starting from `bounds`
    pub fn traverse_boundaries(&self, bounds: Bounds) -> Boundaries<'_> {
        self.root.boundaries(bounds)
    }
}

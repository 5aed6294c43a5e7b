//! Distance helpers and validated query shapes.
//!
//! Distances are great-circle miles on a sphere of radius
//! [`EARTH_RADIUS_MILES`]. Query shapes are checked once on construction so
//! the tree never walks an inverted or NaN range.

use crate::models::types::{Result, TransitError};
use crate::spatial::tree::Axis;

/// Sphere radius used by the flat-earth projection, in miles
pub const EARTH_RADIUS_MILES: f64 = 3956.0;

/// Great-circle distance in miles between two points given in degrees
///
/// `sqrt(a)` is clamped to 1 before `asin`; rounding can push it just past
/// the domain for near-antipodal points.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_MILES * c
}

/// Inclusive `[lower, upper]` range along one axis
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisRange {
    lower: f64,
    upper: f64,
}

impl AxisRange {
    /// Build a range for `axis`, rejecting NaN bounds and `lower > upper`
    ///
    /// Infinite bounds are allowed so callers can ask for "everything".
    pub fn new(axis: Axis, lower: f64, upper: f64) -> Result<Self> {
        if lower.is_nan() || upper.is_nan() {
            return Err(TransitError::InvalidInput(format!(
                "{axis} range bounds must not be NaN ({lower}, {upper})"
            )));
        }
        if lower > upper {
            return Err(TransitError::InvalidRange { axis, lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Range covering the whole axis
    pub fn unbounded() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Axis-aligned rectangle used as the starting frame of a boundary traversal
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        AxisRange::new(Axis::X, x_min, x_max)?;
        AxisRange::new(Axis::Y, y_min, y_max)?;
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Lower and upper bound along `axis`
    pub fn span(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.x_min, self.x_max),
            Axis::Y => (self.y_min, self.y_max),
        }
    }

    /// Copy with the upper bound of `axis` moved to `value`
    pub(crate) fn with_upper(mut self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::X => self.x_max = value,
            Axis::Y => self.y_max = value,
        }
        self
    }

    /// Copy with the lower bound of `axis` moved to `value`
    pub(crate) fn with_lower(mut self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::X => self.x_min = value,
            Axis::Y => self.y_min = value,
        }
        self
    }
}

//! Flat-earth projection of latitude/longitude into planar miles.
//!
//! Every coordinate is measured from a fixed [`GeoReference`]. The x axis runs
//! east along the reference latitude and the y axis runs north along the
//! reference longitude, so projected distances are only meaningful near the
//! reference point (a city-sized area).

use geo::{EuclideanDistance, Point};

use crate::models::types::{Result, TransitError};
use crate::spatial::queries::haversine_miles;

/// Origin of the planar coordinate system, in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoReference {
    pub lat: f64,
    pub lon: f64,
}

impl GeoReference {
    /// Wisconsin State Capitol, Madison
    pub const MADISON_CAPITOL: GeoReference = GeoReference {
        lat: 43.074683,
        lon: -89.384261,
    };

    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Project a latitude/longitude pair onto the plane
    ///
    /// Magnitudes are great-circle distances along each axis; x is negative
    /// west of the reference and y is negative south of it. The reference
    /// itself projects to exactly `(0, 0)`.
    pub fn project(&self, lat: f64, lon: f64) -> Result<Location> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(TransitError::InvalidInput(format!(
                "cannot project non-finite coordinate ({lat}, {lon})"
            )));
        }

        let mut x = haversine_miles(self.lat, self.lon, self.lat, lon);
        let mut y = haversine_miles(self.lat, self.lon, lat, self.lon);

        if lon < self.lon {
            x = -x;
        }
        if lat < self.lat {
            y = -y;
        }

        Ok(Location {
            point: Point::new(x, y),
        })
    }
}

impl Default for GeoReference {
    fn default() -> Self {
        Self::MADISON_CAPITOL
    }
}

/// A projected position in miles from the reference point
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    point: Point,
}

impl Location {
    /// Wrap coordinates that are already planar
    pub fn from_xy(x: f64, y: f64) -> Result<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(TransitError::InvalidInput(format!(
                "location coordinates must be finite ({x}, {y})"
            )));
        }
        Ok(Self {
            point: Point::new(x, y),
        })
    }

    /// The reference point itself
    pub fn origin() -> Self {
        Self {
            point: Point::new(0.0, 0.0),
        }
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    pub fn point(&self) -> Point {
        self.point
    }

    /// Straight-line distance in miles
    pub fn distance(&self, other: &Location) -> f64 {
        self.point.euclidean_distance(&other.point)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x(), self.y())
    }
}

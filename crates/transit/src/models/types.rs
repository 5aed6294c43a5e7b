//! Core records and the crate error type.

use std::cmp::Ordering;

use crate::identifiers::*;
use crate::spatial::location::{GeoReference, Location};
use crate::spatial::tree::Axis;

// ============================================================================
// Raw feed rows
// ============================================================================

/// A stop as delivered by the ingestion collaborator (GTFS `stops.txt`)
#[derive(Clone, Debug, PartialEq)]
pub struct StopRecord {
    pub id: StopIdentifier,
    pub lat: f64,
    pub lon: f64,
    /// GTFS code: 1 = accessible, anything else = not
    pub wheelchair_boarding: u8,
}

impl StopRecord {
    pub fn new(id: impl Into<StopIdentifier>, lat: f64, lon: f64, wheelchair_boarding: u8) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            wheelchair_boarding,
        }
    }
}

/// A trip row (GTFS `trips.txt`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripRecord {
    pub id: TripIdentifier,
    pub route_short_name: RouteIdentifier,
    pub service_id: ServiceIdentifier,
    /// GTFS code: 1 = bikes allowed, anything else = not
    pub bikes_allowed: u8,
}

/// Link between a trip and a stop it serves (GTFS `stop_times.txt`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StopTime {
    pub trip_id: TripIdentifier,
    pub stop_id: StopIdentifier,
}

// ============================================================================
// Resolved records
// ============================================================================

/// A projected stop
///
/// Stops are compared and ordered by id only.
#[derive(Clone, Debug)]
pub struct Stop {
    pub id: StopIdentifier,
    pub location: Location,
    pub accessible: bool,
}

impl Stop {
    pub fn new(id: impl Into<StopIdentifier>, location: Location, accessible: bool) -> Self {
        Self {
            id: id.into(),
            location,
            accessible,
        }
    }

    /// Project a raw stop row through `reference`
    pub fn from_record(record: &StopRecord, reference: &GeoReference) -> Result<Self> {
        let location = reference.project(record.lat, record.lon).map_err(|err| {
            TransitError::InvalidInput(format!("stop {}: {}", record.id, err))
        })?;

        Ok(Self {
            id: record.id.clone(),
            location,
            accessible: record.wheelchair_boarding == 1,
        })
    }

    /// Coordinate along `axis`
    pub fn coordinate(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.location.x(),
            Axis::Y => self.location.y(),
        }
    }
}

impl PartialEq for Stop {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Stop {}

impl PartialOrd for Stop {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Stop {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// A trip running on a resolved service day
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Trip {
    pub id: TripIdentifier,
    pub route_short_name: RouteIdentifier,
    pub bikes_allowed: bool,
}

impl From<&TripRecord> for Trip {
    fn from(record: &TripRecord) -> Self {
        Self {
            id: record.id.clone(),
            route_short_name: record.route_short_name.clone(),
            bikes_allowed: record.bikes_allowed == 1,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Invalid {axis} range: lower bound {lower} exceeds upper bound {upper}")]
    InvalidRange { axis: Axis, lower: f64, upper: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Stop not found: {0}")]
    StopNotFound(StopIdentifier),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_from_record() {
        let reference = GeoReference::MADISON_CAPITOL;
        let record = StopRecord::new("10", reference.lat, reference.lon - 0.01, 1);

        let stop = Stop::from_record(&record, &reference).unwrap();
        assert_eq!(stop.id.as_str(), "10");
        assert!(stop.accessible);
        assert!(stop.coordinate(Axis::X) < 0.0);
        assert_eq!(stop.coordinate(Axis::Y), 0.0);

        let inaccessible = StopRecord::new("11", reference.lat, reference.lon, 2);
        assert!(!Stop::from_record(&inaccessible, &reference).unwrap().accessible);
    }

    #[test]
    fn test_stop_from_record_names_bad_stop() {
        let record = StopRecord::new("bad", f64::NAN, 0.0, 0);
        let err = Stop::from_record(&record, &GeoReference::default()).unwrap_err();
        assert!(err.to_string().contains("stop bad"));
    }

    #[test]
    fn test_stops_order_by_id() {
        let mut stops = vec![
            Stop::new("c", Location::origin(), false),
            Stop::new("a", Location::from_xy(5.0, 5.0).unwrap(), true),
            Stop::new("b", Location::origin(), false),
        ];
        stops.sort();

        let ids: Vec<&str> = stops.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_trip_from_record() {
        let record = TripRecord {
            id: TripIdentifier::new("t1"),
            route_short_name: RouteIdentifier::new("80"),
            service_id: ServiceIdentifier::new("wk"),
            bikes_allowed: 1,
        };
        let trip = Trip::from(&record);
        assert!(trip.bikes_allowed);
        assert_eq!(trip.route_short_name.as_str(), "80");

        let no_bikes = TripRecord {
            bikes_allowed: 0,
            ..record
        };
        assert!(!Trip::from(&no_bikes).bikes_allowed);
    }

    #[test]
    fn test_error_messages() {
        let err = TransitError::InvalidRange {
            axis: Axis::X,
            lower: 2.0,
            upper: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid x range: lower bound 2 exceeds upper bound 1"
        );
    }
}

//! A resolved service day: the trips and stops that run on one date.
//!
//! Resolution is a straight filter pipeline over tables the ingestion side
//! has already loaded:
//!
//! 1. services whose calendar runs on the date
//! 2. trips belonging to those services
//! 3. stops visited by those trips, projected and indexed
//!
//! The resulting [`ServiceDay`] owns a [`StopIndex`] over exactly those
//! stops and forwards spatial queries to it.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::IndexConfig;
use crate::identifiers::*;
use crate::models::calendar::ServiceCalendar;
use crate::models::types::*;
use crate::spatial::index::StopIndex;
use crate::spatial::location::Location;
use crate::spatial::queries::Bounds;
use crate::spatial::tree::Boundaries;

/// In-memory feed tables handed over by the ingestion collaborator
#[derive(Clone, Debug, Default)]
pub struct FeedTables {
    pub calendars: Vec<ServiceCalendar>,
    pub trips: Vec<TripRecord>,
    pub stop_times: Vec<StopTime>,
    pub stops: Vec<StopRecord>,
}

impl FeedTables {
    /// Fail on the first stop time whose stop is missing from the stop table
    ///
    /// [`ServiceDay::new`] skips such rows; call this first to reject them.
    pub fn check_references(&self) -> Result<()> {
        let known: HashSet<&StopIdentifier> = self.stops.iter().map(|stop| &stop.id).collect();
        match self
            .stop_times
            .iter()
            .find(|stop_time| !known.contains(&stop_time.stop_id))
        {
            Some(stop_time) => Err(TransitError::StopNotFound(stop_time.stop_id.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct ServiceDay {
    date: NaiveDate,
    service_ids: Vec<ServiceIdentifier>,
    trip_ids: Vec<TripIdentifier>,
    /// Active trips keyed by id
    trips: BTreeMap<TripIdentifier, Trip>,
    index: StopIndex,
}

impl ServiceDay {
    pub fn new(date: NaiveDate, feed: &FeedTables, config: IndexConfig) -> Result<Self> {
        config.validate()?;

        let mut service_ids: Vec<ServiceIdentifier> = feed
            .calendars
            .iter()
            .filter(|calendar| calendar.runs_on(date))
            .map(|calendar| calendar.service_id.clone())
            .collect();
        service_ids.sort();
        service_ids.dedup();

        let active_services: HashSet<&ServiceIdentifier> = service_ids.iter().collect();

        let mut trips = BTreeMap::new();
        let mut trip_ids = Vec::new();
        for record in &feed.trips {
            if active_services.contains(&record.service_id) {
                trip_ids.push(record.id.clone());
                trips
                    .entry(record.id.clone())
                    .or_insert_with(|| Trip::from(record));
            }
        }
        let active_trips: HashSet<&TripIdentifier> = trip_ids.iter().collect();

        let stop_table: HashMap<&StopIdentifier, &StopRecord> =
            feed.stops.iter().map(|stop| (&stop.id, stop)).collect();

        let mut visited: BTreeMap<&StopIdentifier, &StopRecord> = BTreeMap::new();
        for stop_time in &feed.stop_times {
            if !active_trips.contains(&stop_time.trip_id) {
                continue;
            }
            match stop_table.get(&stop_time.stop_id) {
                Some(&record) => {
                    visited.insert(&record.id, record);
                }
                None => warn!(
                    trip = %stop_time.trip_id,
                    stop = %stop_time.stop_id,
                    "stop time references unknown stop, skipping"
                ),
            }
        }

        let stops = visited
            .values()
            .map(|record| Stop::from_record(record, &config.reference))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            %date,
            services = service_ids.len(),
            trips = trip_ids.len(),
            stops = stops.len(),
            "resolved service day"
        );

        Ok(Self {
            date,
            service_ids,
            trip_ids,
            trips,
            index: StopIndex::with_config(stops, config)?,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Services running on this date, sorted
    pub fn service_ids(&self) -> &[ServiceIdentifier] {
        &self.service_ids
    }

    /// Trip ids of active services, in feed order
    pub fn trip_ids(&self) -> &[TripIdentifier] {
        &self.trip_ids
    }

    /// Active trips sorted by id, optionally limited to one route
    pub fn trips(&self, route: Option<&str>) -> Vec<&Trip> {
        self.trips
            .values()
            .filter(|trip| route.map_or(true, |name| trip.route_short_name.as_str() == name))
            .collect()
    }

    /// Stops served on this date, sorted by id
    pub fn stops(&self) -> &[Arc<Stop>] {
        self.index.stops()
    }

    pub fn index(&self) -> &StopIndex {
        &self.index
    }

    pub fn stops_in_rect(&self, x_range: (f64, f64), y_range: (f64, f64)) -> Result<Vec<Arc<Stop>>> {
        self.index.query_rect(x_range, y_range)
    }

    pub fn stops_in_radius(&self, center: Location, radius: f64) -> Result<Vec<Arc<Stop>>> {
        self.index.query_circle(center, radius)
    }

    /// Served stops split into (accessible, not accessible), each sorted by id
    pub fn stops_by_accessibility(&self) -> (Vec<Arc<Stop>>, Vec<Arc<Stop>>) {
        self.index
            .stops()
            .iter()
            .cloned()
            .partition(|stop| stop.accessible)
    }

    pub fn boundaries(&self, bounds: Bounds) -> Boundaries<'_> {
        self.index.traverse_boundaries(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::WeekdayFlags;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trip(id: &str, route: &str, service: &str, bikes: u8) -> TripRecord {
        TripRecord {
            id: TripIdentifier::new(id),
            route_short_name: RouteIdentifier::new(route),
            service_id: ServiceIdentifier::new(service),
            bikes_allowed: bikes,
        }
    }

    fn stop_time(trip: &str, stop: &str) -> StopTime {
        StopTime {
            trip_id: TripIdentifier::new(trip),
            stop_id: StopIdentifier::new(stop),
        }
    }

    fn feed() -> FeedTables {
        let lat = 43.074683;
        let lon = -89.384261;

        FeedTables {
            calendars: vec![
                ServiceCalendar::new(
                    "weekday",
                    date(2024, 1, 1),
                    date(2024, 12, 31),
                    WeekdayFlags::from_gtfs([1, 1, 1, 1, 1, 0, 0]),
                )
                .unwrap(),
                ServiceCalendar::new(
                    "weekend",
                    date(2024, 1, 1),
                    date(2024, 12, 31),
                    WeekdayFlags::from_gtfs([0, 0, 0, 0, 0, 1, 1]),
                )
                .unwrap(),
            ],
            trips: vec![
                trip("t2", "80", "weekday", 1),
                trip("t1", "2", "weekday", 0),
                trip("t3", "80", "weekend", 1),
            ],
            stop_times: vec![
                stop_time("t1", "s1"),
                stop_time("t1", "s2"),
                stop_time("t2", "s2"),
                stop_time("t2", "s3"),
                stop_time("t2", "ghost"),
                stop_time("t3", "s4"),
            ],
            stops: vec![
                StopRecord::new("s1", lat, lon, 1),
                StopRecord::new("s2", lat + 0.01, lon + 0.01, 0),
                StopRecord::new("s3", lat - 0.01, lon - 0.01, 1),
                StopRecord::new("s4", lat + 0.02, lon, 0),
            ],
        }
    }

    fn ids(stops: &[Arc<Stop>]) -> Vec<&str> {
        stops.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_weekday_resolution() {
        // 2024-03-05 is a Tuesday
        let day = ServiceDay::new(date(2024, 3, 5), &feed(), IndexConfig::default()).unwrap();

        let services: Vec<&str> = day.service_ids().iter().map(|s| s.as_str()).collect();
        assert_eq!(services, vec!["weekday"]);

        let trips: Vec<&str> = day.trip_ids().iter().map(|t| t.as_str()).collect();
        assert_eq!(trips, vec!["t2", "t1"]);

        assert_eq!(ids(day.stops()), vec!["s1", "s2", "s3"]);
        assert_eq!(day.date(), date(2024, 3, 5));
    }

    #[test]
    fn test_weekend_resolution() {
        // 2024-03-09 is a Saturday
        let day = ServiceDay::new(date(2024, 3, 9), &feed(), IndexConfig::default()).unwrap();
        assert_eq!(ids(day.stops()), vec!["s4"]);
        assert_eq!(day.trips(None).len(), 1);
    }

    #[test]
    fn test_no_service() {
        let day = ServiceDay::new(date(2025, 3, 5), &feed(), IndexConfig::default()).unwrap();
        assert!(day.service_ids().is_empty());
        assert!(day.stops().is_empty());
        assert!(day.stops_in_rect((-10.0, 10.0), (-10.0, 10.0)).unwrap().is_empty());
    }

    #[test]
    fn test_trips_sorted_and_filtered() {
        // A repeated trip row keeps the first occurrence
        let mut tables = feed();
        tables.trips.push(trip("t2", "80", "weekday", 0));

        let day = ServiceDay::new(date(2024, 3, 5), &tables, IndexConfig::default()).unwrap();
        assert_eq!(day.trip_ids().len(), 3);

        let all: Vec<&str> = day.trips(None).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(all, vec!["t1", "t2"]);

        let route_80 = day.trips(Some("80"));
        assert_eq!(route_80.len(), 1);
        assert!(route_80[0].bikes_allowed);

        assert!(day.trips(Some("99")).is_empty());
    }

    #[test]
    fn test_spatial_queries() {
        let day = ServiceDay::new(date(2024, 3, 5), &feed(), IndexConfig::default()).unwrap();

        // s2 is north-east of the capitol, s3 south-west
        let north_east = day.stops_in_rect((0.1, 10.0), (0.1, 10.0)).unwrap();
        assert_eq!(ids(&north_east), vec!["s2"]);

        let near = day.stops_in_radius(Location::origin(), 0.5).unwrap();
        assert_eq!(ids(&near), vec!["s1"]);

        let wide = day.stops_in_radius(Location::origin(), 5.0).unwrap();
        assert_eq!(ids(&wide), vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn test_stops_by_accessibility() {
        let day = ServiceDay::new(date(2024, 3, 5), &feed(), IndexConfig::default()).unwrap();
        let (accessible, inaccessible) = day.stops_by_accessibility();
        assert_eq!(ids(&accessible), vec!["s1", "s3"]);
        assert_eq!(ids(&inaccessible), vec!["s2"]);
    }

    #[test]
    fn test_boundaries_match_split_count() {
        let day = ServiceDay::new(date(2024, 3, 5), &feed(), IndexConfig::default()).unwrap();
        let bounds = Bounds::new(-5.0, 5.0, -5.0, 5.0).unwrap();
        assert_eq!(day.boundaries(bounds).count(), day.index().split_count());
    }

    #[test]
    fn test_check_references() {
        let mut tables = feed();
        match tables.check_references() {
            Err(TransitError::StopNotFound(id)) => assert_eq!(id.as_str(), "ghost"),
            other => panic!("expected StopNotFound, got {:?}", other),
        }

        tables.stop_times.retain(|st| st.stop_id.as_str() != "ghost");
        assert!(tables.check_references().is_ok());
    }

    #[test]
    fn test_bad_stop_coordinate_fails() {
        let mut tables = feed();
        tables.stops[0].lat = f64::NAN;
        assert!(matches!(
            ServiceDay::new(date(2024, 3, 5), &tables, IndexConfig::default()),
            Err(TransitError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_service_day_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ServiceDay>();
    }
}

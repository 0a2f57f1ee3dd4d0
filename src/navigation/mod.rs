pub mod eta;
pub(crate) mod navigator;
pub(crate) mod state;

pub use navigator::Navigator;
pub use state::{CameraState, NavigationState, RenderState, ZoomLevel};

use serde::{Deserialize, Serialize};

use crate::{
    directions::RouteUpdate,
    location::{LocationEvent, PositionFix},
};

/// Mean earth radius used for haversine distances
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Default destination, used when the config file does not override it.
pub const DEFAULT_DESTINATION: Coordinate = Coordinate {
    latitude: 31.498437202160208,
    longitude: 74.3231083674502,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Placeholder position used until the first real fix arrives.
    pub const SENTINEL: Coordinate = Coordinate {
        latitude: 0.,
        longitude: 0.,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.latitude == 0. && self.longitude == 0.
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Great-circle distance in meters.
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.).sin().powi(2);
        2. * EARTH_RADIUS_M * a.sqrt().asin()
    }

    /// `[longitude, latitude]`, the GeoJSON axis order.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl From<&PositionFix> for Coordinate {
    fn from(value: &PositionFix) -> Self {
        Coordinate::new(value.latitude, value.longitude)
    }
}

/// A decoded driving route. Always replaced as a whole.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Route geometry as `[longitude, latitude]` pairs
    pub coordinates: Vec<[f64; 2]>,
    /// Total travel time in seconds
    pub duration_s: f64,
    /// Display string derived from `duration_s`
    pub eta: String,
    /// One instruction per step of the first leg
    pub instructions: Vec<String>,
}

/// Everything the navigator reacts to, delivered over a single channel.
#[derive(Clone, Debug)]
pub enum NavigationEvent {
    Location(LocationEvent),
    Route(RouteUpdate),
}

impl From<LocationEvent> for NavigationEvent {
    fn from(value: LocationEvent) -> Self {
        NavigationEvent::Location(value)
    }
}

impl From<RouteUpdate> for NavigationEvent {
    fn from(value: RouteUpdate) -> Self {
        NavigationEvent::Route(value)
    }
}

/// Entries written by the navigation recorder, one JSON object per line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NavigationOutput {
    Position(PositionFix),
    Route { seq: u64, route: Route },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_exact_origin() {
        assert!(Coordinate::SENTINEL.is_sentinel());
        assert!(Coordinate::new(-0., 0.).is_sentinel());
        assert!(!Coordinate::new(0., 0.000001).is_sentinel());
        assert!(!Coordinate::new(0.000001, 0.).is_sentinel());
    }

    #[test]
    fn test_distance_m() {
        let a = Coordinate::new(31.5, 74.3);
        assert_eq!(a.distance_m(&a), 0.);

        // one degree of latitude is roughly 111 km
        let b = Coordinate::new(32.5, 74.3);
        let d = a.distance_m(&b);
        assert!((d - 111_195.).abs() < 100., "unexpected distance {}", d);
    }

    #[test]
    fn test_navigation_output_serialization() {
        let output = NavigationOutput::Route {
            seq: 3,
            route: Route {
                coordinates: vec![[74.3, 31.5]],
                duration_s: 65.,
                eta: "00:01:5".to_string(),
                instructions: vec!["Drive north".to_string()],
            },
        };
        let line = serde_json::to_string(&output).unwrap();
        let parsed: NavigationOutput = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, output);
    }
}

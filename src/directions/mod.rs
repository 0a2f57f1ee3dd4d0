pub mod mapbox;
pub(crate) mod refresher;
pub mod stored;

pub use mapbox::{DirectionsConfig, MapboxDirections, decode_route, request_url};
pub use refresher::{refresh_routes, spawn_refresher};
pub use stored::StoredDirections;

use crate::{HomeboundError, navigation::{Coordinate, Route}};

/// A source of driving routes.
pub trait DirectionsProvider {
    /// Fetch a route from `start` to `end`.
    ///
    /// Returns `Ok(None)` when the service answered but found no route.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    fn route(&mut self, start: Coordinate, end: Coordinate) -> Result<Option<Route>, HomeboundError>;
}

/// A request for a fresh route, numbered in the order it was issued.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteRequest {
    pub seq: u64,
    pub start: Coordinate,
    pub end: Coordinate,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouteOutcome {
    Found(Route),
    NoRoute,
    Failed(String),
}

/// The answer to the [`RouteRequest`] with the same `seq`.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteUpdate {
    pub seq: u64,
    pub outcome: RouteOutcome,
}

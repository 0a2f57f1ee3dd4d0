use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    HomeboundError,
    navigation::{Coordinate, Route, eta::format_eta},
};

use super::DirectionsProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";
pub const DEFAULT_PROFILE: &str = "mapbox/driving-traffic";
const REQUEST_TIMEOUT_S: u64 = 20;
const REDACTED: &str = "<redacted>";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub profile: String,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
        }
    }
}

// Subset of the Directions API v5 response we rely on
#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Deserialize)]
struct ApiRoute {
    geometry: ApiGeometry,
    duration: f64,
    #[serde(default)]
    legs: Vec<ApiLeg>,
}

#[derive(Deserialize)]
struct ApiGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct ApiLeg {
    #[serde(default)]
    steps: Vec<ApiStep>,
}

#[derive(Deserialize)]
struct ApiStep {
    maneuver: ApiManeuver,
}

#[derive(Deserialize)]
struct ApiManeuver {
    instruction: String,
}

/// Build the Directions API URL for a route from `start` to `end`.
///
/// Negative zero is written as `0`.
pub fn request_url(
    base_url: &str,
    profile: &str,
    start: Coordinate,
    end: Coordinate,
    access_token: &str,
) -> String {
    format!(
        "{}/directions/v5/{}/{},{};{},{}?geometries=geojson&overview=full&steps=true&access_token={}",
        base_url.trim_end_matches('/'),
        profile.trim_matches('/'),
        start.longitude + 0.,
        start.latitude + 0.,
        end.longitude + 0.,
        end.latitude + 0.,
        access_token
    )
}

/// Decode a Directions API response body.
///
/// Only the first route is used: its geometry, its duration and the step
/// instructions of its first leg. A response without routes yields `None`.
///
/// # Errors
///
/// Returns an error if the body is not a valid response, if the first route
/// has no legs, or if its duration is negative or not finite.
pub fn decode_route(body: &str) -> Result<Option<Route>, HomeboundError> {
    let response: DirectionsResponse = serde_json::from_str(body)
        .map_err(|e| HomeboundError::DirectionsDecodeError { source: e })?;

    let Some(route) = response.routes.into_iter().next() else {
        return Ok(None);
    };

    let eta = format_eta(route.duration)?;
    let leg = route
        .legs
        .into_iter()
        .next()
        .ok_or(HomeboundError::InvalidRouteResponse {
            reason: "route has no legs".to_string(),
        })?;

    Ok(Some(Route {
        coordinates: route.geometry.coordinates,
        duration_s: route.duration,
        eta,
        instructions: leg
            .steps
            .into_iter()
            .map(|step| step.maneuver.instruction)
            .collect(),
    }))
}

/// Directions client for the Mapbox Directions API.
///
/// Requests are blocking: each call drives the async HTTP client on a private
/// current-thread runtime, so the client is meant to live on a worker thread.
pub struct MapboxDirections {
    config: DirectionsConfig,
    access_token: String,
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
}

impl MapboxDirections {
    pub fn new(config: DirectionsConfig, access_token: String) -> Result<Self, HomeboundError> {
        if access_token.trim().is_empty() {
            return Err(HomeboundError::MissingAccessToken);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| HomeboundError::RuntimeInitError { source: e })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_S))
            .build()
            .map_err(|e| HomeboundError::DirectionsRequestError { source: e })?;

        Ok(Self {
            config,
            access_token,
            runtime,
            client,
        })
    }

    pub fn request_url(&self, start: Coordinate, end: Coordinate) -> String {
        request_url(
            &self.config.base_url,
            &self.config.profile,
            start,
            end,
            &self.access_token,
        )
    }

    fn fetch(&self, url: &str) -> Result<String, HomeboundError> {
        self.runtime.block_on(async {
            // without_url keeps the access token out of error messages
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| HomeboundError::DirectionsRequestError {
                    source: e.without_url(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(HomeboundError::DirectionsStatusError {
                    status: status.as_u16(),
                });
            }

            response
                .text()
                .await
                .map_err(|e| HomeboundError::DirectionsRequestError {
                    source: e.without_url(),
                })
        })
    }
}

impl DirectionsProvider for MapboxDirections {
    fn route(&mut self, start: Coordinate, end: Coordinate) -> Result<Option<Route>, HomeboundError> {
        let url = self.request_url(start, end);
        debug!("Requesting route: {}", url.replace(&self.access_token, REDACTED));

        let body = self.fetch(&url)?;
        decode_route(&body)
    }
}

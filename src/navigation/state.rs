use serde::{Deserialize, Serialize};

use super::{Coordinate, Route};

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;
pub const DEFAULT_ZOOM: u8 = 14;
pub(crate) const CAMERA_ANIMATION_MS: u64 = 1000;

/// Map zoom level, always within `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    pub fn new(level: u8) -> Self {
        Self(level.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn zoom_in(&mut self) {
        *self = Self::new(self.0.saturating_add(1));
    }

    pub fn zoom_out(&mut self) {
        *self = Self::new(self.0.saturating_sub(1));
    }

    /// Width of the visible map area in degrees of longitude.
    pub fn span_degrees(&self) -> f64 {
        360. / 2f64.powi(self.0 as i32)
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(DEFAULT_ZOOM)
    }
}

impl From<u8> for ZoomLevel {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<ZoomLevel> for u8 {
    fn from(value: ZoomLevel) -> Self {
        value.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    pub center: Coordinate,
    pub zoom: ZoomLevel,
    pub animation_ms: u64,
}

/// Everything a front end needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    /// Route geometry as `[longitude, latitude]`, only when there is something to draw
    pub route_line: Option<Vec<[f64; 2]>>,
    /// Current driver position, hidden until the first fix
    pub driver_marker: Option<Coordinate>,
    pub destination_marker: Coordinate,
    pub eta_text: String,
    pub directions: Vec<String>,
    pub camera: CameraState,
}

/// The application state, owned by the [`super::Navigator`].
#[derive(Clone, Debug)]
pub struct NavigationState {
    pub(crate) position: Coordinate,
    pub(crate) destination: Coordinate,
    pub(crate) route: Option<Route>,
    pub(crate) zoom: ZoomLevel,
}

impl NavigationState {
    pub fn new(destination: Coordinate, zoom: ZoomLevel) -> Self {
        Self {
            position: Coordinate::SENTINEL,
            destination,
            route: None,
            zoom,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn zoom_in(&mut self) {
        self.zoom.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.zoom.zoom_out();
    }

    pub fn render(&self) -> RenderState {
        let route_line = self
            .route
            .as_ref()
            .filter(|route| !route.coordinates.is_empty())
            .map(|route| route.coordinates.clone());
        let driver_marker = (!self.position.is_sentinel()).then_some(self.position);

        RenderState {
            route_line,
            driver_marker,
            destination_marker: self.destination,
            eta_text: self
                .route
                .as_ref()
                .map(|route| route.eta.clone())
                .unwrap_or_default(),
            directions: self
                .route
                .as_ref()
                .map(|route| route.instructions.clone())
                .unwrap_or_default(),
            camera: CameraState {
                center: driver_marker.unwrap_or(self.destination),
                zoom: self.zoom,
                animation_ms: CAMERA_ANIMATION_MS,
            },
        }
    }
}

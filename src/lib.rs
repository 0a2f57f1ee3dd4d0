// Library interface for homebound
// This allows integration tests to access internal modules

pub mod config;
pub mod directions;
pub mod errors;
pub mod location;
pub mod navigation;
pub mod writer;

// Re-export commonly used types
pub use config::AppConfig;
pub use directions::{DirectionsProvider, MapboxDirections, RouteOutcome, RouteRequest, RouteUpdate};
pub use errors::HomeboundError;
pub use location::{LocationEvent, LocationOptions, LocationProvider, LocationWatcher, PositionFix};
pub use navigation::{
    Coordinate, NavigationEvent, NavigationOutput, NavigationState, Navigator, RenderState, Route,
    ZoomLevel, eta::format_eta, eta::format_eta_seconds,
};

pub mod permission;
pub mod replay;
pub(crate) mod watcher;

use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use crate::{HomeboundError, navigation::NavigationEvent};

pub use permission::{
    PermissionKind, PermissionPrompter, PermissionRationale, PermissionStatus,
    StaticPermissionPrompter,
};
pub use replay::ReplayLocationProvider;
pub use watcher::LocationWatcher;

/// A single position report from a location provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Horizontal accuracy radius in meters
    pub accuracy_m: f64,
    /// Time of the fix, milliseconds since the unix epoch
    pub timestamp_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LocationEvent {
    Fix(PositionFix),
    /// The stream hit an error but keeps running
    Error(String),
    /// The provider has no more fixes to deliver
    Finished,
}

/// Subscription settings handed to the location provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationOptions {
    pub high_accuracy: bool,
    /// Minimum movement before a new fix is reported
    pub min_distance_m: f64,
    /// Minimum time between two reported fixes
    pub min_interval_ms: u64,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            min_distance_m: 5.,
            min_interval_ms: 5000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchHandle(pub u64);

/// A source of device positions.
///
/// Providers push [`LocationEvent`]s into the sink from their own thread until
/// the matching [`LocationProvider::unsubscribe`] call.
pub trait LocationProvider {
    /// Start delivering position events to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying position source cannot be started.
    fn subscribe(
        &mut self,
        options: &LocationOptions,
        sink: Sender<NavigationEvent>,
    ) -> Result<WatchHandle, HomeboundError>;

    /// Stop delivering events for `handle`.
    ///
    /// # Errors
    ///
    /// Returns an error if `handle` is not an active subscription.
    fn unsubscribe(&mut self, handle: WatchHandle) -> Result<(), HomeboundError>;
}

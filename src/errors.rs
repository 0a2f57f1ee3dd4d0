// Error types for homebound

use crate::directions::RouteRequest;
use snafu::Snafu;
use std::{io, sync::mpsc::SendError};

#[derive(Debug, Snafu)]
pub enum HomeboundError {
    // Errors for the location watcher
    #[snafu(display("Location permission request failed: {reason}"))]
    PermissionRequestFailed { reason: String },
    #[snafu(display("Could not subscribe to location updates: {reason}"))]
    LocationSubscriptionError { reason: String },

    // Errors for the directions client
    #[snafu(display("Error sending directions request: {source}"))]
    DirectionsRequestError { source: reqwest::Error },
    #[snafu(display("Directions service answered with HTTP {status}"))]
    DirectionsStatusError { status: u16 },
    #[snafu(display("Error decoding directions response: {source}"))]
    DirectionsDecodeError { source: serde_json::Error },
    #[snafu(display("Invalid route in directions response: {reason}"))]
    InvalidRouteResponse { reason: String },
    #[snafu(display("Invalid route duration: {value}"))]
    InvalidDuration { value: f64 },
    #[snafu(display("Missing Mapbox access token, set MAPBOX_ACCESS_TOKEN"))]
    MissingAccessToken,
    #[snafu(display("Error reading stored directions response"))]
    DirectionsFileError { source: io::Error },
    #[snafu(display("Could not start the directions runtime"))]
    RuntimeInitError { source: io::Error },

    // Errors while dispatching route requests
    #[snafu(display("Error dispatching route request #{}", source.0.seq))]
    RouteRequestBroadcastError { source: Box<SendError<RouteRequest>> },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Recorder and replay errors
    #[snafu(display("Error reading replay file"))]
    ReplayFileError { source: io::Error },
    #[snafu(display("Error writing navigation record"))]
    WriterError { source: io::Error },
}

impl From<SendError<RouteRequest>> for HomeboundError {
    fn from(value: SendError<RouteRequest>) -> Self {
        HomeboundError::RouteRequestBroadcastError {
            source: Box::new(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Coordinate;
    use std::sync::mpsc;

    #[test]
    fn test_send_error_converts_to_broadcast_error() {
        let (tx, rx) = mpsc::channel::<RouteRequest>();
        drop(rx);
        let request = RouteRequest {
            seq: 4,
            start: Coordinate::new(31.4, 74.2),
            end: Coordinate::new(31.5, 74.3),
        };

        let error = HomeboundError::from(tx.send(request).unwrap_err());
        assert!(matches!(
            error,
            HomeboundError::RouteRequestBroadcastError { .. }
        ));
        assert_eq!(error.to_string(), "Error dispatching route request #4");
    }
}

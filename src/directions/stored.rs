use std::path::Path;

use log::info;

use crate::{
    HomeboundError,
    navigation::{Coordinate, Route},
};

use super::{DirectionsProvider, decode_route};

/// Serves a previously saved Directions API response for every request.
///
/// Lets the display run offline, without an access token, against a route
/// captured earlier.
pub struct StoredDirections {
    route: Option<Route>,
}

impl StoredDirections {
    /// # Errors
    ///
    /// Returns an error if `body` is not a valid Directions API response.
    pub fn from_body(body: &str) -> Result<Self, HomeboundError> {
        Ok(Self {
            route: decode_route(body)?,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// Directions API response.
    pub fn from_file(file: &Path) -> Result<Self, HomeboundError> {
        let body = std::fs::read_to_string(file)
            .map_err(|e| HomeboundError::DirectionsFileError { source: e })?;
        let stored = Self::from_body(&body)?;
        info!(
            "Loaded stored directions from {:?} ({} instructions)",
            file,
            stored.route.as_ref().map_or(0, |r| r.instructions.len())
        );
        Ok(stored)
    }
}

impl DirectionsProvider for StoredDirections {
    fn route(&mut self, _start: Coordinate, _end: Coordinate) -> Result<Option<Route>, HomeboundError> {
        Ok(self.route.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_directions_serves_same_route() {
        let mut stored = StoredDirections::from_body(
            r#"{"routes": [{"geometry": {"coordinates": [[74.3, 31.5]]}, "duration": 65, "legs": [{"steps": [{"maneuver": {"instruction": "Arrive"}}]}]}]}"#,
        )
        .unwrap();

        let first = stored
            .route(Coordinate::new(1., 1.), Coordinate::new(2., 2.))
            .unwrap()
            .unwrap();
        let second = stored
            .route(Coordinate::new(3., 3.), Coordinate::new(2., 2.))
            .unwrap()
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.eta, "00:01:5");
    }

    #[test]
    fn test_stored_directions_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("directions.json");
        std::fs::write(&path, r#"{"routes": []}"#).unwrap();

        let mut stored = StoredDirections::from_file(&path).unwrap();
        assert_eq!(
            stored
                .route(Coordinate::new(1., 1.), Coordinate::new(2., 2.))
                .unwrap(),
            None
        );
        assert!(matches!(
            StoredDirections::from_file(&dir.path().join("missing.json")),
            Err(HomeboundError::DirectionsFileError { .. })
        ));
    }
}

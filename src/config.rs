use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    HomeboundError,
    directions::DirectionsConfig,
    location::LocationOptions,
    navigation::{Coordinate, DEFAULT_DESTINATION, ZoomLevel},
};

const CONFIG_DIR_NAME: &str = "homebound";
const CONFIG_FILE_NAME: &str = "config.json";
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";
const DEFAULT_DRIVER_IMAGE_URL: &str = "https://randomuser.me/api/portraits/men/1.jpg";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub destination: Coordinate,
    pub zoom: ZoomLevel,
    pub location: LocationOptions,
    pub directions: DirectionsConfig,
    pub driver_image_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION,
            zoom: ZoomLevel::default(),
            location: LocationOptions::default(),
            directions: DirectionsConfig::default(),
            driver_image_url: Some(DEFAULT_DRIVER_IMAGE_URL.to_string()),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        Some(
            dirs::config_dir()?
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        )
    }

    pub fn from_local_file() -> Option<Self> {
        Self::from_file(&Self::default_path()?)
    }

    /// Load the config stored at `config_path`. A missing or unreadable file
    /// yields `None`.
    pub fn from_file(config_path: &Path) -> Option<Self> {
        if !config_path.exists() {
            return None;
        }

        let file = std::fs::File::open(config_path)
            .map_err(|e| warn!("Could not open config file {:?}: {}", config_path, e))
            .ok()?;
        serde_json::from_reader(file)
            .map_err(|e| warn!("Could not parse config file {:?}: {}", config_path, e))
            .ok()
    }

    pub fn save(&self) -> Result<(), HomeboundError> {
        let config_path = Self::default_path().ok_or(HomeboundError::NoConfigDir)?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), HomeboundError> {
        if let Some(parent) = config_path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| HomeboundError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| HomeboundError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| HomeboundError::ConfigSerializeError { source: e })
    }

    /// The Mapbox access token, read from `MAPBOX_ACCESS_TOKEN` at run time or,
    /// failing that, at build time. It is never stored in the config file.
    pub fn access_token() -> Result<String, HomeboundError> {
        resolve_access_token(
            std::env::var(ACCESS_TOKEN_ENV).ok(),
            option_env!("MAPBOX_ACCESS_TOKEN"),
        )
    }
}

fn resolve_access_token(
    runtime: Option<String>,
    build_time: Option<&str>,
) -> Result<String, HomeboundError> {
    runtime
        .filter(|token| !token.trim().is_empty())
        .or_else(|| {
            build_time
                .filter(|token| !token.trim().is_empty())
                .map(str::to_string)
        })
        .ok_or(HomeboundError::MissingAccessToken)
}

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON, DEFAULT_FLASH_DURATION_MS, DEFAULT_TILE_URL,
    DEFAULT_USER_AGENT, DEFAULT_ZOOM, MAX_FLASH_DURATION_MS, MAX_ZOOM, MIN_FLASH_DURATION_MS,
    MIN_ZOOM,
};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfigData {
    /// Raster tile URL template with `{z}`, `{x}` and `{y}` placeholders
    pub tile_url: String,

    /// User agent sent with every tile request
    pub user_agent: String,

    /// Darken base map tiles (grayscale + invert)
    pub night_filter: bool,

    /// Initial view center longitude in degrees
    pub start_lon: f64,

    /// Initial view center latitude in degrees
    pub start_lat: f64,

    /// Initial zoom level
    pub start_zoom: f64,

    /// Length of the flash animation played when a feature is added
    pub flash_duration_ms: u64,

    /// Restart the flash animation each time it completes instead of playing it once
    pub flash_repeat: bool,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            tile_url: DEFAULT_TILE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            night_filter: true,
            start_lon: DEFAULT_CENTER_LON,
            start_lat: DEFAULT_CENTER_LAT,
            start_zoom: DEFAULT_ZOOM,
            flash_duration_ms: DEFAULT_FLASH_DURATION_MS,
            flash_repeat: false,
        }
    }
}

impl AppConfigData {
    /// Flash duration in seconds, clamped to the supported range
    pub fn flash_duration_secs(&self) -> f64 {
        self.flash_duration_ms
            .clamp(MIN_FLASH_DURATION_MS, MAX_FLASH_DURATION_MS) as f64
            / 1000.0
    }

    /// Start zoom clamped to the navigable zoom range
    pub fn start_zoom(&self) -> f64 {
        if self.start_zoom.is_finite() {
            self.start_zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            DEFAULT_ZOOM
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Result of loading config from disk
struct LoadConfigResult {
    data: AppConfigData,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
    /// No file was found and defaults should be written
    missing: bool,
}

/// Parse config JSON, falling back to defaults on error
fn parse_config(json: &str) -> Result<AppConfigData, String> {
    serde_json::from_str(json).map_err(|e| format!("Configuration file was corrupted: {}", e))
}

/// Load configuration from disk
fn load_config(config_path: &std::path::Path) -> LoadConfigResult {
    if !config_path.exists() {
        info!("No config file found, using defaults");
        return LoadConfigResult {
            data: AppConfigData::default(),
            reset_reason: None,
            missing: true,
        };
    }

    let (data, reset_reason) = match std::fs::read_to_string(config_path) {
        Ok(json) => match parse_config(&json) {
            Ok(data) => {
                info!("Loaded config from {:?}", config_path);
                (data, None)
            }
            Err(reason) => {
                warn!("Failed to parse config file: {}", reason);
                (AppConfigData::default(), Some(reason))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Could not read configuration file: {}", e)),
            )
        }
    };

    LoadConfigResult {
        data,
        reset_reason,
        missing: false,
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    if let Err(e) = crate::paths::ensure_config_dir() {
        error!("Failed to create config directory: {}", e);
        return;
    }

    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config(&config.config_path);
    config.data = result.data;

    // Write defaults on first run so the file can be edited by hand
    if result.missing {
        save_config(&config);
    }

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.tile_url, DEFAULT_TILE_URL);
        assert!(data.night_filter);
        assert!(!data.flash_repeat);
        assert_eq!(data.flash_duration_ms, 3000);
        assert_eq!(data.start_zoom, 10.0);
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            tile_url: "https://tiles.example.com/{z}/{x}/{y}.png".to_string(),
            night_filter: false,
            flash_duration_ms: 2000,
            flash_repeat: true,
            ..Default::default()
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, data);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed = parse_config(r#"{ "flash_repeat": true }"#).unwrap();
        assert!(parsed.flash_repeat);
        assert_eq!(parsed.tile_url, DEFAULT_TILE_URL);
        assert_eq!(parsed.start_lon, DEFAULT_CENTER_LON);
    }

    #[test]
    fn test_corrupted_config_reports_reason() {
        let err = parse_config("{ not json").unwrap_err();
        assert!(err.starts_with("Configuration file was corrupted"));
    }

    #[test]
    fn test_flash_duration_is_clamped() {
        let mut data = AppConfigData::default();
        assert_eq!(data.flash_duration_secs(), 3.0);

        data.flash_duration_ms = 500;
        assert_eq!(data.flash_duration_secs(), 2.0);

        data.flash_duration_ms = 60_000;
        assert_eq!(data.flash_duration_secs(), 3.0);

        data.flash_duration_ms = 2500;
        assert_eq!(data.flash_duration_secs(), 2.5);
    }

    #[test]
    fn test_start_zoom_is_clamped() {
        let mut data = AppConfigData {
            start_zoom: 42.0,
            ..Default::default()
        };
        assert_eq!(data.start_zoom(), MAX_ZOOM);

        data.start_zoom = f64::NAN;
        assert_eq!(data.start_zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn test_config_reset_notification_default() {
        let notification = ConfigResetNotification::default();
        assert!(!notification.show);
        assert!(notification.reason.is_none());
    }
}

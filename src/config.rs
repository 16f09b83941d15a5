/// Service configuration loader - parses settings.toml
///
/// Separates operational settings (upstream base URLs, timeouts, the
/// default heavy-rain threshold) from code, so deployments can point at
/// API mirrors or tune the threshold without recompiling the service.

use serde::Deserialize;
use std::fs;
use std::time::Duration;

use crate::model::DEFAULT_HEAVY_RAIN_THRESHOLD_MM;

/// Operational settings loaded from settings.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Default heavy-rain threshold (mm/day) when a request does not
    /// override it.
    #[serde(default = "default_threshold_mm")]
    pub heavy_rain_threshold_mm: f64,

    /// Per-request HTTP timeout for the upstream fetches, in seconds.
    /// A timed-out fetch degrades to empty data like any other failure.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    // Upstream endpoints
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,
    #[serde(default = "default_climate_base_url")]
    pub climate_base_url: String,
    #[serde(default = "default_geocode_base_url")]
    pub geocode_base_url: String,

    // Climatology baseline period
    #[serde(default = "default_climate_start_year")]
    pub climate_start_year: u32,
    #[serde(default = "default_climate_end_year")]
    pub climate_end_year: u32,
}

fn default_threshold_mm() -> f64 {
    DEFAULT_HEAVY_RAIN_THRESHOLD_MM
}

fn default_fetch_timeout_secs() -> u64 {
    12
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_climate_base_url() -> String {
    "https://climate-api.open-meteo.com/v1/climate".to_string()
}

fn default_geocode_base_url() -> String {
    "http://api.openweathermap.org/geo/1.0/direct".to_string()
}

fn default_climate_start_year() -> u32 {
    1991
}

fn default_climate_end_year() -> u32 {
    2020
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            heavy_rain_threshold_mm: default_threshold_mm(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            forecast_base_url: default_forecast_base_url(),
            climate_base_url: default_climate_base_url(),
            geocode_base_url: default_geocode_base_url(),
            climate_start_year: default_climate_start_year(),
            climate_end_year: default_climate_end_year(),
        }
    }
}

impl ServiceConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Loads service settings from settings.toml.
///
/// # Panics
/// Panics if the configuration file exists but is malformed. A missing
/// file is not an error; the service runs on built-in defaults, since
/// every setting has one.
///
/// # File Location
/// Expects `settings.toml` in the current working directory (project root
/// when running via `cargo run`).
pub fn load_config() -> ServiceConfig {
    let config_path = "settings.toml";

    match fs::read_to_string(config_path) {
        Ok(contents) => toml::from_str(&contents)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", config_path, e)),
        Err(_) => ServiceConfig::default(),
    }
}

/// rainrisk_service: 30-day heavy-rain risk estimation service.
///
/// # Module structure
///
/// ```text
/// rainrisk_service
/// ├── model       — shared data types (Coordinate, RiskEstimate, FetchError, …)
/// ├── config      — service settings loader (settings.toml)
/// ├── logging     — structured logging with per-source failure classification
/// ├── ingest
/// │   ├── forecast — Open-Meteo forecast API: URL construction + JSON parsing
/// │   ├── climate  — Open-Meteo climate API: monthly precipitation normals
/// │   ├── geocode  — OpenWeather geocoding: city name → coordinate
/// │   └── fixtures (test only) — representative API response payloads
/// ├── acquire     — source traits, degrade-to-empty live impls, concurrent fetch
/// ├── analysis
/// │   └── heavy_rain — the estimator: per-day climatological probabilities
/// │                    and the forecast/climatology combination
/// └── endpoint    — HTTP API for risk queries
/// ```

/// Public modules
pub mod acquire;
pub mod analysis;
pub mod config;
pub mod endpoint;
pub mod ingest;
pub mod logging;
pub mod model;

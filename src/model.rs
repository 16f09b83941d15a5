/// Core data types for the heavy-rain risk estimation service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond simple accessors and validation: the risk
/// math lives in `analysis::heavy_rain`, the HTTP parsing in `ingest`.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Estimator constants
// ---------------------------------------------------------------------------

/// The assessment window: the estimator always answers "at least one heavy
/// day in the next 30 days", regardless of how much of that window the
/// forecast actually covers.
pub const WINDOW_DAYS: usize = 30;

/// Default heavy-rain threshold in mm/day. Callers may override per request.
pub const DEFAULT_HEAVY_RAIN_THRESHOLD_MM: f64 = 50.0;

/// Per-day heavy-rain probability used when the climatology source returns
/// no data at all. An explicit "no information" prior, not zero.
pub const FALLBACK_DAILY_PROBABILITY: f64 = 0.02;

/// Fixed days-per-month divisor for deriving a daily mean from a monthly
/// climatological total. Deliberately NOT the actual month length; the
/// numeric contract of the estimator depends on this approximation.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Stabilizing constant added to the daily mean before division, so a tiny
/// but positive mean cannot blow up the exponent.
pub const DAILY_MEAN_EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Location types
// ---------------------------------------------------------------------------

/// A resolved geographic location. Immutable once constructed; input to
/// every upstream fetch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate { latitude, longitude }
    }

    /// True when both components are finite and within ±90 / ±180.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }
}

// ---------------------------------------------------------------------------
// Precipitation types
// ---------------------------------------------------------------------------

/// One day of forecast precipitation. `precipitation_mm` is `None` when the
/// upstream source reported a null for that date; a null day never counts
/// as heavy.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPrecipitation {
    pub date: NaiveDate,
    pub precipitation_mm: Option<f64>,
}

/// Long-term mean total precipitation per calendar month (1–12), in mm,
/// derived from the 1991–2020 baseline. May be empty when the climatology
/// source is unavailable; the estimator then uses
/// `FALLBACK_DAILY_PROBABILITY` for every uncovered day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyClimatology {
    monthly_mm: HashMap<u32, f64>,
}

impl MonthlyClimatology {
    pub fn empty() -> Self {
        MonthlyClimatology::default()
    }

    /// Builds a climatology from (month, mean mm) pairs. Months outside
    /// 1–12 are ignored.
    pub fn from_monthly(pairs: impl IntoIterator<Item = (u32, f64)>) -> Self {
        let monthly_mm = pairs
            .into_iter()
            .filter(|(month, _)| (1..=12).contains(month))
            .collect();
        MonthlyClimatology { monthly_mm }
    }

    pub fn is_empty(&self) -> bool {
        self.monthly_mm.is_empty()
    }

    /// Mean monthly total for the given month, defaulting to 0.0 when the
    /// month is absent from the mapping.
    pub fn mean_for(&self, month: u32) -> f64 {
        self.monthly_mm.get(&month).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Risk output types
// ---------------------------------------------------------------------------

/// Diagnostic record accompanying every estimate.
///
/// `remaining_days` and `p_daily_est` are populated only in the
/// partial-coverage branch; when the forecast covers the full window the
/// answer is purely observational and no climatology tail exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskDiagnostics {
    /// Days for which the forecast source returned an actual observation.
    pub forecast_days: usize,
    /// How many of those observations met or exceeded the threshold.
    pub forecast_heavy_days: usize,
    /// Days filled from climatology (partial-coverage branch only).
    pub remaining_days: Option<usize>,
    /// Averaged per-day heavy probability over the climatology tail
    /// (partial-coverage branch only).
    pub p_daily_est: Option<f64>,
}

/// The estimator output: probability of at least one heavy-rain day in the
/// 30-day window, always in [0, 1], plus diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskEstimate {
    pub probability: f64,
    pub diagnostics: RiskDiagnostics,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while fetching or parsing upstream weather data.
///
/// These are recovered at the acquirer layer (degraded to empty data and
/// logged) and never escape the estimator. They exist as a typed layer so
/// tests can distinguish "no data available" from "malformed response".
#[derive(Debug, PartialEq)]
pub enum FetchError {
    /// Non-2xx HTTP response from the upstream API.
    HttpError(u16),
    /// Network-level failure, including timeouts.
    Transport(String),
    /// The response body could not be deserialized.
    ParseError(String),
    /// Structurally valid response that carried no usable values.
    NoDataAvailable(String),
    /// The geocoder found no match for the requested city.
    NotFound(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::HttpError(code) => write!(f, "HTTP error: {}", code),
            FetchError::Transport(msg) => write!(f, "Transport error: {}", msg),
            FetchError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            FetchError::NoDataAvailable(msg) => write!(f, "No data available: {}", msg),
            FetchError::NotFound(what) => write!(f, "Not found: {}", what),
        }
    }
}

impl std::error::Error for FetchError {}

/// Input-validation failures surfaced to the caller. The estimator never
/// guesses a default coordinate or threshold.
#[derive(Debug, PartialEq)]
pub enum RiskError {
    /// Latitude or longitude outside ±90 / ±180, or non-finite.
    InvalidCoordinate { latitude: f64, longitude: f64 },
    /// Threshold must be strictly positive and finite.
    InvalidThreshold(f64),
}

impl std::fmt::Display for RiskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskError::InvalidCoordinate { latitude, longitude } => {
                write!(f, "Invalid coordinate: ({}, {})", latitude, longitude)
            }
            RiskError::InvalidThreshold(t) => {
                write!(f, "Invalid heavy-rain threshold: {} mm (must be > 0)", t)
            }
        }
    }
}

impl std::error::Error for RiskError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Data acquisition layer: source traits + live Open-Meteo implementations.
///
/// The estimator consumes two upstream contracts, expressed as traits so
/// the risk math can be exercised against stub sources in tests:
///
///   ForecastSource     — up to N days of daily precipitation totals
///   ClimatologySource  — monthly precipitation normals
///
/// The live implementations wrap the typed clients in `ingest` and apply
/// the degrade-to-empty policy: any fetch failure (HTTP error, timeout,
/// parse failure, no data) is logged with its classification and converted
/// to an empty result. Total upstream unavailability is the normal
/// "no coverage" case for the estimator, never a fatal error.

use std::sync::mpsc;

use threadpool::ThreadPool;

use crate::config::ServiceConfig;
use crate::ingest::{climate, forecast};
use crate::logging::{self, DataSource};
use crate::model::{Coordinate, DailyPrecipitation, MonthlyClimatology};

// ---------------------------------------------------------------------------
// Source contracts
// ---------------------------------------------------------------------------

/// Short-range daily precipitation forecast.
///
/// Implementations return 0..days observations in chronological order;
/// fewer than requested (including zero) signals partial or no coverage
/// and is not an error.
pub trait ForecastSource {
    fn daily_precipitation(&self, coordinate: &Coordinate, days: u32) -> Vec<DailyPrecipitation>;
}

/// Long-term monthly precipitation normals.
///
/// Implementations return an empty climatology when the source has no
/// usable data for the location.
pub trait ClimatologySource {
    fn monthly_climatology(&self, coordinate: &Coordinate) -> MonthlyClimatology;
}

// ---------------------------------------------------------------------------
// HTTP client construction
// ---------------------------------------------------------------------------

/// Builds the shared blocking HTTP client with the configured per-request
/// timeout. A timed-out fetch surfaces as a transport error and degrades
/// to empty data like any other failure.
pub fn build_http_client(config: &ServiceConfig) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(config.fetch_timeout())
        .build()
}

// ---------------------------------------------------------------------------
// Live implementations
// ---------------------------------------------------------------------------

/// Open-Meteo forecast API as a `ForecastSource`.
#[derive(Clone)]
pub struct OpenMeteoForecast {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl OpenMeteoForecast {
    pub fn new(client: reqwest::blocking::Client, config: &ServiceConfig) -> Self {
        OpenMeteoForecast {
            client,
            base_url: config.forecast_base_url.clone(),
        }
    }
}

impl ForecastSource for OpenMeteoForecast {
    fn daily_precipitation(&self, coordinate: &Coordinate, days: u32) -> Vec<DailyPrecipitation> {
        match forecast::fetch_daily_precipitation(&self.client, &self.base_url, coordinate, days) {
            Ok(observations) => observations,
            Err(err) => {
                let context = format!("{},{}", coordinate.latitude, coordinate.longitude);
                logging::log_fetch_failure(
                    DataSource::Forecast,
                    &context,
                    "daily precipitation fetch",
                    &err,
                );
                Vec::new()
            }
        }
    }
}

/// Open-Meteo climate API as a `ClimatologySource`.
#[derive(Clone)]
pub struct OpenMeteoClimatology {
    client: reqwest::blocking::Client,
    base_url: String,
    start_year: u32,
    end_year: u32,
}

impl OpenMeteoClimatology {
    pub fn new(client: reqwest::blocking::Client, config: &ServiceConfig) -> Self {
        OpenMeteoClimatology {
            client,
            base_url: config.climate_base_url.clone(),
            start_year: config.climate_start_year,
            end_year: config.climate_end_year,
        }
    }
}

impl ClimatologySource for OpenMeteoClimatology {
    fn monthly_climatology(&self, coordinate: &Coordinate) -> MonthlyClimatology {
        match climate::fetch_monthly_climatology(
            &self.client,
            &self.base_url,
            coordinate,
            self.start_year,
            self.end_year,
        ) {
            Ok(climatology) => climatology,
            Err(err) => {
                let context = format!("{},{}", coordinate.latitude, coordinate.longitude);
                logging::log_fetch_failure(
                    DataSource::Climate,
                    &context,
                    "monthly climatology fetch",
                    &err,
                );
                MonthlyClimatology::empty()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Concurrent acquisition
// ---------------------------------------------------------------------------

/// Issues the forecast and climatology fetches on the worker pool and
/// waits for both. The two fetches are independent; correctness does not
/// depend on their ordering, only on both having completed.
///
/// A worker that dies mid-fetch yields an empty result, matching the
/// degrade-to-empty contract of the sources themselves.
pub fn fetch_window_inputs<F, C>(
    pool: &ThreadPool,
    forecast_source: F,
    climatology_source: C,
    coordinate: Coordinate,
    days: u32,
) -> (Vec<DailyPrecipitation>, MonthlyClimatology)
where
    F: ForecastSource + Send + 'static,
    C: ClimatologySource + Send + 'static,
{
    let (forecast_tx, forecast_rx) = mpsc::channel();
    pool.execute(move || {
        let _ = forecast_tx.send(forecast_source.daily_precipitation(&coordinate, days));
    });

    let (climatology_tx, climatology_rx) = mpsc::channel();
    pool.execute(move || {
        let _ = climatology_tx.send(climatology_source.monthly_climatology(&coordinate));
    });

    let forecast = forecast_rx.recv().unwrap_or_default();
    let climatology = climatology_rx.recv().unwrap_or_default();

    (forecast, climatology)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// 30-day heavy-rain risk estimator.
///
/// Produces the probability that at least one heavy-rain day (daily total
/// at or above the threshold) occurs in the next 30 days, blending two
/// evidence sources:
///
///   1. The short-range forecast, treated as ground truth for the days it
///      covers. If it covers the whole window, the answer is a purely
///      observational 1.0 or 0.0.
///   2. A climatological tail for uncovered days: each remaining day gets
///      a per-day probability from a saturating function of its month's
///      mean daily precipitation, the per-day values are averaged into one
///      scalar `p_daily`, and the tail risk is `1 - (1 - p_daily)^R`.
///
/// The two parts are combined with the independent-trials formula
/// `1 - (1 - forecast_risk) * (1 - tail_risk)`. Treating the forecast
/// portion and the tail as independent is a known simplification; the
/// estimate stays monotonic in both inputs, and the tests pin the
/// numbers down.
///
/// Upstream unavailability is never fatal here: empty forecast and empty
/// climatology feed the same formulas through safe defaults. The only
/// failure mode is invalid input.

use chrono::{Datelike, Duration, NaiveDate};
use threadpool::ThreadPool;

use crate::acquire::{self, ClimatologySource, ForecastSource};
use crate::model::{
    Coordinate, DailyPrecipitation, MonthlyClimatology, RiskDiagnostics, RiskError, RiskEstimate,
    DAILY_MEAN_EPSILON, DAYS_PER_MONTH, FALLBACK_DAILY_PROBABILITY, WINDOW_DAYS,
};

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

/// Rejects out-of-range coordinates and non-positive thresholds before any
/// upstream fetch is issued. The estimator never substitutes defaults for
/// invalid input.
pub fn validate_request(coordinate: &Coordinate, threshold_mm: f64) -> Result<(), RiskError> {
    if !coordinate.is_valid() {
        return Err(RiskError::InvalidCoordinate {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        });
    }
    if !threshold_mm.is_finite() || threshold_mm <= 0.0 {
        return Err(RiskError::InvalidThreshold(threshold_mm));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Per-day climatological probability
// ---------------------------------------------------------------------------

/// Heavy-rain probability for one calendar day of the given month, derived
/// from the monthly climatology.
///
/// The monthly mean is spread over a fixed 30-day month (NOT the actual
/// month length; the numeric contract depends on this approximation) and
/// pushed through the saturating curve `exp(-threshold / (d + ε))`: a
/// daily mean far above the threshold approaches probability 1, far below
/// approaches 0. A month absent from the mapping reads as 0 mm and yields
/// probability 0.
pub fn climatology_daily_probability(
    month: u32,
    climatology: &MonthlyClimatology,
    threshold_mm: f64,
) -> f64 {
    let monthly_mm = climatology.mean_for(month);
    let daily_mean = monthly_mm / DAYS_PER_MONTH;

    if daily_mean <= 0.0 {
        return 0.0;
    }

    let p = (-threshold_mm / (daily_mean + DAILY_MEAN_EPSILON)).exp();
    p.clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Forecast evidence
// ---------------------------------------------------------------------------

/// Counts observations at or above the threshold. A day with a null
/// precipitation value is never heavy.
pub fn count_heavy_days(observations: &[DailyPrecipitation], threshold_mm: f64) -> usize {
    observations
        .iter()
        .filter(|obs| obs.precipitation_mm.is_some_and(|mm| mm >= threshold_mm))
        .count()
}

// ---------------------------------------------------------------------------
// Combination
// ---------------------------------------------------------------------------

/// Combines forecast observations and climatology into the final estimate
/// for the 30-day window starting at `start_date`. Pure function; all
/// acquisition happens in the callers.
///
/// Only the first 30 observations are considered; the acquirer already
/// truncates, this re-caps defensively.
pub fn combine_window_risk(
    forecast: &[DailyPrecipitation],
    climatology: &MonthlyClimatology,
    start_date: NaiveDate,
    threshold_mm: f64,
) -> RiskEstimate {
    let forecast_days = forecast.len().min(WINDOW_DAYS);
    let observed = &forecast[..forecast_days];
    let forecast_heavy_days = count_heavy_days(observed, threshold_mm);

    // Full coverage: 30 actual forecasted values are ground truth for the
    // window, so the answer is observational, no blending.
    if forecast_days >= WINDOW_DAYS {
        let probability = if forecast_heavy_days > 0 { 1.0 } else { 0.0 };
        return RiskEstimate {
            probability,
            diagnostics: RiskDiagnostics {
                forecast_days,
                forecast_heavy_days,
                remaining_days: None,
                p_daily_est: None,
            },
        };
    }

    let remaining_days = WINDOW_DAYS - forecast_days; // >= 1 here

    // One scalar per-day probability for the uncovered tail: the mean of
    // the per-date climatological probabilities for dates
    // (start + forecast_days) .. (start + 29).
    let p_daily = if climatology.is_empty() {
        FALLBACK_DAILY_PROBABILITY
    } else {
        let total: f64 = (0..remaining_days)
            .map(|offset| {
                let date = start_date + Duration::days((forecast_days + offset) as i64);
                climatology_daily_probability(date.month(), climatology, threshold_mm)
            })
            .sum();
        total / remaining_days as f64
    };

    // At least one heavy day among R independent tail days.
    let tail_risk = 1.0 - (1.0 - p_daily).powi(remaining_days as i32);

    // The observed portion is ground truth: risk 1 iff a heavy day was seen.
    let forecast_risk = if forecast_heavy_days > 0 { 1.0 } else { 0.0 };

    // Independent-trials combination of the two sources.
    let combined = 1.0 - (1.0 - forecast_risk) * (1.0 - tail_risk);

    RiskEstimate {
        probability: combined.clamp(0.0, 1.0),
        diagnostics: RiskDiagnostics {
            forecast_days,
            forecast_heavy_days,
            remaining_days: Some(remaining_days),
            p_daily_est: Some(p_daily),
        },
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Estimates the 30-day heavy-rain risk for a coordinate.
///
/// Fetches are sequential and lazy: the climatology is only requested when
/// the forecast leaves part of the window uncovered.
///
/// # Errors
/// `RiskError` on invalid input only. Upstream unavailability degrades to
/// empty data inside the sources and feeds the fallback paths.
pub fn estimate_risk<F, C>(
    forecast_source: &F,
    climatology_source: &C,
    coordinate: &Coordinate,
    threshold_mm: f64,
    start_date: NaiveDate,
) -> Result<RiskEstimate, RiskError>
where
    F: ForecastSource + ?Sized,
    C: ClimatologySource + ?Sized,
{
    validate_request(coordinate, threshold_mm)?;

    let forecast = forecast_source.daily_precipitation(coordinate, WINDOW_DAYS as u32);

    let climatology = if forecast.len() >= WINDOW_DAYS {
        MonthlyClimatology::empty() // unused in the full-coverage branch
    } else {
        climatology_source.monthly_climatology(coordinate)
    };

    Ok(combine_window_risk(&forecast, &climatology, start_date, threshold_mm))
}

/// Same estimate, with the two upstream fetches issued concurrently on the
/// worker pool to cut request latency. Used by the HTTP endpoint and the
/// CLI; correctness is identical to `estimate_risk`.
pub fn estimate_risk_concurrent<F, C>(
    pool: &ThreadPool,
    forecast_source: F,
    climatology_source: C,
    coordinate: Coordinate,
    threshold_mm: f64,
    start_date: NaiveDate,
) -> Result<RiskEstimate, RiskError>
where
    F: ForecastSource + Send + 'static,
    C: ClimatologySource + Send + 'static,
{
    validate_request(&coordinate, threshold_mm)?;

    let (forecast, climatology) = acquire::fetch_window_inputs(
        pool,
        forecast_source,
        climatology_source,
        coordinate,
        WINDOW_DAYS as u32,
    );

    Ok(combine_window_risk(&forecast, &climatology, start_date, threshold_mm))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

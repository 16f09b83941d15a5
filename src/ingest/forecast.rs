/// Open-Meteo forecast API client.
///
/// Handles URL construction and JSON response parsing for the Open-Meteo
/// daily forecast endpoint:
///   https://api.open-meteo.com/v1/forecast
///
/// The service returns daily aggregates as parallel arrays under `daily`.
/// See `fixtures.rs` for annotated examples of the response structure.
/// No API key is required.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::{Coordinate, DailyPrecipitation, FetchError};

// ---------------------------------------------------------------------------
// Serde structures for Open-Meteo JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    daily: Option<ForecastDaily>,
}

#[derive(Deserialize)]
struct ForecastDaily {
    #[serde(default)]
    time: Vec<String>, // ISO 8601 dates, e.g. "2026-08-24"
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>, // mm; null when the model has no value
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds an Open-Meteo forecast URL requesting daily precipitation totals
/// for up to `days` days (the API caps the horizon on its side; fewer days
/// in the response is a normal outcome).
///
/// Timezone is pinned to UTC so the returned dates line up with the
/// estimator's UTC request date.
pub fn build_forecast_url(base_url: &str, coordinate: &Coordinate, days: u32) -> String {
    format!(
        "{}?latitude={}&longitude={}&daily=precipitation_sum&forecast_days={}&timezone=UTC",
        base_url, coordinate.latitude, coordinate.longitude, days
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses an Open-Meteo forecast response into a chronologically ordered
/// list of `DailyPrecipitation`, preserving nulls as `None`.
///
/// The `time` and `precipitation_sum` arrays are zipped; if the upstream
/// ever returns mismatched lengths the extra entries are dropped.
///
/// # Errors
/// - `FetchError::ParseError` — malformed JSON or an unparseable date.
/// - `FetchError::NoDataAvailable` — the `daily` block is absent or empty.
pub fn parse_forecast_response(json: &str) -> Result<Vec<DailyPrecipitation>, FetchError> {
    let response: ForecastResponse = serde_json::from_str(json)
        .map_err(|e| FetchError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let daily = response.daily.ok_or_else(|| {
        FetchError::NoDataAvailable("No daily block in forecast response".to_string())
    })?;

    if daily.time.is_empty() {
        return Err(FetchError::NoDataAvailable(
            "Empty daily time array in forecast response".to_string(),
        ));
    }

    let mut observations = Vec::with_capacity(daily.time.len());

    for (time, precipitation_mm) in daily.time.iter().zip(daily.precipitation_sum) {
        let date = NaiveDate::parse_from_str(time, "%Y-%m-%d")
            .map_err(|e| FetchError::ParseError(format!("Bad forecast date '{}': {}", time, e)))?;

        observations.push(DailyPrecipitation { date, precipitation_mm });
    }

    Ok(observations)
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Fetches up to `days` daily precipitation totals for a coordinate.
///
/// Returns a typed error for every failure mode; the acquirer layer above
/// decides whether to degrade that to an empty sequence. The result is
/// truncated to `days` entries even if the upstream returns more.
pub fn fetch_daily_precipitation(
    client: &reqwest::blocking::Client,
    base_url: &str,
    coordinate: &Coordinate,
    days: u32,
) -> Result<Vec<DailyPrecipitation>, FetchError> {
    let url = build_forecast_url(base_url, coordinate, days);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FetchError::HttpError(response.status().as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let mut observations = parse_forecast_response(&body)?;
    observations.truncate(days as usize);
    Ok(observations)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;

    // --- URL construction ---------------------------------------------------

    #[test]
    fn test_build_url_targets_forecast_endpoint() {
        let coord = Coordinate::new(40.69, -89.59);
        let url = build_forecast_url("https://api.open-meteo.com/v1/forecast", &coord, 30);
        assert!(
            url.starts_with("https://api.open-meteo.com/v1/forecast?"),
            "must target the forecast endpoint, got: {}",
            url
        );
        assert!(url.contains("daily=precipitation_sum"), "must request daily precip totals");
        assert!(url.contains("timezone=UTC"), "dates must be UTC-aligned");
    }

    #[test]
    fn test_build_url_includes_coordinate_and_horizon() {
        let coord = Coordinate::new(51.51, -0.13);
        let url = build_forecast_url("https://api.open-meteo.com/v1/forecast", &coord, 30);
        assert!(url.contains("latitude=51.51"), "must include latitude");
        assert!(url.contains("longitude=-0.13"), "must include longitude");
        assert!(url.contains("forecast_days=30"), "must request the full window");
    }

    // --- Parsing: happy path ------------------------------------------------

    #[test]
    fn test_parse_sixteen_day_response_preserves_order_and_values() {
        let observations = parse_forecast_response(fixture_forecast_16_day_json())
            .expect("valid fixture should parse without error");

        assert_eq!(observations.len(), 16, "fixture carries a 16-day horizon");
        assert_eq!(
            observations[0].date,
            NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            "first observation should be the request date"
        );
        assert_eq!(observations[0].precipitation_mm, Some(0.0));
        assert_eq!(
            observations[3].precipitation_mm,
            Some(55.2),
            "day 4 carries the heavy total in this fixture"
        );

        // Chronological ordering
        for pair in observations.windows(2) {
            assert!(pair[0].date < pair[1].date, "dates must be strictly increasing");
        }
    }

    #[test]
    fn test_parse_null_precipitation_becomes_none() {
        let observations = parse_forecast_response(fixture_forecast_with_null_json())
            .expect("nulls are valid in the precipitation array");

        assert_eq!(observations.len(), 3);
        assert_eq!(
            observations[1].precipitation_mm, None,
            "JSON null must map to None, not 0.0"
        );
        assert_eq!(observations[2].precipitation_mm, Some(12.4));
    }

    // --- Parsing: error and edge cases --------------------------------------

    #[test]
    fn test_parse_missing_daily_block_returns_no_data() {
        let result = parse_forecast_response(fixture_forecast_missing_daily_json());
        assert!(
            matches!(result, Err(FetchError::NoDataAvailable(_))),
            "missing daily block should yield NoDataAvailable, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_empty_time_array_returns_no_data() {
        let json = r#"{ "daily": { "time": [], "precipitation_sum": [] } }"#;
        let result = parse_forecast_response(json);
        assert!(
            matches!(result, Err(FetchError::NoDataAvailable(_))),
            "empty time array should yield NoDataAvailable"
        );
    }

    #[test]
    fn test_parse_malformed_json_returns_parse_error() {
        let result = parse_forecast_response("{ this is not valid json }}}");
        assert!(
            matches!(result, Err(FetchError::ParseError(_))),
            "malformed JSON should return ParseError, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_unparseable_date_returns_parse_error() {
        let json = r#"{ "daily": { "time": ["24/08/2026"], "precipitation_sum": [1.0] } }"#;
        let result = parse_forecast_response(json);
        assert!(
            matches!(result, Err(FetchError::ParseError(_))),
            "non-ISO date should return ParseError, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_mismatched_array_lengths_drops_extras() {
        // Defensive against upstream inconsistencies: 3 dates but 2 totals.
        let json = r#"{
          "daily": {
            "time": ["2026-08-24", "2026-08-25", "2026-08-26"],
            "precipitation_sum": [1.0, 2.0]
          }
        }"#;
        let observations = parse_forecast_response(json).expect("should still parse");
        assert_eq!(observations.len(), 2, "unpaired dates are dropped");
    }
}

/// Open-Meteo climate API client.
///
/// Retrieves long-term monthly precipitation normals from the Open-Meteo
/// climate endpoint:
///   https://climate-api.open-meteo.com/v1/climate
///
/// The estimator uses these normals to fill window days the short-range
/// forecast does not cover. The baseline period (1991–2020 by default)
/// comes from settings.toml.

use serde::Deserialize;

use crate::model::{Coordinate, FetchError, MonthlyClimatology};

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ClimateResponse {
    #[serde(default)]
    monthly: Option<ClimateMonthly>,
}

#[derive(Deserialize)]
struct ClimateMonthly {
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>, // index 0 = January
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds a climate API URL requesting monthly precipitation normals over
/// the given baseline years.
pub fn build_climatology_url(
    base_url: &str,
    coordinate: &Coordinate,
    start_year: u32,
    end_year: u32,
) -> String {
    format!(
        "{}?latitude={}&longitude={}&start_year={}&end_year={}&monthly=precipitation_sum",
        base_url, coordinate.latitude, coordinate.longitude, start_year, end_year
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a climate API response into a `MonthlyClimatology`.
///
/// The first 12 entries of `monthly.precipitation_sum` map to months 1–12.
/// Null entries leave their month absent from the mapping (which the
/// estimator reads as 0 mm).
///
/// # Errors
/// - `FetchError::ParseError` — malformed JSON.
/// - `FetchError::NoDataAvailable` — `monthly` block absent, or fewer than
///   12 monthly values (a truncated year is unusable as a climatology).
pub fn parse_climatology_response(json: &str) -> Result<MonthlyClimatology, FetchError> {
    let response: ClimateResponse = serde_json::from_str(json)
        .map_err(|e| FetchError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let monthly = response.monthly.ok_or_else(|| {
        FetchError::NoDataAvailable("No monthly block in climate response".to_string())
    })?;

    if monthly.precipitation_sum.len() < 12 {
        return Err(FetchError::NoDataAvailable(format!(
            "Expected 12 monthly precipitation values, got {}",
            monthly.precipitation_sum.len()
        )));
    }

    let pairs = monthly
        .precipitation_sum
        .into_iter()
        .take(12)
        .enumerate()
        .filter_map(|(i, mm)| mm.map(|mm| (i as u32 + 1, mm)));

    Ok(MonthlyClimatology::from_monthly(pairs))
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Fetches monthly precipitation normals for a coordinate.
///
/// Returns a typed error for every failure mode; the acquirer layer above
/// decides whether to degrade that to an empty climatology.
pub fn fetch_monthly_climatology(
    client: &reqwest::blocking::Client,
    base_url: &str,
    coordinate: &Coordinate,
    start_year: u32,
    end_year: u32,
) -> Result<MonthlyClimatology, FetchError> {
    let url = build_climatology_url(base_url, coordinate, start_year, end_year);

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

    parse_climatology_response(&body)
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
    fn test_build_url_targets_climate_endpoint_with_baseline() {
        let coord = Coordinate::new(40.69, -89.59);
        let url = build_climatology_url(
            "https://climate-api.open-meteo.com/v1/climate",
            &coord,
            1991,
            2020,
        );
        assert!(url.starts_with("https://climate-api.open-meteo.com/v1/climate?"));
        assert!(url.contains("start_year=1991"), "must pin the baseline start");
        assert!(url.contains("end_year=2020"), "must pin the baseline end");
        assert!(url.contains("monthly=precipitation_sum"), "must request monthly totals");
        assert!(url.contains("latitude=40.69"));
        assert!(url.contains("longitude=-89.59"));
    }

    // --- Parsing: happy path ------------------------------------------------

    #[test]
    fn test_parse_full_year_of_monthly_normals() {
        let climatology = parse_climatology_response(fixture_climate_normals_json())
            .expect("valid fixture should parse without error");

        assert!(!climatology.is_empty());
        assert!(
            (climatology.mean_for(1) - 48.1).abs() < 0.001,
            "January normal should be 48.1 mm, got {}",
            climatology.mean_for(1)
        );
        assert!(
            (climatology.mean_for(6) - 110.3).abs() < 0.001,
            "June normal should be 110.3 mm"
        );
        assert!(
            (climatology.mean_for(12) - 55.0).abs() < 0.001,
            "December normal should be 55.0 mm"
        );
    }

    #[test]
    fn test_parse_null_month_reads_as_absent() {
        let climatology = parse_climatology_response(fixture_climate_with_null_month_json())
            .expect("a null month is valid");
        assert_eq!(
            climatology.mean_for(2),
            0.0,
            "null February must read as 0 mm, not fail the parse"
        );
        assert!((climatology.mean_for(1) - 40.0).abs() < 0.001);
    }

    // --- Parsing: error and edge cases --------------------------------------

    #[test]
    fn test_parse_truncated_year_returns_no_data() {
        let result = parse_climatology_response(fixture_climate_truncated_json());
        assert!(
            matches!(result, Err(FetchError::NoDataAvailable(_))),
            "fewer than 12 monthly values should yield NoDataAvailable, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_missing_monthly_block_returns_no_data() {
        let json = r#"{ "latitude": 40.69, "longitude": -89.59 }"#;
        let result = parse_climatology_response(json);
        assert!(
            matches!(result, Err(FetchError::NoDataAvailable(_))),
            "missing monthly block should yield NoDataAvailable"
        );
    }

    #[test]
    fn test_parse_malformed_json_returns_parse_error() {
        let result = parse_climatology_response("not json at all");
        assert!(
            matches!(result, Err(FetchError::ParseError(_))),
            "malformed JSON should return ParseError"
        );
    }

    #[test]
    fn test_parse_extra_months_beyond_twelve_are_ignored() {
        // Some baselines return one trailing aggregate value; only the
        // first 12 entries are meaningful.
        let json = r#"{
          "monthly": {
            "precipitation_sum": [10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 999]
          }
        }"#;
        let climatology = parse_climatology_response(json).expect("should parse");
        assert_eq!(climatology.mean_for(12), 10.0);
        assert_eq!(climatology.mean_for(13), 0.0, "month 13 does not exist");
    }
}

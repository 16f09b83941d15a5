/// Test fixtures: representative JSON payloads from the upstream APIs.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parsers. They reflect the real response shapes
/// returned by:
///   https://api.open-meteo.com/v1/forecast      (daily forecast)
///   https://climate-api.open-meteo.com/v1/climate (monthly normals)
///   http://api.openweathermap.org/geo/1.0/direct  (geocoding)
///
/// Open-Meteo daily response shape:
///   response.daily.time[]               — ISO dates, UTC-aligned
///   response.daily.precipitation_sum[]  — mm totals, null when no value
///
/// Climate response shape:
///   response.monthly.precipitation_sum[] — 12 entries, index 0 = January
///
/// Geocoding response shape: a bare JSON array of candidates; an unknown
/// city yields `[]` with HTTP 200, not an error status.

/// Sixteen-day forecast horizon for Peoria with one heavy day (55.2 mm on
/// day 4). Sixteen days is the typical Open-Meteo maximum horizon, so this
/// is the canonical partial-coverage input: 16 observed + 14 climatology
/// days.
#[cfg(test)]
pub(crate) fn fixture_forecast_16_day_json() -> &'static str {
    r#"{
      "latitude": 40.6936,
      "longitude": -89.589,
      "timezone": "UTC",
      "daily_units": { "time": "iso8601", "precipitation_sum": "mm" },
      "daily": {
        "time": [
          "2026-08-24", "2026-08-25", "2026-08-26", "2026-08-27",
          "2026-08-28", "2026-08-29", "2026-08-30", "2026-08-31",
          "2026-09-01", "2026-09-02", "2026-09-03", "2026-09-04",
          "2026-09-05", "2026-09-06", "2026-09-07", "2026-09-08"
        ],
        "precipitation_sum": [
          0.0, 3.2, 12.7, 55.2,
          8.1, 0.0, 0.0, 1.4,
          22.6, 0.3, 0.0, 5.8,
          0.0, 17.2, 2.1, 0.0
        ]
      }
    }"#
}

/// Three-day response with a null precipitation value; the model had no
/// total for the middle day. Parser must map null to None, and the
/// estimator must not count a null day as heavy.
#[cfg(test)]
pub(crate) fn fixture_forecast_with_null_json() -> &'static str {
    r#"{
      "latitude": 40.6936,
      "longitude": -89.589,
      "timezone": "UTC",
      "daily": {
        "time": ["2026-08-24", "2026-08-25", "2026-08-26"],
        "precipitation_sum": [0.8, null, 12.4]
      }
    }"#
}

/// Structurally valid envelope with no daily block at all; simulates an
/// upstream error payload delivered with HTTP 200.
#[cfg(test)]
pub(crate) fn fixture_forecast_missing_daily_json() -> &'static str {
    r#"{
      "latitude": 40.6936,
      "longitude": -89.589,
      "generationtime_ms": 0.21
    }"#
}

/// Full year of monthly precipitation normals (1991–2020 baseline) for a
/// midwestern continental climate: wet late spring/summer, drier winter.
#[cfg(test)]
pub(crate) fn fixture_climate_normals_json() -> &'static str {
    r#"{
      "latitude": 40.6936,
      "longitude": -89.589,
      "monthly_units": { "precipitation_sum": "mm" },
      "monthly": {
        "precipitation_sum": [
          48.1, 51.9, 71.0, 93.5, 118.2, 110.3,
          101.7, 88.4, 79.2, 74.6, 63.8, 55.0
        ]
      }
    }"#
}

/// Normals with a null February; coverage gaps happen over oceans and at
/// high latitudes. The null month reads as "no data" (0 mm), not a parse
/// failure.
#[cfg(test)]
pub(crate) fn fixture_climate_with_null_month_json() -> &'static str {
    r#"{
      "latitude": 40.6936,
      "longitude": -89.589,
      "monthly": {
        "precipitation_sum": [
          40.0, null, 70.0, 90.0, 115.0, 108.0,
          100.0, 85.0, 78.0, 72.0, 60.0, 52.0
        ]
      }
    }"#
}

/// Truncated baseline with only five monthly values, unusable as a
/// climatology; parser must report NoDataAvailable.
#[cfg(test)]
pub(crate) fn fixture_climate_truncated_json() -> &'static str {
    r#"{
      "latitude": 40.6936,
      "longitude": -89.589,
      "monthly": {
        "precipitation_sum": [48.1, 51.9, 71.0, 93.5, 118.2]
      }
    }"#
}

/// Single geocoding match for Peoria, IL.
#[cfg(test)]
pub(crate) fn fixture_geocode_peoria_json() -> &'static str {
    r#"[
      {
        "name": "Peoria",
        "lat": 40.6936488,
        "lon": -89.5889864,
        "country": "US",
        "state": "Illinois"
      }
    ]"#
}

/// Unknown city: the geocoder answers HTTP 200 with an empty array.
#[cfg(test)]
pub(crate) fn fixture_geocode_no_match_json() -> &'static str {
    r#"[]"#
}

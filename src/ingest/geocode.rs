/// OpenWeather direct geocoding API client.
///
/// Resolves a city name to a coordinate via:
///   http://api.openweathermap.org/geo/1.0/direct
///
/// Requires an API key (OPENWEATHER_API_KEY). Unlike the forecast and
/// climatology fetches, geocoding failures are NOT degraded to empty data:
/// a request for an unresolvable city is answered with an explicit
/// not-found outcome, never with a guessed default coordinate.

use serde::Deserialize;

use crate::model::{Coordinate, FetchError};

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

/// The geocoder returns a JSON array of candidate places; with limit=1 it
/// holds at most one entry.
#[derive(Deserialize)]
struct GeocodeEntry {
    lat: f64,
    lon: f64,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds a direct-geocoding URL for the given city name, requesting a
/// single best match. The city name is percent-encoded so names with
/// spaces or diacritics survive the query string.
pub fn build_geocode_url(base_url: &str, city: &str, api_key: &str) -> String {
    format!(
        "{}?q={}&limit=1&appid={}",
        base_url,
        urlencoding::encode(city),
        api_key
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a geocoding response into a `Coordinate`.
///
/// # Errors
/// - `FetchError::ParseError` — malformed JSON.
/// - `FetchError::NotFound` — the candidate array is empty (the API
///   answers an unknown city with `[]`, not an HTTP error).
pub fn parse_geocode_response(json: &str, city: &str) -> Result<Coordinate, FetchError> {
    let entries: Vec<GeocodeEntry> = serde_json::from_str(json)
        .map_err(|e| FetchError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::NotFound(format!("No geocoding match for '{}'", city)))?;

    Ok(Coordinate::new(entry.lat, entry.lon))
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Resolves a city name to a coordinate.
pub fn resolve_city(
    client: &reqwest::blocking::Client,
    base_url: &str,
    city: &str,
    api_key: &str,
) -> Result<Coordinate, FetchError> {
    let url = build_geocode_url(base_url, city, api_key);

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

    parse_geocode_response(&body, city)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

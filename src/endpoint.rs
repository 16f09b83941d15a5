/// HTTP endpoint for querying heavy-rain risk
///
/// Provides a simple REST API for UIs and external tools to request a
/// 30-day heavy-rain assessment.
///
/// Endpoints:
/// - GET /risk?lat={}&lon={}[&threshold={}] - Assess a coordinate
/// - GET /risk?city={}[&threshold={}]       - Geocode a city, then assess
/// - GET /health                            - Service health check

use std::collections::HashMap;

use chrono::Utc;
use threadpool::ThreadPool;

use crate::acquire::{self, OpenMeteoClimatology, OpenMeteoForecast};
use crate::analysis;
use crate::config::ServiceConfig;
use crate::ingest::geocode;
use crate::model::{Coordinate, FetchError, RiskEstimate};

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

/// Where the caller wants the assessment: an explicit coordinate or a city
/// name still to be geocoded.
#[derive(Debug, PartialEq)]
pub enum LocationQuery {
    Coordinate(Coordinate),
    City(String),
}

/// Splits a request URL into its path and percent-decoded query pairs.
/// Repeated keys keep the last value.
pub fn parse_query(url: &str) -> (&str, HashMap<String, String>) {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    };

    let mut params = HashMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = urlencoding::decode(key).map(|k| k.into_owned()).unwrap_or_default();
        let value = urlencoding::decode(value).map(|v| v.into_owned()).unwrap_or_default();
        params.insert(key, value);
    }

    (path, params)
}

/// Extracts the location and threshold from /risk query parameters.
///
/// Accepts either `city=NAME` or the `lat=`/`lon=` pair; `threshold=` is
/// optional and falls back to the configured default. Returns a
/// caller-facing message on malformed input; range validation of the
/// coordinate itself happens in the estimator.
pub fn parse_risk_query(
    params: &HashMap<String, String>,
    default_threshold_mm: f64,
) -> Result<(LocationQuery, f64), String> {
    let threshold_mm = match params.get("threshold") {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| format!("Unparseable threshold: '{}'", raw))?,
        None => default_threshold_mm,
    };

    if let Some(city) = params.get("city") {
        if city.trim().is_empty() {
            return Err("Empty city parameter".to_string());
        }
        return Ok((LocationQuery::City(city.trim().to_string()), threshold_mm));
    }

    match (params.get("lat"), params.get("lon")) {
        (Some(lat_raw), Some(lon_raw)) => {
            let latitude = lat_raw
                .parse::<f64>()
                .map_err(|_| format!("Unparseable latitude: '{}'", lat_raw))?;
            let longitude = lon_raw
                .parse::<f64>()
                .map_err(|_| format!("Unparseable longitude: '{}'", lon_raw))?;
            Ok((LocationQuery::Coordinate(Coordinate::new(latitude, longitude)), threshold_mm))
        }
        _ => Err("Provide either city= or both lat= and lon=".to_string()),
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start the HTTP endpoint server on the specified port. Blocks the
/// calling thread; the upstream fetches for each request run on the
/// internal worker pool.
pub fn start_endpoint_server(port: u16, config: ServiceConfig) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    let client = acquire::build_http_client(&config)
        .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

    let pool = ThreadPool::new(2);

    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    println!("   GET /risk?lat={{}}&lon={{}}[&threshold={{}}] - Assess a coordinate");
    println!("   GET /risk?city={{}}[&threshold={{}}] - Geocode a city, then assess");
    println!("   GET /health - Service health check\n");

    for request in server.incoming_requests() {
        let (path, params) = parse_query(request.url());

        let response = if path == "/health" {
            handle_health()
        } else if path == "/risk" {
            handle_risk(&config, &client, &pool, &params)
        } else {
            create_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": ["/health", "/risk"]
                }),
            )
        };

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Handle /health endpoint
fn handle_health() -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    create_response(
        200,
        serde_json::json!({
            "status": "ok",
            "service": "rainrisk_service",
            "version": "0.1.0"
        }),
    )
}

/// Handle /risk endpoint
fn handle_risk(
    config: &ServiceConfig,
    client: &reqwest::blocking::Client,
    pool: &ThreadPool,
    params: &HashMap<String, String>,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let (location, threshold_mm) =
        match parse_risk_query(params, config.heavy_rain_threshold_mm) {
            Ok(parsed) => parsed,
            Err(message) => {
                return create_response(400, serde_json::json!({ "error": message }));
            }
        };

    let coordinate = match location {
        LocationQuery::Coordinate(coordinate) => coordinate,
        LocationQuery::City(city) => {
            let api_key = match std::env::var("OPENWEATHER_API_KEY") {
                Ok(key) if !key.is_empty() => key,
                _ => {
                    return create_response(
                        400,
                        serde_json::json!({
                            "error": "City lookup requires OPENWEATHER_API_KEY to be set"
                        }),
                    );
                }
            };

            match geocode::resolve_city(client, &config.geocode_base_url, &city, &api_key) {
                Ok(coordinate) => coordinate,
                Err(FetchError::NotFound(message)) => {
                    return create_response(
                        404,
                        serde_json::json!({ "error": message, "city": city }),
                    );
                }
                Err(err) => {
                    return create_response(
                        502,
                        serde_json::json!({
                            "error": format!("Geocoding failed: {}", err),
                            "city": city
                        }),
                    );
                }
            }
        }
    };

    let forecast_source = OpenMeteoForecast::new(client.clone(), config);
    let climatology_source = OpenMeteoClimatology::new(client.clone(), config);

    match analysis::estimate_risk_concurrent(
        pool,
        forecast_source,
        climatology_source,
        coordinate,
        threshold_mm,
        Utc::now().date_naive(),
    ) {
        Ok(estimate) => create_response(200, risk_to_json(&coordinate, threshold_mm, &estimate)),
        Err(err) => create_response(400, serde_json::json!({ "error": err.to_string() })),
    }
}

/// Build the /risk response body: the estimate plus the request echo.
fn risk_to_json(coordinate: &Coordinate, threshold_mm: f64, estimate: &RiskEstimate) -> serde_json::Value {
    serde_json::json!({
        "latitude": coordinate.latitude,
        "longitude": coordinate.longitude,
        "threshold_mm": threshold_mm,
        "window_days": crate::model::WINDOW_DAYS,
        "probability": estimate.probability,
        "diagnostics": estimate.diagnostics,
    })
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: serde_json::Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap();
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Heavy-Rain Risk Service - Main Entry Point
//!
//! Assesses the probability of at least one heavy-rain day (precipitation
//! at or above a configurable threshold) in the next 30 days for a
//! location, blending the short-range Open-Meteo forecast with 1991–2020
//! climatological normals for the uncovered part of the window.
//!
//! Usage:
//!   cargo run --release -- --lat 40.69 --lon -89.59        # One-shot assessment
//!   cargo run --release -- --city Peoria                   # Geocode, then assess
//!   cargo run --release -- --city Peoria --threshold 30    # Override threshold
//!   cargo run --release -- --endpoint 8080                 # Serve HTTP API
//!
//! Environment:
//!   OPENWEATHER_API_KEY - required only for --city / city= geocoding
//!   (.env files are supported)

use chrono::Utc;
use std::env;
use threadpool::ThreadPool;

use rainrisk_service::acquire::{self, OpenMeteoClimatology, OpenMeteoForecast};
use rainrisk_service::analysis;
use rainrisk_service::config;
use rainrisk_service::endpoint;
use rainrisk_service::ingest::geocode;
use rainrisk_service::logging::{self, LogLevel};
use rainrisk_service::model::{Coordinate, RiskEstimate};

fn main() {
    println!("🌧  Heavy-Rain Risk Service");
    println!("===========================\n");

    dotenv::dotenv().ok();
    logging::init_logger(LogLevel::Info, None, false);

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut endpoint_port: Option<u16> = None;
    let mut city: Option<String> = None;
    let mut latitude: Option<f64> = None;
    let mut longitude: Option<f64> = None;
    let mut threshold_mm: Option<f64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--endpoint" => {
                endpoint_port = Some(parse_value(&args, &mut i, "--endpoint"));
            }
            "--city" => {
                city = Some(parse_value(&args, &mut i, "--city"));
            }
            "--lat" => {
                latitude = Some(parse_value(&args, &mut i, "--lat"));
            }
            "--lon" => {
                longitude = Some(parse_value(&args, &mut i, "--lon"));
            }
            "--threshold" => {
                threshold_mm = Some(parse_value(&args, &mut i, "--threshold"));
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!(
                    "Usage: {} [--endpoint PORT | --city NAME | --lat V --lon V] [--threshold MM]",
                    args[0]
                );
                std::process::exit(1);
            }
        }
    }

    println!("📊 Loading configuration...");
    let service_config = config::load_config();
    println!("   Threshold default: {} mm/day", service_config.heavy_rain_threshold_mm);
    println!("   Fetch timeout: {} s\n", service_config.fetch_timeout_secs);

    // Serve mode
    if let Some(port) = endpoint_port {
        println!("🚀 Starting HTTP endpoint server...");
        if let Err(e) = endpoint::start_endpoint_server(port, service_config) {
            eprintln!("\n❌ Endpoint server error: {}\n", e);
            std::process::exit(1);
        }
        return;
    }

    // One-shot assessment mode
    let client = match acquire::build_http_client(&service_config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("\n❌ Failed to build HTTP client: {}\n", e);
            std::process::exit(1);
        }
    };

    let coordinate = match (city, latitude, longitude) {
        (Some(city), _, _) => {
            let api_key = match env::var("OPENWEATHER_API_KEY") {
                Ok(key) if !key.is_empty() => key,
                _ => {
                    eprintln!("\n❌ --city requires OPENWEATHER_API_KEY to be set\n");
                    std::process::exit(1);
                }
            };
            println!("📍 Resolving '{}'...", city);
            match geocode::resolve_city(&client, &service_config.geocode_base_url, &city, &api_key) {
                Ok(coordinate) => {
                    println!("   ✓ ({}, {})\n", coordinate.latitude, coordinate.longitude);
                    coordinate
                }
                Err(e) => {
                    eprintln!("\n❌ Geocoding failed: {}\n", e);
                    std::process::exit(1);
                }
            }
        }
        (None, Some(latitude), Some(longitude)) => Coordinate::new(latitude, longitude),
        _ => {
            eprintln!("\n❌ Provide --city NAME, or both --lat and --lon, or --endpoint PORT\n");
            std::process::exit(1);
        }
    };

    let threshold_mm = threshold_mm.unwrap_or(service_config.heavy_rain_threshold_mm);
    let pool = ThreadPool::new(2);

    println!("🔎 Assessing 30-day heavy-rain risk...");
    let estimate = match analysis::estimate_risk_concurrent(
        &pool,
        OpenMeteoForecast::new(client.clone(), &service_config),
        OpenMeteoClimatology::new(client, &service_config),
        coordinate,
        threshold_mm,
        Utc::now().date_naive(),
    ) {
        Ok(estimate) => estimate,
        Err(e) => {
            eprintln!("\n❌ {}\n", e);
            std::process::exit(1);
        }
    };

    print_report(&coordinate, threshold_mm, &estimate);
}

/// Parse the value following a flag, exiting with a usage message when it
/// is missing or malformed.
fn parse_value<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> T {
    if *i + 1 >= args.len() {
        eprintln!("Error: {} requires a value", flag);
        std::process::exit(1);
    }
    let raw = &args[*i + 1];
    *i += 2;
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("Error: invalid value for {}: '{}'", flag, raw);
            std::process::exit(1);
        }
    }
}

fn print_report(coordinate: &Coordinate, threshold_mm: f64, estimate: &RiskEstimate) {
    let d = &estimate.diagnostics;

    println!("\n📋 Assessment");
    println!("   Location:  ({}, {})", coordinate.latitude, coordinate.longitude);
    println!("   Threshold: {} mm/day", threshold_mm);
    println!(
        "   Forecast coverage: {} of 30 days ({} heavy)",
        d.forecast_days, d.forecast_heavy_days
    );
    if let (Some(remaining), Some(p_daily)) = (d.remaining_days, d.p_daily_est) {
        println!(
            "   Climatology tail:  {} days at p_daily ≈ {:.4}",
            remaining, p_daily
        );
    }
    println!(
        "\n   ☔ P(at least one heavy-rain day in 30 days) = {:.1}%\n",
        estimate.probability * 100.0
    );
}

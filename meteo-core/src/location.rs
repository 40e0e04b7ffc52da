//! Coordinates and human-readable place names for them.
//!
//! Reverse geocoding uses Nominatim (OpenStreetMap): free, no API key required.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::LocationError;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("meteo/", env!("CARGO_PKG_VERSION"));

pub const UNKNOWN_LOCATION: &str = "Unknown location";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Validated coordinates; out-of-range or non-finite values are rejected.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(LocationError::Unavailable(format!(
                "latitude {latitude} is outside -90..=90"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::Unavailable(format!(
                "longitude {longitude} is outside -180..=180"
            )));
        }
        Ok(Self { latitude, longitude })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_coordinates(self.latitude, self.longitude))
    }
}

/// Place name used when nothing better is known, e.g. "12.34° N, 56.78° W".
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    let lat_dir = if latitude >= 0.0 { "N" } else { "S" };
    let lon_dir = if longitude >= 0.0 { "E" } else { "W" };
    format!(
        "{:.2}° {}, {:.2}° {}",
        latitude.abs(),
        lat_dir,
        longitude.abs(),
        lon_dir
    )
}

/// Join the most specific address parts available into a short label.
pub fn place_label(locality: Option<&str>, admin_area: Option<&str>, country: Option<&str>) -> String {
    fn present(s: Option<&str>) -> Option<&str> {
        s.filter(|v| !v.trim().is_empty())
    }

    match (present(locality), present(admin_area), present(country)) {
        (Some(l), _, Some(c)) => format!("{l}, {c}"),
        (Some(l), Some(a), None) => format!("{l}, {a}"),
        (Some(l), None, None) => l.to_string(),
        (None, Some(a), Some(c)) => format!("{a}, {c}"),
        (None, Some(a), None) => a.to_string(),
        (None, None, Some(c)) => c.to_string(),
        (None, None, None) => UNKNOWN_LOCATION.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    base_url: String,
    http: Client,
}

impl ReverseGeocoder {
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build geocoding client, using defaults: {}", e);
                Client::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Reverse geocode coordinates to a place name such as "Seattle, United States".
    /// Returns `None` on any failure; callers fall back to the coordinates.
    pub async fn reverse_geocode(&self, coordinates: Coordinates) -> Option<String> {
        let url = format!("{}/reverse", self.base_url);
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();

        let response = match self
            .http
            .get(&url)
            .query(&[
                ("lat", latitude.as_str()),
                ("lon", longitude.as_str()),
                ("format", "json"),
                ("addressdetails", "1"),
                ("zoom", "10"),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Reverse geocode request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return None;
        }

        let body: NominatimResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Reverse geocode parse error: {}", e);
                return None;
            }
        };

        let addr = body.address?;
        let locality = addr.city.or(addr.town).or(addr.village).or(addr.municipality);

        let label = place_label(
            locality.as_deref(),
            addr.state.as_deref(),
            addr.country.as_deref(),
        );
        if label == UNKNOWN_LOCATION {
            return None;
        }

        tracing::info!("Reverse geocoded to: {}", label);
        Some(label)
    }
}

impl Default for ReverseGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Geocoded place name, or the formatted coordinates when none resolves.
pub async fn resolve_place_name(geocoder: &ReverseGeocoder, coordinates: Coordinates) -> String {
    match geocoder.reverse_geocode(coordinates).await {
        Some(name) => name,
        None => coordinates.to_string(),
    }
}

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::{error::ForecastError, location::Coordinates, model::RawForecastResponse};

use super::ForecastProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

pub const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,weather_code,wind_speed_10m,uv_index,precipitation,is_day,european_aqi";
pub const HOURLY_FIELDS: &str = "temperature_2m,weather_code,is_day";
pub const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max";
pub const FORECAST_DAYS: u8 = 7;

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Client with an explicit request timeout instead of the transport default.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ForecastError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn fetch_forecast(
        &self,
        coordinates: Coordinates,
    ) -> Result<RawForecastResponse, ForecastError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();
        let forecast_days = FORECAST_DAYS.to_string();

        tracing::debug!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "requesting Open-Meteo forecast"
        );

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("hourly", HOURLY_FIELDS),
                ("daily", DAILY_FIELDS),
                ("timezone", "auto"),
                ("forecast_days", forecast_days.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ForecastError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: RawForecastResponse = serde_json::from_str(&body)?;

        tracing::debug!(
            timezone = %parsed.timezone,
            hours = parsed.hourly.time.len(),
            days = parsed.daily.time.len(),
            "decoded Open-Meteo forecast"
        );

        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

use serde::{Deserialize, Serialize};

/// Raw `/v1/forecast` payload, as returned by Open-Meteo.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub current: RawCurrent,
    pub hourly: RawHourly,
    pub daily: RawDaily,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrent {
    #[serde(default)]
    pub time: Option<String>,
    pub temperature_2m: f64,
    pub apparent_temperature: f64,
    pub relative_humidity_2m: i32,
    pub weather_code: i32,
    pub wind_speed_10m: f64,
    pub uv_index: f64,
    pub precipitation: f64,
    pub is_day: i32,
    #[serde(default)]
    pub european_aqi: Option<i32>,
}

/// Parallel arrays; index `i` in each one describes the same hour.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub weather_code: Vec<i32>,
    #[serde(default)]
    pub is_day: Vec<i32>,
}

/// Parallel arrays; index `i` in each one describes the same day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDaily {
    pub time: Vec<String>,
    pub weather_code: Vec<i32>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<i32>>,
}

/// UI-ready view of one successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    pub location: String,
    pub current_temp: f64,
    pub feels_like: f64,
    pub weather_code: i32,
    pub weather_description: String,
    pub is_day: bool,
    pub uv_index: f64,
    pub humidity: i32,
    pub wind_speed: f64,
    pub precipitation: f64,
    pub air_quality: String,
    pub hourly_forecast: Vec<HourlyForecast>,
    pub daily_forecast: Vec<DailyForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyForecast {
    /// 12-hour label such as "3 pm".
    pub time: String,
    pub temperature: f64,
    pub weather_code: i32,
    pub is_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    /// "Today", "Tomorrow" or a weekday name.
    pub day: String,
    pub weather_code: i32,
    pub max_temp: f64,
    pub min_temp: f64,
    pub precipitation_probability: i32,
}

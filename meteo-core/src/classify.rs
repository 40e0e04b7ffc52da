//! Pure lookups from raw API codes to display labels and icon keys.
//!
//! Every function here is total: codes outside the documented WMO sets map to
//! a fallback instead of failing.

use serde::Serialize;

/// Human-readable description for a WMO weather code.
/// See: https://open-meteo.com/en/docs#weathervariables
pub fn weather_description(code: i32) -> &'static str {
    match code {
        0 => "Clear",
        1..=3 => "Partly cloudy",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        61 | 63 | 65 => "Rain",
        71 | 73 | 75 => "Snow",
        77 => "Hail",
        80..=82 => "Showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}

/// Icon selected for a weather code, split into day/night variants where the
/// artwork has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIcon {
    ClearDay,
    ClearNight,
    PartlyCloudyDay,
    PartlyCloudyNight,
    Cloudy,
    FogDay,
    FogNight,
    Drizzle,
    RainDay,
    RainNight,
    HeavyRain,
    Snow,
    Hail,
    Showers,
    SnowShowers,
    Thunderstorm,
    ThunderstormHail,
}

impl WeatherIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherIcon::ClearDay => "clear_day",
            WeatherIcon::ClearNight => "clear_night",
            WeatherIcon::PartlyCloudyDay => "partly_cloudy_day",
            WeatherIcon::PartlyCloudyNight => "partly_cloudy_night",
            WeatherIcon::Cloudy => "cloudy",
            WeatherIcon::FogDay => "fog_day",
            WeatherIcon::FogNight => "fog_night",
            WeatherIcon::Drizzle => "drizzle",
            WeatherIcon::RainDay => "rain_day",
            WeatherIcon::RainNight => "rain_night",
            WeatherIcon::HeavyRain => "heavy_rain",
            WeatherIcon::Snow => "snow",
            WeatherIcon::Hail => "hail",
            WeatherIcon::Showers => "showers",
            WeatherIcon::SnowShowers => "snow_showers",
            WeatherIcon::Thunderstorm => "thunderstorm",
            WeatherIcon::ThunderstormHail => "thunderstorm_hail",
        }
    }

    /// Terminal-friendly glyph for the icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherIcon::ClearDay => "\u{2600}",
            WeatherIcon::ClearNight => "\u{1F319}",
            WeatherIcon::PartlyCloudyDay => "\u{26C5}",
            WeatherIcon::PartlyCloudyNight => "\u{2601}",
            WeatherIcon::Cloudy => "\u{2601}",
            WeatherIcon::FogDay | WeatherIcon::FogNight => "\u{1F32B}",
            WeatherIcon::Drizzle => "\u{1F326}",
            WeatherIcon::RainDay | WeatherIcon::RainNight | WeatherIcon::HeavyRain => "\u{1F327}",
            WeatherIcon::Showers => "\u{1F327}",
            WeatherIcon::Snow | WeatherIcon::SnowShowers => "\u{1F328}",
            WeatherIcon::Hail => "\u{1F9CA}",
            WeatherIcon::Thunderstorm | WeatherIcon::ThunderstormHail => "\u{26C8}",
        }
    }
}

impl std::fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the icon for a weather code. Unknown codes fall back to the clear sky
/// icon for the given time of day.
pub fn weather_icon(code: i32, is_day: bool) -> WeatherIcon {
    let by_daylight = |day, night| if is_day { day } else { night };

    match code {
        0 => by_daylight(WeatherIcon::ClearDay, WeatherIcon::ClearNight),
        1 | 2 => by_daylight(WeatherIcon::PartlyCloudyDay, WeatherIcon::PartlyCloudyNight),
        3 => WeatherIcon::Cloudy,
        45 | 48 => by_daylight(WeatherIcon::FogDay, WeatherIcon::FogNight),
        51 | 53 | 55 => WeatherIcon::Drizzle,
        61 | 63 => by_daylight(WeatherIcon::RainDay, WeatherIcon::RainNight),
        65 => WeatherIcon::HeavyRain,
        71 | 73 | 75 => WeatherIcon::Snow,
        77 => WeatherIcon::Hail,
        80..=82 => WeatherIcon::Showers,
        85 | 86 => WeatherIcon::SnowShowers,
        95 => WeatherIcon::Thunderstorm,
        96 | 99 => WeatherIcon::ThunderstormHail,
        _ => by_daylight(WeatherIcon::ClearDay, WeatherIcon::ClearNight),
    }
}

pub fn uv_tier(index: i32) -> &'static str {
    match index {
        ..=2 => "Low",
        3..=5 => "Moderate",
        6..=7 => "High",
        8..=10 => "Very high",
        _ => "Extreme",
    }
}

/// UV tier for the fractional index the API reports; the fraction is dropped.
pub fn uv_tier_for(index: f64) -> &'static str {
    uv_tier(index.trunc() as i32)
}

pub fn humidity_tier(percent: i32) -> &'static str {
    match percent {
        ..=20 => "Very low",
        21..=40 => "Low",
        41..=60 => "Moderate",
        61..=80 => "High",
        _ => "Very high",
    }
}

pub fn air_quality_tier(aqi: i32) -> &'static str {
    match aqi {
        ..=20 => "Very good",
        21..=40 => "Good",
        41..=60 => "Moderate",
        61..=80 => "Poor",
        _ => "Very poor",
    }
}

/// Face shown next to the air-quality label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AirQualityIcon {
    VerySatisfied,
    Satisfied,
    Neutral,
    Dissatisfied,
    VeryDissatisfied,
}

impl AirQualityIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            AirQualityIcon::VerySatisfied => "\u{1F601}",
            AirQualityIcon::Satisfied => "\u{1F642}",
            AirQualityIcon::Neutral => "\u{1F610}",
            AirQualityIcon::Dissatisfied => "\u{1F641}",
            AirQualityIcon::VeryDissatisfied => "\u{1F616}",
        }
    }
}

/// Icon and label for an air-quality label produced by [`air_quality_tier`].
///
/// Any string that is not one of the five tier labels lands on the
/// "Very poor" pair.
pub fn air_quality_icon(label: &str) -> (AirQualityIcon, &'static str) {
    match label {
        "Very good" => (AirQualityIcon::VerySatisfied, "Very good"),
        "Good" => (AirQualityIcon::Satisfied, "Good"),
        "Moderate" => (AirQualityIcon::Neutral, "Moderate"),
        "Poor" => (AirQualityIcon::Dissatisfied, "Poor"),
        _ => (AirQualityIcon::VeryDissatisfied, "Very poor"),
    }
}

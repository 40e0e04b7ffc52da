//! Raw forecast payload → [`Weather`] view-model.

use chrono::NaiveDate;

use crate::{
    classify::{air_quality_tier, weather_description},
    model::{DailyForecast, HourlyForecast, RawDaily, RawForecastResponse, RawHourly, Weather},
};

pub const MAX_HOURLY_ENTRIES: usize = 24;
pub const MAX_DAILY_ENTRIES: usize = 7;

/// Build the view-model for one fetch. Never fails: slots that cannot be read
/// are dropped and the rest of the forecast is kept.
pub fn map_forecast(raw: RawForecastResponse, place_name: &str) -> Weather {
    let current = raw.current;

    let air_quality = match current.european_aqi {
        Some(aqi) => air_quality_tier(aqi).to_string(),
        None => "Unknown".to_string(),
    };

    Weather {
        location: place_name.to_string(),
        current_temp: current.temperature_2m,
        feels_like: current.apparent_temperature,
        weather_code: current.weather_code,
        weather_description: weather_description(current.weather_code).to_string(),
        is_day: current.is_day != 0,
        uv_index: current.uv_index,
        humidity: current.relative_humidity_2m,
        wind_speed: current.wind_speed_10m,
        precipitation: current.precipitation,
        air_quality,
        hourly_forecast: map_hourly(&raw.hourly),
        daily_forecast: map_daily(&raw.daily),
    }
}

fn map_hourly(hourly: &RawHourly) -> Vec<HourlyForecast> {
    let count = hourly.time.len().min(MAX_HOURLY_ENTRIES);
    let mut forecasts = Vec::with_capacity(count);

    for (i, stamp) in hourly.time.iter().take(count).enumerate() {
        let Some(hour) = hour_of_day(stamp) else {
            tracing::warn!(index = i, timestamp = %stamp, "skipping hourly slot with unreadable hour");
            continue;
        };

        let (Some(&temperature), Some(&weather_code)) =
            (hourly.temperature_2m.get(i), hourly.weather_code.get(i))
        else {
            tracing::warn!(index = i, "skipping hourly slot missing temperature or weather code");
            continue;
        };

        forecasts.push(HourlyForecast {
            time: hour_label(hour),
            temperature,
            weather_code,
            is_day: hourly.is_day.get(i).is_none_or(|flag| *flag != 0),
        });
    }

    forecasts
}

fn map_daily(daily: &RawDaily) -> Vec<DailyForecast> {
    let count = daily.time.len().min(MAX_DAILY_ENTRIES);
    let mut forecasts = Vec::with_capacity(count);

    for (i, date) in daily.time.iter().take(count).enumerate() {
        let (Some(&weather_code), Some(&max_temp), Some(&min_temp)) = (
            daily.weather_code.get(i),
            daily.temperature_2m_max.get(i),
            daily.temperature_2m_min.get(i),
        ) else {
            tracing::warn!(index = i, date = %date, "skipping daily slot missing code or temperatures");
            continue;
        };

        let precipitation_probability = daily
            .precipitation_probability_max
            .get(i)
            .copied()
            .flatten()
            .unwrap_or(0);

        forecasts.push(DailyForecast {
            day: day_label(i, date),
            weather_code,
            max_temp,
            min_temp,
            precipitation_probability,
        });
    }

    forecasts
}

/// Hour digits at positions 11-12 of a `YYYY-MM-DDTHH:MM` stamp.
pub fn hour_of_day(stamp: &str) -> Option<u32> {
    stamp
        .get(11..13)
        .and_then(|digits| digits.parse::<u32>().ok())
        .filter(|hour| *hour < 24)
}

/// 12-hour clock label: 0 → "12 am", 13 → "1 pm".
pub fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12 am".to_string(),
        12 => "12 pm".to_string(),
        h if h < 12 => format!("{h} am"),
        h => format!("{} pm", h - 12),
    }
}

/// "Today", "Tomorrow", then the capitalised weekday of `date`.
///
/// An unparseable date past the first two slots yields an empty label.
pub fn day_label(index: usize, date: &str) -> String {
    match index {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(parsed) => capitalize_first(&parsed.format("%A").to_string()),
            Err(e) => {
                tracing::warn!(index, date, error = %e, "could not parse forecast date");
                String::new()
            }
        },
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

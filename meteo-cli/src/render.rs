//! Plain-text rendering of a [`Weather`] view-model.

use std::fmt::Write;

use meteo_core::{
    Weather,
    classify::{air_quality_icon, humidity_tier, uv_tier_for, weather_icon},
};

pub fn weather(weather: &Weather) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_weather(&mut out, weather);
    out
}

fn write_weather(out: &mut String, w: &Weather) -> std::fmt::Result {
    let icon = weather_icon(w.weather_code, w.is_day);
    let (aq_icon, aq_label) = air_quality_icon(&w.air_quality);

    writeln!(out, "{}", w.location)?;
    writeln!(
        out,
        "{} {}  {} (feels like {})",
        icon.glyph(),
        w.weather_description,
        temp(w.current_temp),
        temp(w.feels_like)
    )?;
    writeln!(
        out,
        "Humidity {}% ({}) | Wind {:.1} km/h | UV {:.1} ({}) | Precipitation {:.1} mm",
        w.humidity,
        humidity_tier(w.humidity),
        w.wind_speed,
        w.uv_index,
        uv_tier_for(w.uv_index),
        w.precipitation
    )?;
    if w.air_quality == "Unknown" {
        writeln!(out, "Air quality: n/a")?;
    } else {
        writeln!(out, "Air quality: {} {}", aq_icon.glyph(), aq_label)?;
    }

    if !w.hourly_forecast.is_empty() {
        writeln!(out)?;
        writeln!(out, "Next hours")?;
        for hour in &w.hourly_forecast {
            writeln!(
                out,
                "  {:>5}  {}  {:>4}",
                hour.time,
                weather_icon(hour.weather_code, hour.is_day).glyph(),
                temp(hour.temperature)
            )?;
        }
    }

    if !w.daily_forecast.is_empty() {
        writeln!(out)?;
        writeln!(out, "Next days")?;
        for day in &w.daily_forecast {
            writeln!(
                out,
                "  {:<9}  {}  {:>4} / {:<4}  {:>3}%",
                day.day,
                weather_icon(day.weather_code, true).glyph(),
                temp(day.max_temp),
                temp(day.min_temp),
                day.precipitation_probability
            )?;
        }
    }

    Ok(())
}

fn temp(t: f64) -> String {
    // as i64 so -0.1 doesn't show up as -0
    format!("{}°", t.round() as i64)
}

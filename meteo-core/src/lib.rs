//! Core library for the `meteo` app.
//!
//! This crate defines:
//! - Raw Open-Meteo payloads and the `Weather` view-model built from them
//! - Classification of weather codes, UV index, humidity and air quality
//! - The forecast provider abstraction and its Open-Meteo implementation
//! - The screen-state controller observed by front ends
//! - Configuration handling
//!
//! It is used by `meteo-cli`, but can also be reused by other front ends.

pub mod classify;
pub mod config;
pub mod error;
pub mod location;
pub mod mapper;
pub mod model;
pub mod provider;
pub mod state;

pub use config::{Config, SavedLocation};
pub use error::{ForecastError, LocationError};
pub use location::{Coordinates, ReverseGeocoder};
pub use mapper::map_forecast;
pub use model::{DailyForecast, HourlyForecast, RawForecastResponse, Weather};
pub use provider::{ForecastProvider, OpenMeteoProvider};
pub use state::{WeatherController, WeatherState};

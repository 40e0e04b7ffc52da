use crate::{error::ForecastError, location::Coordinates, model::RawForecastResponse};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

pub use open_meteo::OpenMeteoProvider;

/// Source of raw forecast payloads.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(
        &self,
        coordinates: Coordinates,
    ) -> Result<RawForecastResponse, ForecastError>;
}

use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use meteo_core::{
    Config, Coordinates, LocationError, WeatherController, WeatherState, location,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Weather forecast from Open-Meteo")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides this).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a default location.
    Configure {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Place name to show instead of reverse geocoding.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show current conditions and the forecast.
    Show {
        /// Latitude; falls back to the configured default location.
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        /// Longitude; falls back to the configured default location.
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        /// Place name; if absent, the coordinates are reverse geocoded.
        #[arg(long)]
        place: Option<String>,

        /// Skip reverse geocoding and label the forecast with coordinates.
        #[arg(long)]
        no_geocode: bool,

        /// Print the weather as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { lat, lon, name } => configure(lat, lon, name),
            Command::Show {
                lat,
                lon,
                place,
                no_geocode,
                json,
            } => {
                let config = Config::load()?;
                let coords = match (lat, lon) {
                    (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
                    _ => config.default_coordinates(),
                };
                let saved_name = match (lat, &config.default_location) {
                    (None, Some(saved)) => saved.name.clone(),
                    _ => None,
                };

                show(&config, coords, place.or(saved_name), no_geocode, json).await
            }
        }
    }
}

fn configure(lat: Option<f64>, lon: Option<f64>, name: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let current = config.default_location.clone();

    let latitude = match lat {
        Some(v) => v,
        None => {
            let mut prompt = CustomType::<f64>::new("Latitude:")
                .with_error_message("Please type a decimal number, e.g. 40.4168");
            if let Some(saved) = &current {
                prompt = prompt.with_default(saved.latitude);
            }
            prompt.prompt().context("Failed to read latitude")?
        }
    };

    let longitude = match lon {
        Some(v) => v,
        None => {
            let mut prompt = CustomType::<f64>::new("Longitude:")
                .with_error_message("Please type a decimal number, e.g. -3.7038");
            if let Some(saved) = &current {
                prompt = prompt.with_default(saved.longitude);
            }
            prompt.prompt().context("Failed to read longitude")?
        }
    };

    let coords = Coordinates::new(latitude, longitude)?;

    let name = match name {
        Some(n) => Some(n),
        None => Text::new("Place name (leave empty to reverse geocode):")
            .prompt_skippable()
            .context("Failed to read place name")?,
    };

    config.set_default_location(coords, name);
    config.save()?;

    println!(
        "Saved default location {} to {}",
        coords,
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn show(
    config: &Config,
    coords: Result<Coordinates, LocationError>,
    place: Option<String>,
    no_geocode: bool,
    json: bool,
) -> anyhow::Result<()> {
    let controller = WeatherController::new(Arc::new(config.forecast_provider()?));
    let mut rx = controller.subscribe();

    let watcher = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            tracing::debug!(state = state.name(), "weather state changed");
            if state.is_loading() && !json {
                eprintln!("Loading forecast...");
            }
        }
    });

    match coords {
        Ok(coords) => {
            let place = match place {
                Some(p) => p,
                None if no_geocode => coords.to_string(),
                None => location::resolve_place_name(&config.geocoder(), coords).await,
            };
            controller
                .fetch(coords.latitude, coords.longitude, &place)
                .await;
        }
        Err(e) => controller.location_failed(e),
    }

    let final_state = controller.state();
    // Closing the only sender ends the watcher loop.
    drop(controller);
    let _ = watcher.await;

    match final_state {
        WeatherState::Success(weather) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&weather)?);
            } else {
                print!("{}", render::weather(&weather));
            }
            Ok(())
        }
        WeatherState::Error(message) => Err(anyhow!(message)),
        WeatherState::PermissionRequired => Err(anyhow!(
            "Location permission is required.\n\
             Hint: pass --lat/--lon or run `meteo configure`."
        )),
        other => Err(anyhow!("Unexpected weather state: {}", other.name())),
    }
}

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    error::LocationError,
    location::{Coordinates, NOMINATIM_URL, ReverseGeocoder},
    provider::{OpenMeteoProvider, open_meteo},
};

/// A location saved with `meteo configure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Place name shown instead of reverse geocoding, if set.
    pub name: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// forecast_base_url = "https://api.open-meteo.com"
/// timeout_secs = 15
///
/// [default_location]
/// latitude = 40.4168
/// longitude = -3.7038
/// name = "Madrid, Spain"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub forecast_base_url: String,
    pub geocoding_base_url: String,
    /// Request timeout; the HTTP client default applies when unset.
    pub timeout_secs: Option<u64>,
    pub default_location: Option<SavedLocation>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forecast_base_url: open_meteo::DEFAULT_BASE_URL.to_string(),
            geocoding_base_url: NOMINATIM_URL.to_string(),
            timeout_secs: None,
            default_location: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_default_location(&mut self, coordinates: Coordinates, name: Option<String>) {
        self.default_location = Some(SavedLocation {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            name: name.filter(|n| !n.trim().is_empty()),
        });
    }

    /// The saved default location as validated coordinates.
    pub fn default_coordinates(&self) -> Result<Coordinates, LocationError> {
        let saved = self.default_location.as_ref().ok_or_else(|| {
            LocationError::Unavailable(
                "no coordinates given and no default location configured \
                 (pass --lat/--lon or run `meteo configure`)"
                    .to_string(),
            )
        })?;

        Coordinates::new(saved.latitude, saved.longitude)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Construct the forecast provider described by this config.
    pub fn forecast_provider(&self) -> Result<OpenMeteoProvider> {
        match self.timeout() {
            Some(timeout) => OpenMeteoProvider::with_timeout(&self.forecast_base_url, timeout)
                .context("Failed to build forecast HTTP client"),
            None => Ok(OpenMeteoProvider::with_base_url(&self.forecast_base_url)),
        }
    }

    pub fn geocoder(&self) -> ReverseGeocoder {
        ReverseGeocoder::with_base_url(&self.geocoding_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.forecast_base_url, "https://api.open-meteo.com");
        assert!(cfg.timeout().is_none());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.timeout_secs = Some(5);
        cfg.set_default_location(Coordinates::new(40.4168, -3.7038).unwrap(), Some("Madrid".into()));
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = 3\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timeout_secs, Some(3));
        assert_eq!(cfg.geocoding_base_url, NOMINATIM_URL);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn default_coordinates_errors_when_not_set() {
        let err = Config::default().default_coordinates().unwrap_err();
        assert!(matches!(err, LocationError::Unavailable(_)));
        assert!(err.to_string().contains("no default location configured"));
    }

    #[test]
    fn invalid_saved_location_is_rejected() {
        let mut cfg = Config::default();
        cfg.default_location = Some(SavedLocation {
            latitude: 120.0,
            longitude: 0.0,
            name: None,
        });

        assert!(matches!(
            cfg.default_coordinates(),
            Err(LocationError::Unavailable(m)) if m.contains("latitude")
        ));
    }

    #[test]
    fn blank_location_name_is_dropped() {
        let mut cfg = Config::default();
        cfg.set_default_location(Coordinates::new(1.0, 2.0).unwrap(), Some("  ".into()));

        let saved = cfg.default_location.as_ref().unwrap();
        assert!(saved.name.is_none());
        assert_eq!(cfg.default_coordinates().unwrap(), Coordinates::new(1.0, 2.0).unwrap());
    }

    #[test]
    fn forecast_provider_uses_configured_base_url() {
        let mut cfg = Config::default();
        cfg.forecast_base_url = "http://localhost:1234/".into();
        cfg.timeout_secs = Some(2);

        let provider = cfg.forecast_provider().unwrap();
        assert_eq!(provider.base_url(), "http://localhost:1234");
    }
}

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    session::{DEFAULT_CITY, RecordPolicy, SessionSettings},
    units::UnitPreference,
};

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "SKYGLASS_API_KEY";

/// Where the current position comes from.
///
/// Example TOML:
/// [location]
/// mode = "fixed"
/// latitude = -26.19
/// longitude = 28.32
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LocationConfig {
    /// Estimate the position from the public IP address.
    #[default]
    Ip,
    Fixed {
        latitude: f64,
        longitude: f64,
    },
    /// No location capability at all.
    Off,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// OpenWeatherMap API key.
    pub api_key: Option<String>,

    /// Overrides the OpenWeatherMap host, e.g. for a proxy.
    pub base_url: Option<String>,

    /// City used when the current location can't be determined.
    pub default_city: Option<String>,

    pub unit: UnitPreference,

    pub record_policy: RecordPolicy,

    pub location: LocationConfig,
}

impl Config {
    /// API key from `SKYGLASS_API_KEY`, falling back to the config file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    pub fn default_city(&self) -> &str {
        self.default_city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .unwrap_or(DEFAULT_CITY)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            default_city: self.default_city().to_string(),
            record_policy: self.record_policy,
            unit: self.unit,
            ..SessionSettings::default()
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the key-value store holding recent searches.
    pub fn store_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("store.json"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "skyglass", "skyglass")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fall_back_to_benoni_and_celsius() {
        let cfg = Config::default();

        assert_eq!(cfg.default_city(), "Benoni");
        assert_eq!(cfg.unit, UnitPreference::Celsius);
        assert_eq!(cfg.location, LocationConfig::Ip);
        assert_eq!(cfg.record_policy, RecordPolicy::QueriedName);
    }

    #[test]
    fn blank_default_city_is_ignored() {
        let cfg = Config { default_city: Some("  ".into()), ..Config::default() };
        assert_eq!(cfg.default_city(), "Benoni");
        assert_eq!(cfg.session_settings().default_city, "Benoni");
    }

    #[test]
    fn set_api_key_trims() {
        let mut cfg = Config::default();
        cfg.set_api_key("  KEY  ".into());
        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn parses_full_toml() {
        let cfg: Config = toml::from_str(
            r#"
            api_key = "abc"
            default_city = "Durban"
            unit = "fahrenheit"
            record_policy = "provider_name"

            [location]
            mode = "fixed"
            latitude = -29.86
            longitude = 31.02
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.default_city(), "Durban");
        assert_eq!(cfg.unit, UnitPreference::Fahrenheit);
        assert_eq!(cfg.record_policy, RecordPolicy::ProviderName);
        assert_eq!(cfg.location, LocationConfig::Fixed { latitude: -29.86, longitude: 31.02 });
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = Config {
            api_key: Some("abc".into()),
            location: LocationConfig::Off,
            ..Config::default()
        };

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.api_key.as_deref(), Some("abc"));
        assert_eq!(parsed.location, LocationConfig::Off);
    }
}

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::provider::ServiceId;
use crate::units::TemperatureUnit;

/// Configuration for a single backing service (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Preferred display unit; temperatures render in Fahrenheit when unset.
    pub default_unit: Option<TemperatureUnit>,

    /// Example TOML:
    /// [services.visualcrossing]
    /// api_key = "..."
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,
}

impl Config {
    pub fn default_unit(&self) -> TemperatureUnit {
        self.default_unit.unwrap_or_default()
    }

    pub fn set_default_unit(&mut self, unit: TemperatureUnit) {
        self.default_unit = Some(unit);
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
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace a service API key.
    pub fn upsert_service_api_key(&mut self, service_id: ServiceId, api_key: String) {
        self.services.insert(service_id.as_str().to_string(), ServiceConfig { api_key });
    }

    /// Returns the API key stored in the config file for a service, if present.
    pub fn service_api_key(&self, service_id: ServiceId) -> Option<&str> {
        self.services.get(service_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    /// Resolve the key for a service: the process environment wins over the
    /// config file, matching how deployments inject secrets.
    pub fn resolve_api_key(&self, service_id: ServiceId) -> Option<String> {
        std::env::var(service_id.env_var())
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.service_api_key(service_id).map(str::to_string))
    }

    pub fn is_service_configured(&self, service_id: ServiceId) -> bool {
        self.resolve_api_key(service_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ServiceId;

    #[test]
    fn default_unit_falls_back_to_fahrenheit() {
        let cfg = Config::default();
        assert_eq!(cfg.default_unit(), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn set_default_unit_round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_default_unit(TemperatureUnit::Celsius);

        let encoded = toml::to_string_pretty(&cfg).expect("config must serialize");
        assert!(encoded.contains("default_unit = \"celsius\""));

        let decoded: Config = toml::from_str(&encoded).expect("config must parse back");
        assert_eq!(decoded.default_unit(), TemperatureUnit::Celsius);
    }

    #[test]
    fn upsert_and_read_service_api_key() {
        let mut cfg = Config::default();

        cfg.upsert_service_api_key(ServiceId::VisualCrossing, "VC_KEY".into());

        assert_eq!(cfg.service_api_key(ServiceId::VisualCrossing), Some("VC_KEY"));
        assert_eq!(cfg.service_api_key(ServiceId::Giphy), None);
        assert!(cfg.is_service_configured(ServiceId::VisualCrossing));
    }

    #[test]
    fn upsert_replaces_existing_key() {
        let mut cfg = Config::default();

        cfg.upsert_service_api_key(ServiceId::Giphy, "OLD".into());
        cfg.upsert_service_api_key(ServiceId::Giphy, "NEW".into());

        assert_eq!(cfg.service_api_key(ServiceId::Giphy), Some("NEW"));
    }

    #[test]
    fn config_without_services_table_parses() {
        let cfg: Config = toml::from_str("default_unit = \"fahrenheit\"").expect("must parse");
        assert!(cfg.services.is_empty());
    }
}

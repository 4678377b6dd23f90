//! Configuration management for the Overseer host session.
//!
//! Loads `config.toml`, writing a default file when none exists, and checks
//! every tunable against the same validation table the surrogates use.

use std::path::Path;

use overseer_api::{validate_field, ValidationError};
use overseer_event_system::EventSettings;
use serde::{Deserialize, Serialize};
use tracing::info;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
    #[error("Invalid tuning value: {0}")]
    InvalidTuning(#[from] ValidationError),
    #[error("Invalid simulation settings: {0}")]
    InvalidSimulation(String),
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub events: EventSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub tuning: TuningSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Drives the simulated host session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Ticks to run before shutting down on its own
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    #[serde(default = "default_players")]
    pub players: u32,
    #[serde(default = "default_seed")]
    pub seed: i32,
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_ticks() -> u64 {
    40
}

fn default_players() -> u32 {
    6
}

fn default_seed() -> i32 {
    1_968
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            ticks: default_ticks(),
            players: default_players(),
            seed: default_seed(),
        }
    }
}

/// Gameplay values pushed onto surrogates as they appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningSettings {
    pub grenade_fuse_time: f64,
    pub scp049_sense_distance: f64,
    pub scp049_call_cooldown: f64,
    pub scp3114_reveal_delay: f64,
    pub scp3114_reveal_duration: f64,
    pub stamina_usage_multiplier: f64,
    pub stamina_regen_multiplier: f64,
}

impl Default for TuningSettings {
    fn default() -> Self {
        Self {
            grenade_fuse_time: 5.0,
            scp049_sense_distance: 100.0,
            scp049_call_cooldown: 60.0,
            scp3114_reveal_delay: 1.0,
            scp3114_reveal_duration: 0.5,
            stamina_usage_multiplier: 1.0,
            stamina_regen_multiplier: 1.0,
        }
    }
}

impl TuningSettings {
    /// Each value paired with the validation field it is checked against.
    pub fn fields(&self) -> [(&'static str, f64); 7] {
        [
            ("grenade.fuse_time", self.grenade_fuse_time),
            ("scp049.sense_distance", self.scp049_sense_distance),
            ("scp049.cooldown", self.scp049_call_cooldown),
            ("scp3114_ragdoll.reveal_delay", self.scp3114_reveal_delay),
            ("scp3114_ragdoll.reveal_duration", self.scp3114_reveal_duration),
            ("fpc.stamina_usage_multiplier", self.stamina_usage_multiplier),
            ("fpc.stamina_regen_multiplier", self.stamina_regen_multiplier),
        ]
    }
}

impl AppConfig {
    /// Loads the configuration at `path`, creating a default file when it
    /// does not exist.
    pub async fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if tokio::fs::try_exists(path).await? {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.logging.level.clone()));
        }

        if self.simulation.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidSimulation(
                "simulation.tick_interval_ms must be greater than 0".to_string(),
            ));
        }

        for (field, value) in self.tuning.fields() {
            validate_field(field, value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overseer_event_system::DenialPolicy;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_writes_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());

        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded, config);
    }

    #[tokio::test]
    async fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(
            &path,
            r#"
[logging]
level = "debug"

[events]
denial_policy = "sticky"

[tuning]
grenade_fuse_time = 3.5
"#,
        )
        .await
        .unwrap();

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.events.denial_policy, DenialPolicy::Sticky);
        assert!(!config.events.warn_on_missing_handlers);
        assert_eq!(config.tuning.grenade_fuse_time, 3.5);
        assert_eq!(config.tuning.scp049_sense_distance, 100.0);
        assert_eq!(config.simulation, SimulationSettings::default());
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_malformed_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[logging\nlevel = ").await.unwrap();

        let result = AppConfig::load_from_file(&path).await;
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.logging.level = "verbose".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLogLevel(_))));
        config.logging.level = "warn".to_string();

        config.tuning.grenade_fuse_time = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTuning(_))));
        config.tuning.grenade_fuse_time = 2.0;

        config.tuning.stamina_regen_multiplier = 10.0;
        assert!(config.validate().is_ok());
        config.tuning.stamina_regen_multiplier = 10.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTuning(_))));
        config.tuning.stamina_regen_multiplier = 1.0;

        config.simulation.tick_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSimulation(_))));
    }
}

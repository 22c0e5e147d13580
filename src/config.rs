use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable consulted when no key is stored in the file.
const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Generative service API key; falls back to GEMINI_API_KEY
    pub api_key: Option<String>,

    /// Master volume for SFX and ambient paths (0.0-1.0)
    pub master_volume: f32,

    /// Mute all audio output
    pub muted: bool,

    /// Timeout for remote service calls in seconds
    pub service_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            master_volume: crate::audio::DEFAULT_MASTER_VOLUME,
            muted: false,
            service_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from the platform-specific config directory.
    /// Creates default config if file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::LoadFailed {
                path: config_path.display().to_string(),
                source: Box::new(e),
            })?;
            let config: Config =
                serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: config_path.display().to_string(),
                    source: Box::new(e),
                })?;
            tracing::info!("Loaded config from: {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            tracing::info!("Created default config at: {}", config_path.display());
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: config_path.display().to_string(),
                source: Box::new(e),
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: config_path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(&config_path, json).map_err(|e| ConfigError::SaveFailed {
            path: config_path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(())
    }

    /// Get the config file path
    fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("GhostlyChronicles").join("config.json"))
            .ok_or(ConfigError::NoConfigDirectory)
    }

    /// The key used for service calls: stored value first, then the
    /// environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }

    /// Effective master volume after the mute switch.
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    pub fn service_timeout(&self) -> Duration {
        Duration::from_secs(self.service_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.master_volume, 0.25);
        assert!(!config.muted);
        assert_eq!(config.service_timeout_secs, 10);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.master_volume, deserialized.master_volume);
        assert_eq!(config.muted, deserialized.muted);
    }

    #[test]
    fn test_effective_volume_respects_mute() {
        let mut config = Config::default();
        assert_eq!(config.effective_volume(), 0.25);

        config.muted = true;
        assert_eq!(config.effective_volume(), 0.0);

        config.muted = false;
        config.master_volume = 2.0;
        assert_eq!(config.effective_volume(), 1.0);
    }

    #[test]
    fn test_stored_key_wins_over_environment() {
        let config = Config {
            api_key: Some("stored-key-value".to_string()),
            ..Config::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("stored-key-value"));
    }
}

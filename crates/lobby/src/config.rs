//! Configuration management for the lobby server.
//!
//! This module handles loading, validation, and conversion of the server
//! configuration from TOML files and command-line arguments.

use crate::cli::CliArgs;
use lobby_core::RegistryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

fn default_inbox_capacity() -> usize {
    1024
}

fn default_delivery_timeout_ms() -> u64 {
    100
}

fn default_reject_duplicate_names() -> bool {
    true
}

fn default_prompt() -> String {
    "Command> ".to_string()
}

fn default_stats_interval_secs() -> u64 {
    60
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Player registry settings
    #[serde(default)]
    pub registry: RegistrySettings,
    /// Logging configuration settings
    pub logging: LoggingSettings,
    /// Interactive console settings
    #[serde(default)]
    pub console: ConsoleSettings,
}

/// Player registry settings.
///
/// Controls inbox sizing, broadcast delivery and the duplicate-name policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Messages each player inbox can hold before broadcasts have to wait
    #[serde(default = "default_inbox_capacity")]
    pub inbox_capacity: usize,
    /// How long a broadcast waits on one full inbox, in milliseconds
    #[serde(default = "default_delivery_timeout_ms")]
    pub delivery_timeout_ms: u64,
    /// Whether a second player with a registered name is rejected
    #[serde(default = "default_reject_duplicate_names")]
    pub reject_duplicate_names: bool,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
}

/// Interactive console configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Prompt printed before each command
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Interval of the "players online" report in seconds (0 to disable)
    #[serde(default = "default_stats_interval_secs")]
    pub stats_interval_secs: u64,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            inbox_capacity: default_inbox_capacity(),
            delivery_timeout_ms: default_delivery_timeout_ms(),
            reject_duplicate_names: default_reject_duplicate_names(),
        }
    }
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            stats_interval_secs: default_stats_interval_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            registry: RegistrySettings::default(),
            logging: LoggingSettings {
                level: "info".to_string(),
                json_format: false,
            },
            console: ConsoleSettings::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the
    /// specified path and returns the default configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The loaded or default configuration, or an error if loading/creation failed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
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

    /// Applies command-line overrides on top of the file settings.
    pub fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
        }
        if args.json_logs {
            self.logging.json_format = true;
        }
        if let Some(capacity) = args.inbox_capacity {
            self.registry.inbox_capacity = capacity;
        }
        if let Some(timeout) = args.delivery_timeout_ms {
            self.registry.delivery_timeout_ms = timeout;
        }
        if args.allow_duplicate_names {
            self.registry.reject_duplicate_names = false;
        }
    }

    /// Converts the registry settings into the core registry configuration.
    pub fn to_registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            inbox_capacity: self.registry.inbox_capacity,
            delivery_timeout_ms: self.registry.delivery_timeout_ms,
            reject_duplicate_names: self.registry.reject_duplicate_names,
        }
    }

    /// Validates the configuration for consistency and correctness.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, or an error string describing the issue.
    pub fn validate(&self) -> Result<(), String> {
        if self.registry.inbox_capacity == 0 {
            return Err("registry.inbox_capacity must be greater than 0".to_string());
        }

        if self.registry.delivery_timeout_ms == 0 {
            return Err("registry.delivery_timeout_ms must be greater than 0".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::{NamedTempFile, TempDir};
    use tokio::fs;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.registry.inbox_capacity, 1024);
        assert_eq!(config.registry.delivery_timeout_ms, 100);
        assert!(config.registry.reject_duplicate_names);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert_eq!(config.console.prompt, "Command> ");
        assert_eq!(config.console.stats_interval_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_registry_config_matches_core_default() {
        assert_eq!(AppConfig::default().to_registry_config(), RegistryConfig::default());
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lobby.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.registry.inbox_capacity, 1024);

        // Should create the file
        assert!(path.exists());
        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded.logging.level, "info");
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r#"
[registry]
inbox_capacity = 8
delivery_timeout_ms = 250
reject_duplicate_names = false

[logging]
level = "debug"
json_format = true

[console]
prompt = "> "
stats_interval_secs = 0
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), toml_content).await.unwrap();

        let config = AppConfig::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.registry.inbox_capacity, 8);
        assert_eq!(config.registry.delivery_timeout_ms, 250);
        assert!(!config.registry.reject_duplicate_names);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
        assert_eq!(config.console.prompt, "> ");
        assert_eq!(config.console.stats_interval_secs, 0);
    }

    #[test]
    fn test_serde_deserialization_with_defaults() {
        let toml_content = r#"
[logging]
level = "warn"
json_format = false
"#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.registry.inbox_capacity, 1024);
        assert!(config.registry.reject_duplicate_names);
        assert_eq!(config.console.prompt, "Command> ");
    }

    #[test]
    fn test_validation_rejects_zero_capacity_and_timeout() {
        let mut config = AppConfig::default();
        config.registry.inbox_capacity = 0;
        assert!(config.validate().unwrap_err().contains("inbox_capacity"));

        let mut config = AppConfig::default();
        config.registry.delivery_timeout_ms = 0;
        assert!(config.validate().unwrap_err().contains("delivery_timeout_ms"));
    }

    #[test]
    fn test_validation_log_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let mut config = AppConfig::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "Level '{}' should be valid", level);
        }

        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().unwrap_err().contains("Invalid log level"));
    }

    #[test]
    fn test_apply_cli_overrides() {
        let args = CliArgs {
            config_path: PathBuf::from("lobby.toml"),
            log_level: Some("trace".to_string()),
            json_logs: true,
            inbox_capacity: Some(4),
            delivery_timeout_ms: Some(20),
            allow_duplicate_names: true,
        };

        let mut config = AppConfig::default();
        config.apply_cli(&args);

        assert_eq!(config.logging.level, "trace");
        assert!(config.logging.json_format);
        let registry = config.to_registry_config();
        assert_eq!(registry.inbox_capacity, 4);
        assert_eq!(registry.delivery_timeout_ms, 20);
        assert!(!registry.reject_duplicate_names);
    }
}

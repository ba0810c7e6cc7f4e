//! # Lobby Server - Main Entry Point
//!
//! Interactive lobby built on `lobby_core`: players log in and out, the
//! roster can be listed, and messages are broadcast to every player. This
//! entry point handles CLI parsing, configuration loading, and application
//! lifecycle management.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration
//! lobby
//!
//! # Specify custom configuration
//! lobby --config production.toml
//!
//! # Override specific settings
//! lobby --inbox-capacity 64 --delivery-timeout-ms 250 --log-level debug
//!
//! # JSON logging for production
//! lobby --json-logs
//! ```
//!
//! ## Configuration
//!
//! The server loads configuration from a TOML file (default: `lobby.toml`).
//! If the file doesn't exist, a default configuration will be created.
//!
//! ## Signal Handling
//!
//! The server handles graceful shutdown on:
//! - SIGINT (Ctrl+C)
//! - SIGTERM (Unix systems)

use tracing::error;

mod app;
mod cli;
mod config;
mod logging;
mod shell;
mod signals;

pub use app::{run_console, Application};
pub use cli::CliArgs;
pub use config::{AppConfig, ConsoleSettings, LoggingSettings, RegistrySettings};
pub use shell::{Outcome, ParseError, Shell, ShellCommand};

/// Main entry point for the lobby server.
///
/// Handles the complete application lifecycle including:
/// 1. Command-line argument parsing
/// 2. Configuration loading and validation
/// 3. Logging system initialization
/// 4. Application creation and execution
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Load configuration to get logging settings
    let mut config = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default();
    config.apply_cli(&args);

    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let registry = config.to_registry_config();
        assert_eq!(registry.inbox_capacity, 1024);
        assert_eq!(registry.delivery_timeout_ms, 100);
    }

    #[test]
    fn test_cli_parsing() {
        let args = CliArgs::try_parse_from([
            "lobby",
            "--config",
            "test.toml",
            "--log-level",
            "debug",
            "--json-logs",
        ])
        .unwrap();

        assert_eq!(args.config_path, PathBuf::from("test.toml"));
        assert_eq!(args.log_level, Some("debug".to_string()));
        assert!(args.json_logs);
        assert!(!args.allow_duplicate_names);
    }

    #[tokio::test]
    async fn test_application_creation() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("test_config.toml");

        let test_config = AppConfig::default();
        let toml_content = toml::to_string_pretty(&test_config)
            .expect("Failed to serialize default config to TOML");
        tokio::fs::write(&config_path, toml_content)
            .await
            .expect("Failed to write test config file");

        let args = CliArgs::try_parse_from([
            "lobby",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();
        assert!(Application::new(args).await.is_ok());
    }
}

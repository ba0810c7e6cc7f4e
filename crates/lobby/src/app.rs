//! Main application logic and lifecycle management.
//!
//! This module contains the `Application` struct that wires the registry,
//! dispatcher and IPC server together, runs the interactive console, and
//! coordinates shutdown.

use crate::{
    cli::CliArgs,
    config::AppConfig,
    logging::display_banner,
    shell::{Outcome, Shell},
    signals::{setup_signal_handlers, wait_for_signal},
};
use lobby_core::{create_ipc_server, IpcServer, LobbyClient, Registry, ShutdownState};
use std::sync::Arc;
use std::time::Duration;
use std::io::BufRead;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Main application struct.
///
/// # Architecture
///
/// * **Configuration Management**: Loads and validates configuration from files and CLI
/// * **Lobby Orchestration**: Owns the registry and the IPC server in front of it
/// * **Console**: Reads commands from stdin and executes them through a lobby session
/// * **Graceful Shutdown**: Handles termination signals and reports final state
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// Player registry shared with the dispatcher
    registry: Arc<Registry>,
    /// IPC server handing out lobby sessions
    ipc: IpcServer,
    /// Shutdown coordination
    shutdown: ShutdownState,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// # Process
    ///
    /// 1. Load configuration from file (creating default if missing)
    /// 2. Apply command-line argument overrides
    /// 3. Validate merged configuration
    /// 4. Create the registry and the IPC server in front of it
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;
        config.apply_cli(&args);

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        Ok(Self::from_config(config))
    }

    /// Creates an application from an already validated configuration.
    pub fn from_config(config: AppConfig) -> Self {
        let registry = Arc::new(Registry::new(config.to_registry_config()));
        let ipc = create_ipc_server(Arc::clone(&registry));
        Self {
            config,
            registry,
            ipc,
            shutdown: ShutdownState::new(),
        }
    }

    /// Runs the console until `quit`, end of input, or a shutdown signal.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        display_banner();
        self.log_configuration_summary();

        let signal_handle = {
            let shutdown = self.shutdown.clone();
            tokio::spawn(async move {
                if let Err(e) = setup_signal_handlers(&shutdown).await {
                    error!("Failed to set up signal handler: {e}");
                    return;
                }

                // A second signal skips the graceful path.
                if wait_for_signal().await.is_ok() {
                    warn!("Shutdown signal received again! Exiting immediately.");
                    std::process::exit(1);
                }
            })
        };

        let monitoring_handle = self.spawn_monitoring();

        info!("✅ Lobby is now running");
        let input = spawn_stdin_reader();
        let stdout = tokio::io::stdout();
        let shell = Shell::new(LobbyClient::new(self.ipc.connect()));
        let result = run_console(shell, input, stdout, &self.config.console.prompt, &self.shutdown).await;

        self.shutdown.initiate_shutdown();
        if let Some(handle) = monitoring_handle {
            handle.abort();
        }
        signal_handle.abort();

        info!("📊 Final Statistics:");
        info!("  - Players still online: {}", self.registry.len().await);
        self.shutdown.complete_shutdown();
        info!("👋 Lobby shutdown complete");

        result
    }

    /// Starts the periodic "players online" report, unless disabled.
    fn spawn_monitoring(&self) -> Option<tokio::task::JoinHandle<()>> {
        let interval_secs = self.config.console.stats_interval_secs;
        if interval_secs == 0 {
            return None;
        }

        let registry = Arc::clone(&self.registry);
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
            // The first tick fires immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                info!("👥 {} players online", registry.len().await);
            }
        }))
    }

    /// Logs the configuration summary at startup.
    fn log_configuration_summary(&self) {
        let registry = &self.config.registry;
        info!("📋 Configuration Summary:");
        info!("  📬 Inbox capacity: {} messages", registry.inbox_capacity);
        info!("  ⏱️ Delivery timeout: {}ms", registry.delivery_timeout_ms);
        info!(
            "  👥 Duplicate names: {}",
            if registry.reject_duplicate_names { "rejected" } else { "allowed" }
        );
    }
}

/// Forwards stdin lines from a dedicated thread.
///
/// The thread is detached, so a read still blocked at exit does not keep
/// the runtime from shutting down.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    line_rx
}

/// Reads commands from `input` and writes results to `output` until the
/// shell quits, input ends, or shutdown is initiated.
pub async fn run_console<W>(
    mut shell: Shell,
    mut input: mpsc::Receiver<String>,
    mut output: W,
    prompt: &str,
    shutdown: &ShutdownState,
) -> Result<(), Box<dyn std::error::Error>>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    loop {
        output.write_all(prompt.as_bytes()).await?;
        output.flush().await?;

        let line = tokio::select! {
            line = input.recv() => line,
            _ = shutdown.initiated() => None,
        };
        let Some(line) = line else {
            break;
        };

        match shell.execute(&line).await? {
            Outcome::Output(text) if text.is_empty() => {}
            Outcome::Output(text) => {
                output.write_all(text.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            Outcome::Quit => break,
        }
    }
    output.flush().await?;
    Ok(())
}

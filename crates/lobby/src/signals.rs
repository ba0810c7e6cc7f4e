//! Signal handling for graceful server shutdown.
//!
//! This module provides cross-platform signal handling so the lobby stops
//! its console and reports final state when asked to terminate.

use lobby_core::ShutdownState;
use tokio::signal;
use tracing::info;

/// Waits for a termination signal and initiates shutdown on `state`.
///
/// # Platform Support
///
/// * **Unix platforms**: Handles SIGINT and SIGTERM signals
/// * **Windows**: Handles Ctrl+C signal
pub async fn setup_signal_handlers(
    state: &ShutdownState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    wait_for_signal().await?;
    info!("📡 Received shutdown signal - initiating graceful shutdown");
    state.initiate_shutdown();
    Ok(())
}

/// Waits for a termination signal without touching any shutdown state.
pub async fn wait_for_signal() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => (),
            _ = sigterm.recv() => ()
        }
    }

    #[cfg(windows)]
    signal::ctrl_c().await?;

    Ok(())
}

//! Stop coordination for the lobby process.
//!
//! The signal task, the console loop and the application lifecycle share one
//! [`ShutdownState`]. Whoever sees the first stop request flips it; the others
//! either poll the flag or await [`ShutdownState::initiated`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::info;

/// Cloneable handle to the lobby's stop state.
///
/// Clones share the same flags, so a signal handler can stop a console
/// that is blocked waiting for input.
#[derive(Debug, Clone)]
pub struct ShutdownState {
    /// Set once a stop was requested; the console stops reading commands
    stopping: Arc<AtomicBool>,
    /// Set after final statistics have been reported
    stopped: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownState {
    pub fn new() -> Self {
        Self {
            stopping: Arc::new(AtomicBool::new(false)),
            stopped: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Whether a stop was requested.
    pub fn is_shutdown_initiated(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    /// Whether the lobby finished its final report.
    pub fn is_shutdown_complete(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Requests a stop and wakes the console. Only the first call logs.
    pub fn initiate_shutdown(&self) {
        if !self.stopping.swap(true, Ordering::AcqRel) {
            info!("🛑 Stop requested - console closing");
            self.notify.notify_waiters();
        }
    }

    /// Records that the final report has been written.
    pub fn complete_shutdown(&self) {
        self.stopped.store(true, Ordering::Release);
        info!("✅ Lobby stopped");
    }

    /// Resolves once a stop has been requested, immediately if it already was.
    pub async fn initiated(&self) {
        loop {
            // Register before checking the flag so a concurrent notify is not lost.
            let notified = self.notify.notified();
            if self.is_shutdown_initiated() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for ShutdownState {
    fn default() -> Self {
        Self::new()
    }
}

//! Registry configuration types and defaults.
//!
//! This module contains the configuration structure used to tune inbox
//! sizing, broadcast delivery and the duplicate-name policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration structure for the player registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Capacity of each player's inbound message queue
    pub inbox_capacity: usize,

    /// Per-player broadcast delivery timeout in milliseconds
    pub delivery_timeout_ms: u64,

    /// Whether a second player with an already registered name is rejected
    pub reject_duplicate_names: bool,
}

impl RegistryConfig {
    /// The delivery timeout as a [`Duration`].
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            inbox_capacity: 1024,
            delivery_timeout_ms: 100,
            reject_duplicate_names: true,
        }
    }
}

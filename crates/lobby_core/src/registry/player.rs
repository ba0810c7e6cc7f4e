//! Player record representation.
//!
//! This module defines the serialized player record and the registry entry
//! that pairs it with the sending half of the player's inbox.

use crate::messaging::Message;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Unique identifier assigned to a player when it joins the registry.
pub type SessionId = Uuid;

/// The wire representation of a connected player.
///
/// Only `name` is required; it is the lookup key inside the registry.
/// Unknown fields in incoming records are ignored.
///
/// # Example
///
/// ```json
/// { "name": "Alice", "level": 3, "exp": 1200, "room": 0 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Display name, unique within the registry under the default policy
    pub name: String,

    /// Player level
    #[serde(default)]
    pub level: u32,

    /// Accumulated experience points
    #[serde(default)]
    pub exp: u64,

    /// Room the player currently sits in (0 means none)
    #[serde(default)]
    pub room: u32,
}

impl PlayerInfo {
    /// Creates a level 0 player record with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 0,
            exp: 0,
            room: 0,
        }
    }

    /// Sets the level and experience of this record.
    pub fn with_progress(mut self, level: u32, exp: u64) -> Self {
        self.level = level;
        self.exp = exp;
        self
    }
}

/// A registered player as stored by the registry.
///
/// The entry only holds the sending half of the inbox; the receiving half
/// belongs to whoever consumes the player's messages.
#[derive(Debug)]
pub(crate) struct PlayerEntry {
    pub info: PlayerInfo,
    pub session_id: SessionId,
    pub joined_at: SystemTime,
    pub mailbox: mpsc::Sender<Arc<Message>>,
}

impl PlayerEntry {
    pub fn new(
        info: PlayerInfo,
        session_id: SessionId,
        mailbox: mpsc::Sender<Arc<Message>>,
    ) -> Self {
        Self {
            info,
            session_id,
            joined_at: SystemTime::now(),
            mailbox,
        }
    }
}

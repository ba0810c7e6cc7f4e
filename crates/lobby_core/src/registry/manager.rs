//! Player registry for tracking connected players.
//!
//! This module provides the central registry of all connected players,
//! handling player lifecycle, lookups, and broadcast delivery to their
//! inboxes.

use super::inbox::{self, Inbox, InboxHandler, LoggingInboxHandler};
use super::player::{PlayerEntry, PlayerInfo, SessionId};
use crate::config::RegistryConfig;
use crate::error::{EmptyOperation, RegistryError};
use crate::messaging::Message;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::sync::mpsc::error::SendTimeoutError;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Why a broadcast could not be delivered to one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The inbox stayed full for the whole delivery timeout
    Timeout,
    /// The inbox receiver has been dropped
    Closed,
}

impl std::fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryFailure::Timeout => write!(f, "inbox full"),
            DeliveryFailure::Closed => write!(f, "inbox closed"),
        }
    }
}

/// Outcome of a broadcast.
///
/// A broadcast only fails as a whole when the message cannot be decoded or
/// nobody is registered; individual players that could not be reached are
/// listed in `failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Number of inboxes the message was queued into
    pub delivered: usize,

    /// Players whose inbox did not accept the message
    pub failed: Vec<(String, DeliveryFailure)>,
}

impl BroadcastReport {
    /// Whether every registered player received the message.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Central registry of connected players.
///
/// The `Registry` owns the ordered sequence of player entries and the lock
/// guarding it. Reads share the lock; `add`, `remove` and `remove_at` take
/// it exclusively. Broadcasts only hold it long enough to snapshot the
/// member inboxes, so a slow consumer can never stall the registry.
///
/// # Architecture
///
/// * Uses `RwLock<Vec>` so insertion order is preserved
/// * Keeps only the sending half of every inbox
/// * Bounds each broadcast delivery with the configured timeout
pub struct Registry {
    /// Registered players in insertion order
    players: RwLock<Vec<PlayerEntry>>,

    config: RegistryConfig,

    /// Receives inboxes created by the string API
    inbox_handler: Arc<dyn InboxHandler>,
}

impl Registry {
    /// Creates an empty registry that logs messages received by players
    /// added through [`Registry::add_player`].
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_inbox_handler(config, LoggingInboxHandler)
    }

    /// Creates an empty registry with a custom handler for the inboxes of
    /// players added through [`Registry::add_player`].
    pub fn with_inbox_handler(config: RegistryConfig, handler: impl InboxHandler) -> Self {
        Self {
            players: RwLock::new(Vec::new()),
            config,
            inbox_handler: Arc::new(handler),
        }
    }

    /// The configuration this registry was created with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Decodes a JSON player record and registers it.
    ///
    /// The new player's inbox is handed to the registry's [`InboxHandler`].
    ///
    /// # Errors
    ///
    /// * [`RegistryError::Decode`] if `params` is not a valid player record
    /// * [`RegistryError::Duplicate`] if the name is taken and duplicates are rejected
    pub async fn add_player(&self, params: &str) -> Result<(), RegistryError> {
        let info: PlayerInfo = serde_json::from_str(params)?;
        let inbox = self.join(info).await?;
        self.inbox_handler.attach(inbox);
        Ok(())
    }

    /// Registers a player and returns its inbox to the caller.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Duplicate`] if the name is taken and duplicates are rejected.
    pub async fn join(&self, info: PlayerInfo) -> Result<Inbox, RegistryError> {
        let session_id: SessionId = Uuid::new_v4();
        let (mailbox, inbox) = inbox::channel(&info.name, session_id, self.config.inbox_capacity);

        let mut players = self.players.write().await;
        if self.config.reject_duplicate_names && players.iter().any(|p| p.info.name == info.name) {
            return Err(RegistryError::Duplicate(info.name));
        }

        info!("🔗 Player {} joined (session {})", info.name, session_id);
        players.push(PlayerEntry::new(info, session_id, mailbox));
        Ok(inbox)
    }

    /// Removes the first player with the given name.
    ///
    /// The remaining players keep their relative order. Dropping the entry
    /// closes the player's inbox once its queued messages are drained.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if no player has that name.
    pub async fn remove_player(&self, name: &str) -> Result<(), RegistryError> {
        let mut players = self.players.write().await;
        let index = players
            .iter()
            .position(|p| p.info.name == name)
            .ok_or(RegistryError::NotFound)?;
        let entry = players.remove(index);
        log_departure(&entry);
        Ok(())
    }

    /// Serializes every registered player as a JSON array, in insertion order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Empty`] if no player is registered.
    pub async fn list_players(&self) -> Result<String, RegistryError> {
        let players = self.players.read().await;
        if players.is_empty() {
            return Err(RegistryError::Empty(EmptyOperation::List));
        }
        let infos: Vec<&PlayerInfo> = players.iter().map(|p| &p.info).collect();
        serde_json::to_string(&infos).map_err(RegistryError::Encode)
    }

    /// Decodes a JSON message and delivers it to every registered player.
    ///
    /// # Errors
    ///
    /// * [`RegistryError::Decode`] if `params` is not a valid message
    /// * [`RegistryError::Empty`] if no player is registered
    pub async fn broadcast(&self, params: &str) -> Result<BroadcastReport, RegistryError> {
        let message: Message = serde_json::from_str(params)?;
        self.deliver(message).await
    }

    /// Delivers a message to every registered player.
    ///
    /// Membership is snapshotted under the read lock and the lock is
    /// released before any inbox is written. Each delivery waits at most the
    /// configured timeout; players that cannot be reached are reported in
    /// the returned [`BroadcastReport`] while the others still get the
    /// message.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Empty`] if no player is registered.
    pub async fn deliver(&self, message: Message) -> Result<BroadcastReport, RegistryError> {
        let recipients: Vec<(String, mpsc::Sender<Arc<Message>>)> = {
            let players = self.players.read().await;
            players
                .iter()
                .map(|p| (p.info.name.clone(), p.mailbox.clone()))
                .collect()
        };

        if recipients.is_empty() {
            return Err(RegistryError::Empty(EmptyOperation::Broadcast));
        }

        let message = Arc::new(message);
        let timeout = self.config.delivery_timeout();
        let outcomes = join_all(recipients.into_iter().map(|(name, mailbox)| {
            let message = Arc::clone(&message);
            async move {
                let outcome = match mailbox.send_timeout(message, timeout).await {
                    Ok(()) => Ok(()),
                    Err(SendTimeoutError::Timeout(_)) => Err(DeliveryFailure::Timeout),
                    Err(SendTimeoutError::Closed(_)) => Err(DeliveryFailure::Closed),
                };
                (name, outcome)
            }
        }))
        .await;

        let mut report = BroadcastReport::default();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(()) => report.delivered += 1,
                Err(failure) => {
                    warn!("⚠️ Failed to deliver message to {}: {}", name, failure);
                    report.failed.push((name, failure));
                }
            }
        }

        debug!(
            "📡 Broadcast from {} delivered to {} players ({} failed)",
            message.from,
            report.delivered,
            report.failed.len()
        );
        Ok(report)
    }

    /// Number of registered players.
    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }

    /// Whether no player is registered.
    pub async fn is_empty(&self) -> bool {
        self.players.read().await.is_empty()
    }

    /// Finds the first player with the given name.
    pub async fn find(&self, name: &str) -> Option<PlayerInfo> {
        let players = self.players.read().await;
        players
            .iter()
            .find(|p| p.info.name == name)
            .map(|p| p.info.clone())
    }

    /// Returns the player at `index` in insertion order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::IndexOutOfRange`] if `index` is past the end.
    pub async fn get(&self, index: usize) -> Result<PlayerInfo, RegistryError> {
        let players = self.players.read().await;
        players
            .get(index)
            .map(|p| p.info.clone())
            .ok_or(RegistryError::IndexOutOfRange {
                index,
                len: players.len(),
            })
    }

    /// Removes and returns the player at `index`.
    ///
    /// Exactly that element is removed; all others keep their relative order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::IndexOutOfRange`] if `index` is past the end.
    pub async fn remove_at(&self, index: usize) -> Result<PlayerInfo, RegistryError> {
        let mut players = self.players.write().await;
        if index >= players.len() {
            return Err(RegistryError::IndexOutOfRange {
                index,
                len: players.len(),
            });
        }
        let entry = players.remove(index);
        log_departure(&entry);
        Ok(entry.info)
    }

    /// Snapshot of all registered players in insertion order.
    pub async fn players(&self) -> Vec<PlayerInfo> {
        let players = self.players.read().await;
        players.iter().map(|p| p.info.clone()).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn log_departure(entry: &PlayerEntry) {
    let online = entry.joined_at.elapsed().unwrap_or_default();
    info!(
        "❌ Player {} left (session {}, online {:.1}s)",
        entry.info.name,
        entry.session_id,
        online.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn registry() -> Registry {
        Registry::with_inbox_handler(RegistryConfig::default(), |_inbox: Inbox| {})
    }

    async fn names(registry: &Registry) -> Vec<String> {
        registry.players().await.into_iter().map(|p| p.name).collect()
    }

    #[tokio::test]
    async fn test_add_then_list_preserves_insertion_order() {
        let registry = registry();
        for name in ["Alice", "Bob", "Carol"] {
            registry
                .add_player(&format!(r#"{{"name":"{name}","level":1}}"#))
                .await
                .unwrap();
        }

        let listed: Vec<PlayerInfo> =
            serde_json::from_str(&registry.list_players().await.unwrap()).unwrap();
        let listed: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(listed, ["Alice", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn test_add_rejects_malformed_record() {
        let registry = registry();
        let err = registry.add_player("not json").await.unwrap_err();
        assert!(matches!(err, RegistryError::Decode(_)));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_middle_keeps_survivor_order() {
        let registry = registry();
        for name in ["a", "b", "c", "d", "e"] {
            registry.join(PlayerInfo::new(name)).await.unwrap();
        }

        registry.remove_player("c").await.unwrap();
        assert_eq!(registry.len().await, 4);
        assert_eq!(names(&registry).await, ["a", "b", "d", "e"]);

        registry.remove_player("a").await.unwrap();
        registry.remove_player("e").await.unwrap();
        assert_eq!(names(&registry).await, ["b", "d"]);
    }

    #[tokio::test]
    async fn test_remove_absent_leaves_registry_unchanged() {
        let registry = registry();
        registry.join(PlayerInfo::new("Alice")).await.unwrap();

        let err = registry.remove_player("Mallory").await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound));
        assert_eq!(names(&registry).await, ["Alice"]);
    }

    #[tokio::test]
    async fn test_empty_registry_list_and_broadcast() {
        let registry = registry();
        assert!(matches!(
            registry.list_players().await,
            Err(RegistryError::Empty(EmptyOperation::List))
        ));
        assert!(matches!(
            registry.deliver(Message::new("A", "B", "hi")).await,
            Err(RegistryError::Empty(EmptyOperation::Broadcast))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_rejects_malformed_message_before_checking_members() {
        let registry = registry();
        let err = registry.broadcast(r#"{"from":"A"}"#).await.unwrap_err();
        assert!(matches!(err, RegistryError::Decode(_)));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_inbox_once() {
        let registry = registry();
        let mut inboxes = Vec::new();
        for name in ["a", "b", "c"] {
            inboxes.push(registry.join(PlayerInfo::new(name)).await.unwrap());
        }

        let report = registry
            .broadcast(r#"{"from":"a","to":"","content":"hello"}"#)
            .await
            .unwrap();
        assert_eq!(report.delivered, 3);
        assert!(report.is_complete());

        for inbox in &mut inboxes {
            let message = inbox.try_recv().expect("message delivered");
            assert_eq!(message.content, "hello");
            assert!(inbox.try_recv().is_none());
        }
    }

    #[tokio::test]
    async fn test_duplicate_policy() {
        let registry = registry();
        registry.join(PlayerInfo::new("Alice")).await.unwrap();
        let err = registry.join(PlayerInfo::new("Alice")).await.unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(ref name) if name == "Alice"));
        assert_eq!(registry.len().await, 1);

        let permissive = Registry::with_inbox_handler(
            RegistryConfig {
                reject_duplicate_names: false,
                ..Default::default()
            },
            |_inbox: Inbox| {},
        );
        permissive.join(PlayerInfo::new("Alice")).await.unwrap();
        permissive.join(PlayerInfo::new("Alice")).await.unwrap();
        assert_eq!(permissive.len().await, 2);

        // Only the first match is removed.
        permissive.remove_player("Alice").await.unwrap();
        assert_eq!(permissive.len().await, 1);
    }

    #[tokio::test]
    async fn test_index_access() {
        let registry = registry();
        registry.join(PlayerInfo::new("Alice")).await.unwrap();
        registry.join(PlayerInfo::new("Bob")).await.unwrap();

        assert_eq!(registry.get(1).await.unwrap().name, "Bob");
        assert!(matches!(
            registry.get(2).await,
            Err(RegistryError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(registry.remove_at(5).await.is_err());
        assert_eq!(registry.remove_at(0).await.unwrap().name, "Alice");
        assert_eq!(names(&registry).await, ["Bob"]);
    }

    #[tokio::test]
    async fn test_full_inbox_times_out_without_blocking_others() {
        let registry = Registry::with_inbox_handler(
            RegistryConfig {
                inbox_capacity: 1,
                delivery_timeout_ms: 20,
                ..Default::default()
            },
            |_inbox: Inbox| {},
        );
        let _stalled = registry.join(PlayerInfo::new("stalled")).await.unwrap();
        let mut live = registry.join(PlayerInfo::new("live")).await.unwrap();

        let first = registry.deliver(Message::new("x", "", "one")).await.unwrap();
        assert_eq!(first.delivered, 2);
        assert_eq!(live.recv().await.unwrap().content, "one");

        let second = registry.deliver(Message::new("x", "", "two")).await.unwrap();
        assert_eq!(second.delivered, 1);
        assert_eq!(
            second.failed,
            vec![("stalled".to_string(), DeliveryFailure::Timeout)]
        );
        assert_eq!(live.recv().await.unwrap().content, "two");

        // The registry lock is free again.
        let listed = tokio::time::timeout(Duration::from_secs(1), registry.list_players()).await;
        assert!(listed.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_dropped_inbox_reports_closed() {
        let registry = registry();
        drop(registry.join(PlayerInfo::new("gone")).await.unwrap());

        let report = registry.deliver(Message::new("x", "", "hi")).await.unwrap();
        assert_eq!(report.delivered, 0);
        assert_eq!(report.failed, vec![("gone".to_string(), DeliveryFailure::Closed)]);
    }

    #[tokio::test]
    async fn test_removed_player_inbox_closes() {
        let registry = registry();
        let mut inbox = registry.join(PlayerInfo::new("Alice")).await.unwrap();
        registry.deliver(Message::new("x", "", "bye")).await.unwrap();
        registry.remove_player("Alice").await.unwrap();

        assert_eq!(inbox.recv().await.unwrap().content, "bye");
        assert!(inbox.recv().await.is_none());
    }
}

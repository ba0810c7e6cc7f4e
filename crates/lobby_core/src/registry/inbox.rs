//! Per-player inbound message queues.
//!
//! Every registered player owns a bounded queue. The registry keeps the
//! sending half and writes broadcasts into it; the receiving half is an
//! [`Inbox`] drained by the player's own consumption loop.

use super::player::SessionId;
use crate::messaging::Message;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info};

/// Receiving half of a player's message queue.
#[derive(Debug)]
pub struct Inbox {
    player: String,
    session_id: SessionId,
    receiver: mpsc::Receiver<Arc<Message>>,
}

impl Inbox {
    pub(crate) fn new(
        player: String,
        session_id: SessionId,
        receiver: mpsc::Receiver<Arc<Message>>,
    ) -> Self {
        Self {
            player,
            session_id,
            receiver,
        }
    }

    /// Name of the player this inbox belongs to.
    pub fn player(&self) -> &str {
        &self.player
    }

    /// Session id assigned to the player when it joined.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Waits for the next message.
    ///
    /// Returns `None` once the player has been removed from the registry and
    /// every queued message has been received.
    pub async fn recv(&mut self) -> Option<Arc<Message>> {
        self.receiver.recv().await
    }

    /// Takes the next message if one is already queued.
    pub fn try_recv(&mut self) -> Option<Arc<Message>> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Receives the inboxes of players registered through the string API.
///
/// `Registry::add_player` has no caller to hand the new inbox back to, so it
/// gives it to the handler installed on the registry instead.
pub trait InboxHandler: Send + Sync + 'static {
    /// Takes ownership of a freshly created inbox.
    fn attach(&self, inbox: Inbox);
}

/// Default handler that drains each inbox on its own task and logs every
/// received message.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInboxHandler;

impl InboxHandler for LoggingInboxHandler {
    fn attach(&self, mut inbox: Inbox) {
        tokio::spawn(async move {
            while let Some(message) = inbox.recv().await {
                info!(
                    "💬 {} received message from {}: {}",
                    inbox.player(),
                    message.from,
                    message.content
                );
            }
            debug!("📪 Inbox for {} closed", inbox.player());
        });
    }
}

impl<F> InboxHandler for F
where
    F: Fn(Inbox) + Send + Sync + 'static,
{
    fn attach(&self, inbox: Inbox) {
        self(inbox)
    }
}

/// Creates the sending and receiving halves of a player queue.
pub(crate) fn channel(
    player: &str,
    session_id: SessionId,
    capacity: usize,
) -> (mpsc::Sender<Arc<Message>>, Inbox) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (sender, Inbox::new(player.to_string(), session_id, receiver))
}

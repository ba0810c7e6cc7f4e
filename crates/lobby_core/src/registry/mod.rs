//! Player registry and per-player inboxes.
//!
//! This module tracks the set of connected players, their lifecycle, and the
//! inbound message queues broadcasts are delivered to.

pub mod inbox;
pub mod manager;
pub mod player;

pub use inbox::{Inbox, InboxHandler, LoggingInboxHandler};
pub use manager::{BroadcastReport, DeliveryFailure, Registry};
pub use player::{PlayerInfo, SessionId};

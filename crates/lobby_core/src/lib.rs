//! # Lobby Core - Session Registry and Message Dispatcher
//!
//! An in-process registry of connected players together with the dispatcher
//! that routes named commands to it and the inboxes broadcasts are fanned
//! out to.
//!
//! ## Architecture Overview
//!
//! ### Core Components
//!
//! * **Registry** - Ordered set of connected players, guarded by one
//!   reader/writer lock
//! * **Inbox** - Bounded per-player queue written by broadcasts and drained
//!   by the player's own consumption loop
//! * **Dispatcher** - Maps `addplayer`, `removeplayer`, `listplayer` and
//!   `broadcast` to registry operations and returns a uniform [`Response`]
//! * **IPC** - In-process request/response sessions in front of any [`Server`]
//! * **LobbyClient** - Typed calls over an IPC session
//!
//! ### Request Flow
//!
//! 1. A caller sends `(method, params)` through an [`IpcClient`] or calls
//!    [`Dispatcher::dispatch`] directly
//! 2. The dispatcher parses the method and invokes the registry
//! 3. The registry mutates or reads its player list under the lock
//! 4. The outcome is folded into a `{code, body}` envelope
//!
//! ```rust
//! # #[tokio::main]
//! # async fn main() {
//! use lobby_core::{Dispatcher, PlayerInfo, Registry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(Registry::default());
//! let dispatcher = Dispatcher::new(Arc::clone(&registry));
//!
//! let mut inbox = registry.join(PlayerInfo::new("Bob")).await.unwrap();
//! let response = dispatcher
//!     .dispatch("broadcast", r#"{"from":"Alice","to":"Bob","content":"hi"}"#)
//!     .await;
//! assert_eq!(response.code, "200");
//! assert_eq!(inbox.recv().await.unwrap().content, "hi");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Registry failures are [`RegistryError`] values. At the dispatcher
//! boundary they become response envelopes whose `code` is the error text
//! and whose `error` field carries the stable [`ErrorKind`].
//!
//! ## Thread Safety
//!
//! * Listing and lookups share the registry lock; joins and removals take it
//!   exclusively
//! * Broadcasts snapshot the member inboxes and release the lock before
//!   delivering, each delivery bounded by a timeout
//! * The dispatcher is stateless and freely cloneable

pub use client::{ClientError, LobbyClient};
pub use config::RegistryConfig;
pub use error::{EmptyOperation, ErrorKind, RegistryError};
pub use ipc::{IpcClient, IpcError, IpcServer};
pub use messaging::{Dispatcher, Message, Method, Request, Response, Server};
pub use registry::{
    BroadcastReport, DeliveryFailure, Inbox, InboxHandler, LoggingInboxHandler, PlayerInfo,
    Registry, SessionId,
};
pub use shutdown::ShutdownState;
pub use utils::{create_dispatcher, create_ipc_server};

pub mod client;
pub mod config;
pub mod error;
pub mod ipc;
pub mod messaging;
pub mod registry;
pub mod shutdown;
pub mod utils;

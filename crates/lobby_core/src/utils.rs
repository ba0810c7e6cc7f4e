//! Utility functions for assembling a lobby.
//!
//! This module provides factory functions that wire a registry, its
//! dispatcher, and the IPC server in front of it.

use crate::{config::RegistryConfig, ipc::IpcServer, messaging::Dispatcher, registry::Registry};
use std::sync::Arc;

/// Creates a dispatcher over a fresh registry with the given configuration.
///
/// # Example
///
/// ```rust
/// # #[tokio::main]
/// # async fn main() {
/// use lobby_core::{create_dispatcher, RegistryConfig};
///
/// let dispatcher = create_dispatcher(RegistryConfig::default());
/// let response = dispatcher.dispatch("ping", "x").await;
/// assert_eq!(response.code, "404");
/// # }
/// ```
pub fn create_dispatcher(config: RegistryConfig) -> Dispatcher {
    Dispatcher::new(Arc::new(Registry::new(config)))
}

/// Creates an IPC server in front of a dispatcher over the given registry.
///
/// # Example
///
/// ```rust
/// # #[tokio::main]
/// # async fn main() {
/// use lobby_core::{create_ipc_server, LobbyClient, Registry};
/// use std::sync::Arc;
///
/// let registry = Arc::new(Registry::default());
/// let client = LobbyClient::new(create_ipc_server(registry).connect());
/// assert!(client.list_players().await.is_err());
/// # }
/// ```
pub fn create_ipc_server(registry: Arc<Registry>) -> IpcServer {
    IpcServer::new(Dispatcher::new(registry))
}

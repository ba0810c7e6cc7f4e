//! Typed client for the lobby methods.
//!
//! [`LobbyClient`] encodes typed arguments into `(method, params)` requests,
//! sends them over an IPC session, and turns the response envelopes back
//! into typed results.

use crate::error::ErrorKind;
use crate::ipc::{IpcClient, IpcError};
use crate::messaging::{Message, Method, Response};
use crate::registry::PlayerInfo;

/// Errors returned by [`LobbyClient`] calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The IPC session is no longer available
    #[error(transparent)]
    Ipc(#[from] IpcError),

    /// A request could not be encoded or a response body could not be decoded
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The server answered with a non-success code
    #[error("{code}")]
    Rejected {
        /// Status token returned by the server
        code: String,
        /// Failure classification, when the server supplied one
        kind: Option<ErrorKind>,
    },
}

impl ClientError {
    /// The failure classification of a rejected request.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ClientError::Rejected { kind, .. } => *kind,
            _ => None,
        }
    }
}

/// Typed façade over an IPC session to the lobby dispatcher.
#[derive(Debug, Clone)]
pub struct LobbyClient {
    ipc: IpcClient,
}

impl LobbyClient {
    /// Wraps an IPC session.
    pub fn new(ipc: IpcClient) -> Self {
        Self { ipc }
    }

    /// Registers a player.
    pub async fn add_player(&self, player: &PlayerInfo) -> Result<(), ClientError> {
        let params = serde_json::to_string(player)?;
        self.request(Method::AddPlayer, params).await.map(drop)
    }

    /// Removes a player by name.
    pub async fn remove_player(&self, name: &str) -> Result<(), ClientError> {
        self.request(Method::RemovePlayer, name).await.map(drop)
    }

    /// Lists all registered players in insertion order.
    pub async fn list_players(&self) -> Result<Vec<PlayerInfo>, ClientError> {
        let response = self.request(Method::ListPlayer, "").await?;
        let body = response.body.unwrap_or_default();
        Ok(serde_json::from_str(&body)?)
    }

    /// Broadcasts a message to every registered player.
    pub async fn broadcast(&self, message: &Message) -> Result<(), ClientError> {
        let params = serde_json::to_string(message)?;
        self.request(Method::Broadcast, params).await.map(drop)
    }

    async fn request(
        &self,
        method: Method,
        params: impl Into<String>,
    ) -> Result<Response, ClientError> {
        let response = self.ipc.call(method.as_str(), params).await?;
        if response.is_ok() {
            Ok(response)
        } else {
            Err(ClientError::Rejected {
                code: response.code,
                kind: response.error,
            })
        }
    }
}

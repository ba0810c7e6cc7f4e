//! In-process request/response channel.
//!
//! An [`IpcServer`] wraps any [`Server`] and hands out [`IpcClient`]
//! sessions. Each session is served by its own task, so requests within a
//! session are handled in order while separate sessions run concurrently.

use crate::messaging::{Request, Response, Server};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Number of requests a session buffers before callers wait.
const SESSION_BUFFER: usize = 64;

/// Identifier of an IPC session.
pub type IpcSessionId = usize;

/// Errors surfaced to IPC callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IpcError {
    /// The session task is gone and can no longer answer requests
    #[error("IPC session {0} disconnected")]
    Disconnected(IpcSessionId),
}

/// A request travelling to the session task together with its reply slot.
struct Call {
    request: Request,
    reply: oneshot::Sender<Response>,
}

/// Serves requests from connected [`IpcClient`] sessions.
#[derive(Clone)]
pub struct IpcServer {
    server: Arc<dyn Server>,
    next_session: Arc<AtomicUsize>,
}

impl IpcServer {
    /// Creates an IPC server in front of the given request handler.
    pub fn new(server: impl Server) -> Self {
        Self::from_arc(Arc::new(server))
    }

    /// Creates an IPC server in front of a shared request handler.
    pub fn from_arc(server: Arc<dyn Server>) -> Self {
        Self {
            server,
            next_session: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Opens a new session and returns its client.
    ///
    /// The session task runs until every clone of the returned client has
    /// been dropped. Must be called from within a tokio runtime.
    pub fn connect(&self) -> IpcClient {
        let session_id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let (sender, mut receiver) = mpsc::channel::<Call>(SESSION_BUFFER);
        let server = Arc::clone(&self.server);

        tokio::spawn(async move {
            info!("🔌 IPC session {} opened on {}", session_id, server.name());
            while let Some(call) = receiver.recv().await {
                let response = server
                    .handle(&call.request.method, &call.request.params)
                    .await;
                if call.reply.send(response).is_err() {
                    debug!("IPC session {}: caller went away before the reply", session_id);
                }
            }
            info!("🔌 IPC session {} closed", session_id);
        });

        IpcClient { session_id, sender }
    }
}

impl std::fmt::Debug for IpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpcServer")
            .field("server", &self.server.name())
            .finish_non_exhaustive()
    }
}

/// Client side of an IPC session.
#[derive(Debug, Clone)]
pub struct IpcClient {
    session_id: IpcSessionId,
    sender: mpsc::Sender<Call>,
}

impl IpcClient {
    /// The session this client talks to.
    pub fn session_id(&self) -> IpcSessionId {
        self.session_id
    }

    /// Sends a request and waits for its response.
    ///
    /// # Errors
    ///
    /// [`IpcError::Disconnected`] if the session task has stopped.
    pub async fn call(
        &self,
        method: impl Into<String>,
        params: impl Into<String>,
    ) -> Result<Response, IpcError> {
        self.send(Request::new(method, params)).await
    }

    /// Sends an already built request and waits for its response.
    pub async fn send(&self, request: Request) -> Result<Response, IpcError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Call { request, reply })
            .await
            .map_err(|_| IpcError::Disconnected(self.session_id))?;
        response
            .await
            .map_err(|_| IpcError::Disconnected(self.session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl Server for Echo {
        fn name(&self) -> &str {
            "Echo"
        }

        async fn handle(&self, method: &str, params: &str) -> Response {
            Response::ok_with_body(format!("{method}/{params}"))
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let server = IpcServer::new(Echo);
        let client = server.connect();

        let response = client.call("say", "hello").await.unwrap();
        assert_eq!(response.body.as_deref(), Some("say/hello"));
    }

    #[tokio::test]
    async fn test_sessions_get_distinct_ids() {
        let server = IpcServer::new(Echo);
        let first = server.connect();
        let second = server.connect();
        assert_ne!(first.session_id(), second.session_id());
        assert_eq!(first.clone().session_id(), first.session_id());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_callers_share_a_session() {
        let client = IpcServer::new(Echo).connect();
        let calls: Vec<_> = (0..16)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move { client.call("n", i.to_string()).await })
            })
            .collect();

        for (i, call) in calls.into_iter().enumerate() {
            let response = call.await.unwrap().unwrap();
            assert_eq!(response.body, Some(format!("n/{i}")));
        }
    }
}

//! Request dispatching for lobby methods.
//!
//! This module routes decoded `(method, params)` pairs to registry
//! operations and folds every outcome into a [`Response`] envelope.

use crate::messaging::{Method, Response};
use crate::registry::Registry;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A named request handler reachable through the IPC layer.
///
/// Implementations must never fail: every error is reported through the
/// returned [`Response`].
#[async_trait]
pub trait Server: Send + Sync + 'static {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Handles one request.
    async fn handle(&self, method: &str, params: &str) -> Response;
}

/// Routes lobby methods to the player registry.
///
/// The dispatcher holds no state of its own and takes no locks; all
/// concurrency control lives in the [`Registry`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given registry.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Gets a reference to the registry requests are routed to.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Routes a request and builds its response.
    ///
    /// # Arguments
    ///
    /// * `method` - One of `addplayer`, `removeplayer`, `listplayer`, `broadcast`
    /// * `params` - Method parameters (JSON record, raw name, ignored, JSON message)
    ///
    /// # Returns
    ///
    /// `200` on success (with the player list as body for `listplayer`),
    /// `404` with `"<method>:<params>"` as body for unknown methods, or the
    /// error text as code when the registry rejects the request.
    pub async fn dispatch(&self, method: &str, params: &str) -> Response {
        let Ok(route) = method.parse::<Method>() else {
            debug!("❓ Unknown method '{}'", method);
            return Response::unknown_method(method, params);
        };

        trace!("📨 Dispatching '{}'", route);
        let result = match route {
            Method::AddPlayer => self.registry.add_player(params).await.map(|()| None),
            Method::RemovePlayer => self.registry.remove_player(params).await.map(|()| None),
            Method::ListPlayer => self.registry.list_players().await.map(Some),
            Method::Broadcast => self.registry.broadcast(params).await.map(|_report| None),
        };

        match result {
            Ok(None) => Response::ok(),
            Ok(Some(body)) => Response::ok_with_body(body),
            Err(e) => {
                warn!("🚫 '{}' rejected: {}", route, e);
                Response::from(e)
            }
        }
    }
}

#[async_trait]
impl Server for Dispatcher {
    fn name(&self) -> &str {
        "LobbyDispatcher"
    }

    async fn handle(&self, method: &str, params: &str) -> Response {
        self.dispatch(method, params).await
    }
}

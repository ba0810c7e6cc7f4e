//! Message type definitions for lobby requests and broadcasts.
//!
//! This module defines the request/response envelope exchanged with the
//! dispatcher, the fixed set of routable methods, and the broadcast message
//! fanned out to player inboxes.

use crate::error::{ErrorKind, RegistryError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status code of a successful request.
pub const STATUS_OK: &str = "200";

/// Status code of a request naming an unknown method.
pub const STATUS_UNKNOWN_METHOD: &str = "404";

/// A chat message broadcast to every registered player.
///
/// # Example
///
/// ```json
/// { "from": "Alice", "to": "Bob", "content": "hi" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sender name
    pub from: String,

    /// Intended recipient name (informational, broadcasts go to everyone)
    pub to: String,

    /// Message text
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(from: impl Into<String>, to: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            content: content.into(),
        }
    }
}

/// A decoded request: the method to invoke and its raw parameter string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Method name, e.g. `addplayer`
    pub method: String,

    /// Method parameters; their encoding depends on the method
    pub params: String,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: params.into(),
        }
    }
}

/// Uniform response envelope returned for every request.
///
/// `code` is `"200"` on success, `"404"` for unknown methods, and the text
/// of the failing error otherwise. `error` carries the stable kind of a
/// failure and is omitted from the wire when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Status token
    pub code: String,

    /// Optional payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Failure classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl Response {
    /// A successful response without payload.
    pub fn ok() -> Self {
        Self {
            code: STATUS_OK.to_string(),
            body: None,
            error: None,
        }
    }

    /// A successful response carrying a payload.
    pub fn ok_with_body(body: impl Into<String>) -> Self {
        Self {
            code: STATUS_OK.to_string(),
            body: Some(body.into()),
            error: None,
        }
    }

    /// The response for a method the dispatcher does not know.
    pub fn unknown_method(method: &str, params: &str) -> Self {
        Self {
            code: STATUS_UNKNOWN_METHOD.to_string(),
            body: Some(format!("{method}:{params}")),
            error: None,
        }
    }

    /// Whether the request succeeded.
    pub fn is_ok(&self) -> bool {
        self.code == STATUS_OK
    }
}

impl From<RegistryError> for Response {
    fn from(error: RegistryError) -> Self {
        Self {
            code: error.to_string(),
            body: None,
            error: Some(error.kind()),
        }
    }
}

/// The fixed set of methods the dispatcher routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Register a player from a JSON record
    AddPlayer,
    /// Remove a player by name
    RemovePlayer,
    /// List all registered players
    ListPlayer,
    /// Broadcast a message to every player
    Broadcast,
}

impl Method {
    /// The wire name of this method.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::AddPlayer => "addplayer",
            Method::RemovePlayer => "removeplayer",
            Method::ListPlayer => "listplayer",
            Method::Broadcast => "broadcast",
        }
    }
}

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addplayer" => Ok(Method::AddPlayer),
            "removeplayer" => Ok(Method::RemovePlayer),
            "listplayer" => Ok(Method::ListPlayer),
            "broadcast" => Ok(Method::Broadcast),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method name outside the routable set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown method: {0}")]
pub struct UnknownMethod(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        for method in [
            Method::AddPlayer,
            Method::RemovePlayer,
            Method::ListPlayer,
            Method::Broadcast,
        ] {
            assert_eq!(method.as_str().parse::<Method>(), Ok(method));
        }
        assert_eq!(
            "AddPlayer".parse::<Method>(),
            Err(UnknownMethod("AddPlayer".to_string()))
        );
    }

    #[test]
    fn test_response_wire_shape() {
        let ok = serde_json::to_string(&Response::ok()).unwrap();
        assert_eq!(ok, r#"{"code":"200"}"#);

        let failed = Response::from(RegistryError::NotFound);
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({ "code": "Player not found.", "error": "not_found" })
        );

        let decoded: Response = serde_json::from_str(r#"{"code":"404","body":"ping:x"}"#).unwrap();
        assert_eq!(decoded, Response::unknown_method("ping", "x"));
    }
}

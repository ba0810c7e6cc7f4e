//! Error types and handling for the lobby core.
//!
//! This module defines the errors the registry can produce and the stable
//! [`ErrorKind`] tag that travels alongside the legacy textual status code.

use serde::{Deserialize, Serialize};

/// Registry operation that failed because no players were registered.
///
/// The two operations report the condition with different wording, which
/// clients have historically matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyOperation {
    /// Listing the players
    List,
    /// Broadcasting a message
    Broadcast,
}

impl EmptyOperation {
    fn message(self) -> &'static str {
        match self {
            EmptyOperation::List => "No players on line",
            EmptyOperation::Broadcast => "No players found.",
        }
    }
}

/// Enumeration of possible registry errors.
///
/// The `Display` text of each variant is what the dispatcher places in the
/// response `code` field, so the wording is part of the wire contract.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The request payload could not be decoded
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    /// No player with the requested name is registered
    #[error("Player not found.")]
    NotFound,

    /// Index-based access past the end of the registry
    #[error("Player not found.")]
    IndexOutOfRange { index: usize, len: usize },

    /// The operation needs at least one registered player
    #[error("{}", .0.message())]
    Empty(EmptyOperation),

    /// A player with the same name is already registered
    #[error("Player already online.")]
    Duplicate(String),

    /// A reply payload could not be serialized
    #[error("{0}")]
    Encode(#[source] serde_json::Error),
}

impl RegistryError {
    /// Returns the stable kind tag for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::Decode(_) => ErrorKind::Decode,
            RegistryError::NotFound | RegistryError::IndexOutOfRange { .. } => ErrorKind::NotFound,
            RegistryError::Empty(_) => ErrorKind::Empty,
            RegistryError::Duplicate(_) => ErrorKind::Duplicate,
            RegistryError::Encode(_) => ErrorKind::Internal,
        }
    }
}

/// Stable, machine-readable classification of a failed request.
///
/// Transports that need numeric codes should map through [`ErrorKind::status`]
/// instead of parsing the human-readable `code` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input payload
    Decode,
    /// Target player absent
    NotFound,
    /// Operation requires at least one player
    Empty,
    /// Player name already taken
    Duplicate,
    /// The lobby failed to build its reply
    Internal,
}

impl ErrorKind {
    /// Numeric status code for this kind.
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::Decode => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Duplicate => 409,
            ErrorKind::Empty => 410,
            ErrorKind::Internal => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Decode => write!(f, "decode"),
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Empty => write!(f, "empty"),
            ErrorKind::Duplicate => write!(f, "duplicate"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_messages_differ_by_operation() {
        assert_eq!(
            RegistryError::Empty(EmptyOperation::List).to_string(),
            "No players on line"
        );
        assert_eq!(
            RegistryError::Empty(EmptyOperation::Broadcast).to_string(),
            "No players found."
        );
    }

    #[test]
    fn test_kinds_and_status_codes() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(RegistryError::from(decode).kind(), ErrorKind::Decode);
        assert_eq!(RegistryError::NotFound.kind().status(), 404);
        assert_eq!(
            RegistryError::IndexOutOfRange { index: 3, len: 1 }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(RegistryError::Duplicate("Alice".into()).kind().status(), 409);
        assert_eq!(ErrorKind::Empty.to_string(), "empty");
    }

    #[test]
    fn test_encode_failure_is_internal_not_decode() {
        // Maps with non-string keys cannot be written as JSON objects.
        let map = std::collections::BTreeMap::from([((1, 2), "pair")]);
        let encode = serde_json::to_string(&map).unwrap_err();

        let err = RegistryError::Encode(encode);
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.kind().status(), 500);
        assert_eq!(ErrorKind::Internal.to_string(), "internal");
    }
}

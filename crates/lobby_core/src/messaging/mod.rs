//! Request routing and message types.
//!
//! This module provides the request/response envelope, the broadcast message
//! type, and the dispatcher that routes method names to registry operations.

pub mod dispatcher;
pub mod types;

pub use dispatcher::{Dispatcher, Server};
pub use types::{Message, Method, Request, Response, UnknownMethod, STATUS_OK, STATUS_UNKNOWN_METHOD};

//! Error types for the clinic API client.
//!
//! # Design
//! The backend reports failures only through the status line, so a non-2xx
//! response carries nothing but the numeric status and its reason phrase. The
//! remaining variants cover the edges of the round-trip: the connection
//! itself, and converting payloads to and from the wire shapes.

use thiserror::Error;

/// Errors returned by the transport helper and the resource clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status. The body is not inspected.
    #[error("API Error: {status} {status_text}")]
    Status { status: u16, status_text: String },

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The payload could not be read as the expected wire shape.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("encode failed: {0}")]
    Encode(String),
}

impl ApiError {
    /// HTTP status of a `Status` error, `None` for every other variant.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

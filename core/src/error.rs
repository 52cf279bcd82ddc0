//! Error types for the Pass Culture API client.
//!
//! # Design
//! The transport core only knows two failure shapes: the server answered with
//! a non-2xx status (`Status`), or no answer was obtained at all (`Timeout`,
//! `Transport`). Endpoint facades run every status failure through
//! [`ApiError::classify`] so callers can match on `NotFound` or
//! `Unauthorized` directly instead of inspecting status codes.

use thiserror::Error;

/// Missing or unusable client settings. Always raised before any network I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API key is required: pass it explicitly or set API_KEY")]
    MissingApiKey,

    #[error("API endpoint is required: pass it explicitly or set API_ENDPOINT")]
    MissingApiEndpoint,

    #[error("API endpoint is not a valid absolute URL: {0}")]
    InvalidEndpoint(String),
}

/// Errors returned by the transport core and the endpoint facades.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The server returned a non-2xx status. Produced by the transport core.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The server returned 404.
    #[error("resource not found: {body}")]
    NotFound { body: String },

    /// The server rejected the credentials (401 or 403).
    #[error("authentication failed (HTTP {status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// The server returned 429.
    #[error("rate limit exceeded: {body}")]
    RateLimited { body: String },

    /// No response arrived within the configured timeout.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// No response was obtained (DNS, refused connection, broken stream...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected typed shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A caller-supplied value cannot be placed in a request.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// Map a raw `Status` error to the specific kind its code implies.
    /// Every other variant passes through untouched.
    pub fn classify(self) -> Self {
        match self {
            ApiError::Status { status: 404, body } => ApiError::NotFound { body },
            ApiError::Status {
                status: status @ (401 | 403),
                body,
            } => ApiError::Unauthorized { status, body },
            ApiError::Status { status: 429, body } => ApiError::RateLimited { body },
            other => other,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::Unauthorized { status, .. } => {
                Some(*status)
            }
            ApiError::NotFound { .. } => Some(404),
            ApiError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Raw response body carried by the error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. }
            | ApiError::NotFound { body }
            | ApiError::Unauthorized { body, .. }
            | ApiError::RateLimited { body } => Some(body),
            _ => None,
        }
    }

    /// True when no response was obtained from the server.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Timeout(_) | ApiError::Transport(_))
    }
}

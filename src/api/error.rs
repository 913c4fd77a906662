//! Error taxonomy for calls against the remote API.

use thiserror::Error;

/// Fallback shown when the server gave no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "something went wrong";

/// Errors surfaced by the remote Bookworm API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure before any HTTP status was obtained.
    #[error("request to '{endpoint}' failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("failed to decode '{endpoint}' response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// An authenticated endpoint was called without a signed-in session.
    #[error("not signed in")]
    NotAuthenticated,
}

impl ApiError {
    /// Message suitable for direct display: the server-provided one
    /// when there is one, otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api { message, .. } => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while talking to the authentication backend.
///
/// A missing session is not an error; backends report it as `None`.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request never got a response (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The backend answered with a body that could not be decoded.
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),

    /// The session could not be encoded into cookies.
    #[error("session encoding error: {0}")]
    Encoding(String),

    /// Backend configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AuthError::InvalidResponse(e.to_string())
        } else {
            AuthError::Transport(e.to_string())
        }
    }
}

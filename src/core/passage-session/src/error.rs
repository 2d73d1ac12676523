//! Session provider error types.

use passage_auth::AuthError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by the environment-driven entry points.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Required configuration is missing or invalid. Not recoverable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The authentication backend call failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

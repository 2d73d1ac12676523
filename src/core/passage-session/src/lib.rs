//! # Passage Session
//!
//! Session context provider: hands out authentication-aware clients whose
//! cookie access matches the context they run in.
//!
//! ## Contexts
//!
//! - [`create_client_browser`] - interactive client owning its cookie jar
//! - [`create_client_server`] - server read path, cookies are read-only
//! - [`create_client_route`] - request handler, reads the request and writes the response
//!
//! The free functions load [`ClientConfig`] from the environment on every
//! call. Hosts that load it once at startup use [`SessionProvider`] instead.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod provider;

pub use client::{Auth, SessionClient};
pub use config::{ClientConfig, ConfigError, SERVICE_PUBLIC_KEY_VAR, SERVICE_URL_VAR};
pub use error::SessionError;
pub use provider::SessionProvider;

use passage_auth::User;
use passage_cookies::{CookieJar, ReadOnlyCookies, ResponseCookies};

/// Creates a browser-context client over the process-wide cookie jar.
///
/// # Errors
///
/// Returns [`SessionError::Config`] if the configuration is missing.
pub fn create_client_browser() -> Result<SessionClient, SessionError> {
    Ok(SessionProvider::from_env()?.create_client_browser())
}

/// Creates a read-only client over the current request's cookies.
pub fn create_client_server(cookies: ReadOnlyCookies) -> Result<SessionClient, SessionError> {
    Ok(SessionProvider::from_env()?.create_client_server(cookies))
}

/// Creates a read-write client for a request handler.
pub fn create_client_route(
    request: CookieJar,
    response: &ResponseCookies,
) -> Result<SessionClient, SessionError> {
    Ok(SessionProvider::from_env()?.create_client_route(request, response))
}

/// Returns the user of the browser session, or `None` if there is no session.
pub async fn get_current_user() -> Result<Option<User>, SessionError> {
    Ok(SessionProvider::from_env()?.get_current_user().await?)
}

/// Returns true if the browser jar holds a session.
pub async fn is_authenticated() -> Result<bool, SessionError> {
    Ok(SessionProvider::from_env()?.is_authenticated().await?)
}

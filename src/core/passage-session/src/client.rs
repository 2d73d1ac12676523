//! Session client handle.

use std::fmt;
use std::sync::Arc;

use passage_auth::{AuthBackend, AuthError, Session, User};
use passage_cookies::{CookieAccess, ExecutionContext};

use crate::ClientConfig;

/// Authentication-aware client bound to one cookie access policy.
///
/// Built fresh for every use; it holds no state of its own besides the
/// policy it was built with.
pub struct SessionClient {
    config: ClientConfig,
    backend: Arc<dyn AuthBackend>,
    cookies: CookieAccess,
}

impl SessionClient {
    /// Creates a client.
    pub fn new(
        config: ClientConfig,
        backend: Arc<dyn AuthBackend>,
        cookies: impl Into<CookieAccess>,
    ) -> Self {
        Self {
            config,
            backend,
            cookies: cookies.into(),
        }
    }

    /// Execution context of the cookie policy.
    pub fn context(&self) -> ExecutionContext {
        self.cookies.context()
    }

    /// Connection configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Cookie access the client reads and writes through.
    pub fn cookies(&self) -> &CookieAccess {
        &self.cookies
    }

    /// Authentication queries.
    pub fn auth(&self) -> Auth<'_> {
        Auth {
            backend: self.backend.as_ref(),
            cookies: &self.cookies,
        }
    }
}

impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient")
            .field("service_url", &self.config.service_url().as_str())
            .field("backend", &self.backend.name())
            .field("context", &self.context())
            .finish()
    }
}

/// Authentication queries issued with a client's cookies.
///
/// Errors from the backend are returned as-is.
pub struct Auth<'a> {
    backend: &'a dyn AuthBackend,
    cookies: &'a CookieAccess,
}

impl Auth<'_> {
    /// Returns the user of the current session.
    pub async fn get_user(&self) -> Result<Option<User>, AuthError> {
        self.backend.get_user(self.cookies).await
    }

    /// Returns the current session.
    pub async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        self.backend.get_session(self.cookies).await
    }

    /// Ends the current session.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.backend.sign_out(self.cookies).await
    }
}

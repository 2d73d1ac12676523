//! Session context provider.

use std::sync::Arc;

use passage_auth::{AuthBackend, AuthError, RestAuthBackend, User};
use passage_cookies::{
    BrowserCookies, CookieAccess, CookieJar, ReadOnlyCookies, ResponseCookies, RouteCookies,
};
use tracing::debug;

use crate::{ClientConfig, ConfigError, SessionClient, SessionError};

/// Builds session clients for each execution context.
///
/// The provider holds only what is shared by every client: the connection
/// configuration, the auth backend and the browser jar. Each `create_client_*`
/// call returns a new client.
pub struct SessionProvider {
    config: ClientConfig,
    backend: Arc<dyn AuthBackend>,
    browser: BrowserCookies,
}

impl SessionProvider {
    /// Creates a provider talking to the REST auth backend of `config`.
    pub fn new(config: ClientConfig) -> Result<Self, AuthError> {
        let backend = RestAuthBackend::new(config.rest_auth_config())?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Creates a provider over an arbitrary backend.
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            config,
            backend,
            browser: BrowserCookies::shared(),
        }
    }

    /// Creates a provider from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if the configuration is missing or
    /// invalid, or if the auth backend cannot be built from it.
    pub fn from_env() -> Result<Self, SessionError> {
        let config = ClientConfig::from_env()?;
        Self::new(config).map_err(startup_error)
    }

    /// Replaces the process-wide browser jar with `browser`.
    pub fn with_browser_cookies(mut self, browser: BrowserCookies) -> Self {
        self.browser = browser;
        self
    }

    /// Connection configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Browser jar used by [`Self::create_client_browser`].
    pub fn browser_cookies(&self) -> &BrowserCookies {
        &self.browser
    }

    /// Creates a client with full access to the browser jar.
    pub fn create_client_browser(&self) -> SessionClient {
        self.client(self.browser.clone())
    }

    /// Creates a client that reads the request cookies and never writes.
    pub fn create_client_server(&self, cookies: ReadOnlyCookies) -> SessionClient {
        self.client(cookies)
    }

    /// Creates a client that reads `request` and writes to `response`.
    pub fn create_client_route(
        &self,
        request: CookieJar,
        response: &ResponseCookies,
    ) -> SessionClient {
        self.client(RouteCookies::new(request, response.clone()))
    }

    /// Returns the user of the browser session, if any.
    pub async fn get_current_user(&self) -> Result<Option<User>, AuthError> {
        let client = self.create_client_browser();
        client.auth().get_user().await
    }

    /// Returns true if the browser jar holds a session.
    pub async fn is_authenticated(&self) -> Result<bool, AuthError> {
        let client = self.create_client_browser();
        let session = client.auth().get_session().await?;
        Ok(session.is_some())
    }

    fn client(&self, cookies: impl Into<CookieAccess>) -> SessionClient {
        let client = SessionClient::new(self.config.clone(), self.backend.clone(), cookies);
        debug!(context = %client.context(), backend = self.backend.name(), "Session client created");
        client
    }
}

/// Backend construction only fails on local misconfiguration.
fn startup_error(err: AuthError) -> SessionError {
    SessionError::Config(ConfigError::Backend(err.to_string()))
}

//! Authentication backend trait.

use async_trait::async_trait;
use passage_cookies::CookieStore;

use crate::{AuthError, Session, User};

/// Trait for authentication backends.
///
/// Every call receives the cookie store of the client issuing it. Backends
/// read the session from it and write refreshed or cleared sessions back
/// through it; whether those writes take effect is up to the store.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Returns the current session, refreshing it if it is about to expire.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Session))` - A usable session is present
    /// * `Ok(None)` - No session, or the backend no longer accepts it
    /// * `Err(AuthError)` - The backend call itself failed
    async fn get_session(&self, cookies: &dyn CookieStore) -> Result<Option<Session>, AuthError>;

    /// Returns the user the current session belongs to, as reported by the backend.
    async fn get_user(&self, cookies: &dyn CookieStore) -> Result<Option<User>, AuthError>;

    /// Ends the current session and removes its cookies.
    async fn sign_out(&self, cookies: &dyn CookieStore) -> Result<(), AuthError>;

    /// Returns the name of this backend for logging/debugging.
    fn name(&self) -> &'static str;
}

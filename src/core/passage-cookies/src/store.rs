//! Cookie store capability trait.

use std::fmt;

use crate::CookieOptions;

/// Where a session client is running.
///
/// The context decides which cookie mutations are allowed to take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionContext {
    /// Long-lived interactive client owning its cookie jar.
    Browser,
    /// Server-side read path that cannot emit response headers.
    ReadOnlyServer,
    /// Request handler with access to both the request and the response.
    ReadWriteHandler,
}

impl ExecutionContext {
    /// Returns true if cookie mutations take effect in this context.
    pub fn can_write(self) -> bool {
        !matches!(self, Self::ReadOnlyServer)
    }

    /// Stable lowercase name, used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::ReadOnlyServer => "read-only-server",
            Self::ReadWriteHandler => "read-write-handler",
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability set over a credential store.
///
/// All three operations are infallible. Implementations that cannot mutate
/// the underlying store must turn `set` and `remove` into silent no-ops so
/// that callers unaware of the context keep working.
pub trait CookieStore: Send + Sync {
    /// Returns the value of the named cookie, if present.
    fn get(&self, name: &str) -> Option<String>;

    /// Stores a cookie with the given options.
    ///
    /// `value` must not contain control characters (other than tab). A
    /// response cannot carry such a value in a `Set-Cookie` header, so the
    /// read-write store drops it with a warning when the response is built.
    fn set(&self, name: &str, value: &str, options: &CookieOptions);

    /// Removes a cookie. `options` should carry the same domain and path the
    /// cookie was set with.
    fn remove(&self, name: &str, options: &CookieOptions);
}

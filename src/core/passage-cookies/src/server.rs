//! Read-only cookie store for server-side read paths.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use tracing::trace;

use crate::{CookieOptions, CookieStore};

/// Cookie store over the current request's cookies that never mutates.
///
/// Acquired from the request with the [`FromRequestParts`] extractor, or built
/// directly from a [`CookieJar`] or header map.
#[derive(Debug, Clone, Default)]
pub struct ReadOnlyCookies {
    jar: CookieJar,
}

impl ReadOnlyCookies {
    /// Wraps an already extracted request jar.
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    /// Reads the `Cookie` headers of a request.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::new(CookieJar::from_headers(headers))
    }
}

impl From<CookieJar> for ReadOnlyCookies {
    fn from(jar: CookieJar) -> Self {
        Self::new(jar)
    }
}

impl CookieStore for ReadOnlyCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.jar.get(name).map(|c| c.value().to_owned())
    }

    fn set(&self, name: &str, _value: &str, _options: &CookieOptions) {
        trace!(cookie = %name, "Ignoring cookie set in read-only context");
    }

    fn remove(&self, name: &str, _options: &CookieOptions) {
        trace!(cookie = %name, "Ignoring cookie removal in read-only context");
    }
}

impl<S> FromRequestParts<S> for ReadOnlyCookies
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

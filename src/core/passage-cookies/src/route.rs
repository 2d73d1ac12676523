//! Read-write cookie store for request handlers.
//!
//! Reads come from the inbound request; writes land on a [`ResponseCookies`]
//! value that the handler returns as part of its response.

use std::convert::Infallible;
use std::sync::Arc;

use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::cookie::CookieJar;
use cookie::Cookie;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{CookieOptions, CookieStore};

/// Outbound cookies of a response under construction.
///
/// Cloning yields another handle to the same set, so a session client and the
/// handler that returns the response observe the same writes. Writing the
/// same name twice keeps the last write.
#[derive(Debug, Clone, Default)]
pub struct ResponseCookies {
    jar: Arc<Mutex<cookie::CookieJar>>,
}

impl ResponseCookies {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cookie queued for `name`, if any.
    pub fn get(&self, name: &str) -> Option<Cookie<'static>> {
        self.jar.lock().get(name).cloned()
    }

    /// Queues a cookie, replacing any earlier one with the same name.
    pub fn add(&self, cookie: Cookie<'static>) {
        self.jar.lock().add(cookie);
    }

    /// Returns true if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.jar.lock().delta().next().is_none()
    }

    /// Renders every queued cookie as a `Set-Cookie` header value, sorted by name.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        let jar = self.jar.lock();
        let mut cookies: Vec<&Cookie<'static>> = jar.delta().collect();
        cookies.sort_by(|a, b| a.name().cmp(b.name()));
        cookies.iter().map(|c| c.to_string()).collect()
    }
}

impl IntoResponseParts for ResponseCookies {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        for value in self.set_cookie_headers() {
            match HeaderValue::from_bytes(value.as_bytes()) {
                Ok(header) => {
                    res.headers_mut().append(SET_COOKIE, header);
                },
                Err(e) => warn!(error = %e, "Dropping cookie with invalid header value"),
            }
        }
        Ok(res)
    }
}

/// Cookie store for request handlers: reads the request, writes the response.
#[derive(Debug, Clone)]
pub struct RouteCookies {
    request: CookieJar,
    response: ResponseCookies,
}

impl RouteCookies {
    /// Binds the inbound request jar to the outbound response cookies.
    pub fn new(request: CookieJar, response: ResponseCookies) -> Self {
        Self { request, response }
    }

    /// Returns the outbound response cookies.
    pub fn response(&self) -> &ResponseCookies {
        &self.response
    }
}

impl CookieStore for RouteCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.request.get(name).map(|c| c.value().to_owned())
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) {
        debug!(cookie = %name, "Response cookie set");
        self.response.add(options.build_cookie(name, value));
    }

    fn remove(&self, name: &str, options: &CookieOptions) {
        debug!(cookie = %name, "Response cookie removed");
        self.response.add(options.expired().build_cookie(name, ""));
    }
}

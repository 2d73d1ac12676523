//! Browser-side cookie store.
//!
//! Backs the browser context with an in-process cookie jar that lives as long
//! as the client. The jar returned by [`BrowserCookies::shared`] is the
//! process-wide equivalent of a browser's native cookie store.

use std::sync::Arc;

use cookie::{Cookie, CookieJar};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::{CookieOptions, CookieStore};

static SHARED: Lazy<BrowserCookies> = Lazy::new(BrowserCookies::new);

/// Cookie store with full get/set/remove semantics.
///
/// Cloning yields another handle to the same jar.
#[derive(Debug, Clone, Default)]
pub struct BrowserCookies {
    jar: Arc<RwLock<CookieJar>>,
}

impl BrowserCookies {
    /// Creates an empty, isolated jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the process-wide jar.
    pub fn shared() -> Self {
        SHARED.clone()
    }

    /// Creates a jar seeded from a `Cookie` request header value
    /// (`name=value; other=value`). Malformed pairs are skipped.
    pub fn from_cookie_header(header: &str) -> Self {
        let cookies = Self::new();
        cookies.load_cookie_header(header);
        cookies
    }

    /// Adds every pair of a `Cookie` header value to the jar, replacing
    /// existing entries with the same name.
    pub fn load_cookie_header(&self, header: &str) {
        let mut jar = self.jar.write();
        for cookie in Cookie::split_parse(header.to_owned()).flatten() {
            jar.add(cookie);
        }
    }

    /// Renders the jar as a `Cookie` header value, sorted by name.
    pub fn cookie_header(&self) -> String {
        let jar = self.jar.read();
        let mut pairs: Vec<String> = jar
            .iter()
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect();
        pairs.sort();
        pairs.join("; ")
    }

    /// Returns the names of all live cookies, sorted.
    pub fn names(&self) -> Vec<String> {
        let jar = self.jar.read();
        let mut names: Vec<String> = jar.iter().map(|c| c.name().to_owned()).collect();
        names.sort();
        names
    }

    /// Drops every cookie.
    pub fn clear(&self) {
        *self.jar.write() = CookieJar::new();
    }
}

impl CookieStore for BrowserCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.jar.read().get(name).map(|c| c.value().to_owned())
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) {
        if options.deletes() {
            self.remove(name, options);
            return;
        }

        debug!(cookie = %name, "Browser cookie set");
        self.jar.write().add(options.build_cookie(name, value));
    }

    fn remove(&self, name: &str, _options: &CookieOptions) {
        debug!(cookie = %name, "Browser cookie removed");
        self.jar
            .write()
            .remove(Cookie::new(name.to_owned(), String::new()));
    }
}

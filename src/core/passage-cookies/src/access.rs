//! Context-selected cookie access.

use crate::{
    BrowserCookies, CookieOptions, CookieStore, ExecutionContext, ReadOnlyCookies, RouteCookies,
};

/// One of the three cookie access policies, chosen once when a client is built.
#[derive(Debug, Clone)]
pub enum CookieAccess {
    /// Full access to a client-owned jar.
    Browser(BrowserCookies),
    /// Request cookies, mutations ignored.
    ReadOnly(ReadOnlyCookies),
    /// Request cookies for reads, response cookies for writes.
    ReadWrite(RouteCookies),
}

impl CookieAccess {
    /// Returns the execution context this policy belongs to.
    pub fn context(&self) -> ExecutionContext {
        match self {
            Self::Browser(_) => ExecutionContext::Browser,
            Self::ReadOnly(_) => ExecutionContext::ReadOnlyServer,
            Self::ReadWrite(_) => ExecutionContext::ReadWriteHandler,
        }
    }

    fn store(&self) -> &dyn CookieStore {
        match self {
            Self::Browser(cookies) => cookies,
            Self::ReadOnly(cookies) => cookies,
            Self::ReadWrite(cookies) => cookies,
        }
    }
}

impl CookieStore for CookieAccess {
    fn get(&self, name: &str) -> Option<String> {
        self.store().get(name)
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) {
        self.store().set(name, value, options)
    }

    fn remove(&self, name: &str, options: &CookieOptions) {
        self.store().remove(name, options)
    }
}

impl From<BrowserCookies> for CookieAccess {
    fn from(cookies: BrowserCookies) -> Self {
        Self::Browser(cookies)
    }
}

impl From<ReadOnlyCookies> for CookieAccess {
    fn from(cookies: ReadOnlyCookies) -> Self {
        Self::ReadOnly(cookies)
    }
}

impl From<RouteCookies> for CookieAccess {
    fn from(cookies: RouteCookies) -> Self {
        Self::ReadWrite(cookies)
    }
}

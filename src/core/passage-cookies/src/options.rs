//! Cookie attribute options.

use cookie::{time::Duration, Cookie, SameSite};

/// Attributes attached to a cookie when it is written.
///
/// Every field is optional; unset fields are left off the `Set-Cookie` line.
/// Values are passed through without interpretation, except `max_age`: a
/// value of zero (or below) means "delete now".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    /// Seconds until expiry.
    pub max_age: Option<i64>,
    /// Cookie domain.
    pub domain: Option<String>,
    /// Cookie path.
    pub path: Option<String>,
    /// `Secure` flag.
    pub secure: Option<bool>,
    /// `HttpOnly` flag.
    pub http_only: Option<bool>,
    /// `SameSite` policy.
    pub same_site: Option<SameSite>,
}

impl CookieOptions {
    /// Sets `max_age` in seconds.
    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Sets the cookie path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the cookie domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the `Secure` flag.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Sets the `HttpOnly` flag.
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    /// Sets the `SameSite` policy.
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Returns a copy of `self` with every field set in `overlay` replaced.
    pub fn merge(&self, overlay: &CookieOptions) -> CookieOptions {
        CookieOptions {
            max_age: overlay.max_age.or(self.max_age),
            domain: overlay.domain.clone().or_else(|| self.domain.clone()),
            path: overlay.path.clone().or_else(|| self.path.clone()),
            secure: overlay.secure.or(self.secure),
            http_only: overlay.http_only.or(self.http_only),
            same_site: overlay.same_site.or(self.same_site),
        }
    }

    /// Returns a copy of `self` that expires immediately.
    pub fn expired(&self) -> CookieOptions {
        self.merge(&CookieOptions::default().with_max_age(0))
    }

    /// Returns true if a cookie written with these options is deleted on arrival.
    pub fn deletes(&self) -> bool {
        matches!(self.max_age, Some(age) if age <= 0)
    }

    /// Builds a cookie carrying these attributes.
    pub fn build_cookie(&self, name: &str, value: &str) -> Cookie<'static> {
        let mut cookie = Cookie::new(name.to_owned(), value.to_owned());

        if let Some(max_age) = self.max_age {
            cookie.set_max_age(Duration::seconds(max_age.max(0)));
        }
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        if let Some(path) = &self.path {
            cookie.set_path(path.clone());
        }
        cookie.set_secure(self.secure);
        cookie.set_http_only(self.http_only);
        cookie.set_same_site(self.same_site);

        cookie
    }
}

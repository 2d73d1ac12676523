//! Session cookie codec.
//!
//! The session is stored as JSON, base64url-encoded behind a `base64-` prefix,
//! under `sb-<project-ref>-auth-token`. Values too large for one cookie are
//! split into `<key>.0`, `<key>.1`, ... chunks.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use passage_cookies::{CookieOptions, CookieStore, SameSite};
use reqwest::Url;
use tracing::{debug, warn};

use crate::{AuthError, Session};

/// Largest value written to a single cookie.
pub const MAX_CHUNK_SIZE: usize = 3180;

/// Prefix marking a base64url-encoded value.
pub const BASE64_PREFIX: &str = "base64-";

/// Default lifetime of session cookies (400 days).
pub const DEFAULT_MAX_AGE: i64 = 400 * 24 * 60 * 60;

/// Derives the session cookie name from the service URL.
///
/// The project ref is the first `.`-separated label of the host, IP hosts
/// included (`127.0.0.1` gives `127`). Characters outside `[A-Za-z0-9]` become
/// `-` and outer dashes are trimmed, keeping the name a valid cookie token.
pub fn storage_key(service_url: &Url) -> String {
    let host = service_url.host_str().unwrap_or_default();
    let project_ref: String = host
        .split('.')
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("sb-{}-auth-token", project_ref.trim_matches('-'))
}

/// Default attributes of session cookies.
pub fn default_cookie_options() -> CookieOptions {
    CookieOptions::default()
        .with_path("/")
        .with_same_site(SameSite::Lax)
        .with_http_only(false)
        .with_max_age(DEFAULT_MAX_AGE)
}

/// Encodes a session as a cookie value.
pub fn encode_session(session: &Session) -> Result<String, AuthError> {
    let json = serde_json::to_string(session).map_err(|e| AuthError::Encoding(e.to_string()))?;
    Ok(format!("{BASE64_PREFIX}{}", URL_SAFE_NO_PAD.encode(json)))
}

/// Decodes a cookie value into a session.
///
/// Accepts both the `base64-` form and raw JSON. Returns `None` for anything
/// that does not decode.
pub fn decode_session(value: &str) -> Option<Session> {
    let json = match value.strip_prefix(BASE64_PREFIX) {
        Some(encoded) => {
            let bytes = URL_SAFE_NO_PAD
                .decode(encoded.trim_end_matches('='))
                .map_err(|e| warn!(error = %e, "Session cookie is not valid base64"))
                .ok()?;
            String::from_utf8(bytes)
                .map_err(|e| warn!(error = %e, "Session cookie is not valid UTF-8"))
                .ok()?
        },
        None => value.to_owned(),
    };

    serde_json::from_str(&json)
        .map_err(|e| warn!(error = %e, "Session cookie does not hold a session"))
        .ok()
}

/// Splits a value into chunks of at most `size` bytes on char boundaries.
pub fn split_chunks(value: &str, size: usize) -> Vec<&str> {
    if value.len() <= size {
        return vec![value];
    }

    let mut chunks = Vec::with_capacity(value.len() / size + 1);
    let mut rest = value;
    while !rest.is_empty() {
        let mut end = size.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

fn chunk_name(key: &str, index: usize) -> String {
    format!("{key}.{index}")
}

/// Reads and writes the session cookies of one project.
#[derive(Debug, Clone)]
pub struct SessionCookieCodec {
    key: String,
    options: CookieOptions,
}

impl SessionCookieCodec {
    /// Creates a codec for the given cookie name and attributes.
    pub fn new(key: impl Into<String>, options: CookieOptions) -> Self {
        Self {
            key: key.into(),
            options,
        }
    }

    /// Creates a codec with the default name and attributes for a service.
    pub fn for_service(service_url: &Url) -> Self {
        Self::new(storage_key(service_url), default_cookie_options())
    }

    /// Returns the cookie name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the cookie attributes used for writes.
    pub fn options(&self) -> &CookieOptions {
        &self.options
    }

    /// Returns the raw stored value, joining chunks if needed.
    pub fn read_raw(&self, store: &dyn CookieStore) -> Option<String> {
        if let Some(value) = store.get(&self.key) {
            return Some(value);
        }

        let chunks: Vec<String> = (0..)
            .map_while(|i| store.get(&chunk_name(&self.key, i)))
            .collect();

        if chunks.is_empty() {
            None
        } else {
            Some(chunks.concat())
        }
    }

    /// Reads the session, if one is stored and decodes.
    pub fn read(&self, store: &dyn CookieStore) -> Option<Session> {
        let raw = self.read_raw(store)?;
        decode_session(&raw)
    }

    /// Writes the session, replacing whatever layout was stored before.
    pub fn write(&self, store: &dyn CookieStore, session: &Session) -> Result<(), AuthError> {
        let encoded = encode_session(session)?;
        let chunks = split_chunks(&encoded, MAX_CHUNK_SIZE);

        if chunks.len() == 1 {
            store.set(&self.key, &encoded, &self.options);
            self.remove_chunks_from(store, 0);
        } else {
            for (i, chunk) in chunks.iter().enumerate() {
                store.set(&chunk_name(&self.key, i), chunk, &self.options);
            }
            if store.get(&self.key).is_some() {
                store.remove(&self.key, &self.options);
            }
            self.remove_chunks_from(store, chunks.len());
        }

        debug!(cookie = %self.key, chunks = chunks.len(), "Session cookies written");
        Ok(())
    }

    /// Removes every session cookie present in the store.
    pub fn clear(&self, store: &dyn CookieStore) {
        if store.get(&self.key).is_some() {
            store.remove(&self.key, &self.options);
        }
        self.remove_chunks_from(store, 0);
        debug!(cookie = %self.key, "Session cookies cleared");
    }

    fn remove_chunks_from(&self, store: &dyn CookieStore, start: usize) {
        let stale: Vec<String> = (start..)
            .map(|i| chunk_name(&self.key, i))
            .take_while(|name| store.get(name).is_some())
            .collect();

        for name in stale {
            store.remove(&name, &self.options);
        }
    }
}

//! User and session records.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User record as returned by the authentication backend.
///
/// Only `id` and `email` are surfaced; every other field is kept verbatim in
/// `attributes` so the record round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: String,

    /// Email address, if the account has one.
    #[serde(default)]
    pub email: Option<String>,

    /// Remaining fields (role, metadata, timestamps...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Session issued by the authentication backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for backend calls.
    pub access_token: String,

    /// Token used to obtain a new session.
    pub refresh_token: String,

    /// Token type, normally `bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: i64,

    /// Expiration timestamp (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,

    /// User the session belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Fills in `expires_at` from `expires_in` when the backend left it out.
    pub fn with_expiry_from(mut self, now: i64) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(now.saturating_add(self.expires_in));
        }
        self
    }

    /// Returns true if the session expires within `margin` seconds of `now`.
    ///
    /// A session without an expiration never expires.
    pub fn expires_within(&self, margin: i64, now: i64) -> bool {
        matches!(self.expires_at, Some(at) if at.saturating_sub(now) <= margin)
    }
}

/// Current time as Unix seconds.
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

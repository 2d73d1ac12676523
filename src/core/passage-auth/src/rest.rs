//! REST authentication backend.
//!
//! Talks to a GoTrue-compatible auth service mounted at `{service_url}/auth/v1`.

use std::time::Duration;

use async_trait::async_trait;
use passage_cookies::{CookieOptions, CookieStore};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::codec::{default_cookie_options, storage_key, SessionCookieCodec};
use crate::types::now_unix;
use crate::{AuthBackend, AuthError, Session, User};

/// Sessions expiring within this many seconds are refreshed before use.
pub const EXPIRY_MARGIN_SECS: i64 = 30;

/// Header carrying the public API key.
const API_KEY_HEADER: &str = "apikey";

/// Configuration for the REST backend.
#[derive(Debug, Clone)]
pub struct RestAuthConfig {
    /// Base URL of the service (e.g., "https://abcdefgh.supabase.co").
    pub service_url: Url,
    /// Public API key sent with every request.
    pub api_key: String,
    /// Attributes of the session cookies written after a refresh.
    pub cookie_options: CookieOptions,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RestAuthConfig {
    /// Creates a configuration with default cookie attributes and a 30s timeout.
    pub fn new(service_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            service_url,
            api_key: api_key.into(),
            cookie_options: default_cookie_options(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Authentication backend speaking the GoTrue REST protocol.
pub struct RestAuthBackend {
    client: Client,
    auth_url: String,
    api_key: String,
    codec: SessionCookieCodec,
}

impl RestAuthBackend {
    /// Creates a new REST backend.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the API key is empty or the
    /// HTTP client cannot be built.
    pub fn new(config: RestAuthConfig) -> Result<Self, AuthError> {
        if config.api_key.trim().is_empty() {
            return Err(AuthError::Configuration("api key is empty".into()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AuthError::Configuration(format!("failed to create HTTP client: {e}")))?;

        let codec = SessionCookieCodec::new(storage_key(&config.service_url), config.cookie_options);
        let auth_url = format!(
            "{}/auth/v1",
            config.service_url.as_str().trim_end_matches('/')
        );

        Ok(Self {
            client,
            auth_url,
            api_key: config.api_key,
            codec,
        })
    }

    /// Returns the codec used for the session cookies.
    pub fn codec(&self) -> &SessionCookieCodec {
        &self.codec
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.auth_url, path)
    }

    /// Asks the backend who owns `access_token`. `None` if the token is rejected.
    async fn fetch_user(&self, access_token: &str) -> Result<Option<User>, AuthError> {
        let response = self
            .client
            .get(self.url("/user"))
            .header(API_KEY_HEADER, &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!(status = %response.status(), "Access token rejected");
                Ok(None)
            },
            _ => Err(error_from(response).await),
        }
    }

    /// Exchanges a refresh token for a new session. `None` if the token is rejected.
    async fn refresh(&self, refresh_token: &str) -> Result<Option<Session>, AuthError> {
        let response = self
            .client
            .post(self.url("/token"))
            .query(&[("grant_type", "refresh_token")])
            .header(API_KEY_HEADER, &self.api_key)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let session: Session = response.json().await?;
                Ok(Some(session.with_expiry_from(now_unix())))
            },
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                let error = error_from(response).await;
                warn!(error = %error, "Refresh token rejected");
                Ok(None)
            },
            _ => Err(error_from(response).await),
        }
    }
}

#[async_trait]
impl AuthBackend for RestAuthBackend {
    async fn get_session(&self, cookies: &dyn CookieStore) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.codec.read(cookies) else {
            return Ok(None);
        };

        if !session.expires_within(EXPIRY_MARGIN_SECS, now_unix()) {
            return Ok(Some(session));
        }

        debug!(expires_at = ?session.expires_at, "Session expiring, refreshing");

        match self.refresh(&session.refresh_token).await? {
            Some(refreshed) => {
                self.codec.write(cookies, &refreshed)?;
                Ok(Some(refreshed))
            },
            None => {
                self.codec.clear(cookies);
                Ok(None)
            },
        }
    }

    async fn get_user(&self, cookies: &dyn CookieStore) -> Result<Option<User>, AuthError> {
        match self.get_session(cookies).await? {
            Some(session) => self.fetch_user(&session.access_token).await,
            None => Ok(None),
        }
    }

    async fn sign_out(&self, cookies: &dyn CookieStore) -> Result<(), AuthError> {
        if let Some(session) = self.codec.read(cookies) {
            let response = self
                .client
                .post(self.url("/logout"))
                .header(API_KEY_HEADER, &self.api_key)
                .bearer_auth(&session.access_token)
                .send()
                .await?;

            let status = response.status();
            let already_gone = matches!(
                status,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
            );
            if !status.is_success() && !already_gone {
                return Err(error_from(response).await);
            }
        }

        self.codec.clear(cookies);
        info!("Signed out");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}

/// Builds an [`AuthError::Backend`] from a non-success response.
async fn error_from(response: Response) -> AuthError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    AuthError::Backend {
        status: status.as_u16(),
        message: error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string()),
    }
}

/// Pulls a human-readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["error_description", "msg", "message", "error"]
            .iter()
            .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_owned))
    });

    Some(from_json.unwrap_or_else(|| body.to_string()))
}

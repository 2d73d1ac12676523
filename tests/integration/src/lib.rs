//! Integration tests for Passage.
//!
//! These tests run the API router against a mock auth service, both served
//! in-process on ephemeral ports.

// Allow unwrap() in tests - panics are acceptable for test assertions
#![allow(clippy::disallowed_methods)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use passage_auth::codec::encode_session;
use passage_auth::{Session, Url};
use passage_session::{ClientConfig, SessionProvider};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: Option<Value>,
}

// ============================================================================
// Mock Auth Service
// ============================================================================

/// Access token accepted by the mock service.
pub const VALID_ACCESS: &str = "valid-access";
/// Refresh token accepted by the mock service.
pub const VALID_REFRESH: &str = "good-refresh";
/// Access token issued on refresh.
pub const REFRESHED_ACCESS: &str = "refreshed-access";

/// Request counters of the mock service.
#[derive(Debug, Default)]
pub struct Calls {
    pub user: AtomicUsize,
    pub token: AtomicUsize,
    pub logout: AtomicUsize,
}

/// GoTrue-like auth service with a single user.
pub struct MockAuthService {
    pub url: Url,
    pub calls: Arc<Calls>,
}

pub fn user_json() -> Value {
    json!({
        "id": "user-1",
        "aud": "authenticated",
        "email": "jane@example.com",
        "role": "authenticated",
        "app_metadata": { "provider": "email" },
        "user_metadata": { "name": "Jane" }
    })
}

async fn user_handler(State(calls): State<Arc<Calls>>, headers: HeaderMap) -> Response {
    calls.user.fetch_add(1, Ordering::SeqCst);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == format!("Bearer {VALID_ACCESS}") => {
            Json(user_json()).into_response()
        },
        Some(value) if value == format!("Bearer {REFRESHED_ACCESS}") => {
            Json(user_json()).into_response()
        },
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "invalid JWT" }))).into_response(),
    }
}

async fn token_handler(State(calls): State<Arc<Calls>>, Json(body): Json<Value>) -> Response {
    calls.token.fetch_add(1, Ordering::SeqCst);
    if body["refresh_token"] == VALID_REFRESH {
        Json(json!({
            "access_token": REFRESHED_ACCESS,
            "refresh_token": "next-refresh",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": user_json()
        }))
        .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid Refresh Token"
            })),
        )
            .into_response()
    }
}

async fn logout_handler(State(calls): State<Arc<Calls>>) -> StatusCode {
    calls.logout.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

impl MockAuthService {
    /// Start the mock service on an ephemeral port.
    pub async fn start() -> Result<Self> {
        let calls = Arc::new(Calls::default());
        let router = Router::new()
            .route("/auth/v1/user", get(user_handler))
            .route("/auth/v1/token", post(token_handler))
            .route("/auth/v1/logout", post(logout_handler))
            .with_state(calls.clone());

        let addr = serve(router).await?;
        let url = Url::parse(&format!("http://{addr}")).context("Invalid mock URL")?;

        Ok(Self { url, calls })
    }

    /// Session provider pointed at this service.
    pub fn provider(&self) -> Result<SessionProvider> {
        let config = ClientConfig::new(self.url.as_str(), "anon-key")?;
        Ok(SessionProvider::new(config)?)
    }
}

async fn serve(router: Router) -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(addr)
}

// ============================================================================
// Test Server
// ============================================================================

/// The Passage API served in-process, backed by a mock auth service.
pub struct TestServer {
    pub base_url: String,
    pub auth: MockAuthService,
    pub cookie_name: String,
}

impl TestServer {
    /// Start the mock auth service and the API.
    pub async fn start() -> Result<Self> {
        let auth = MockAuthService::start().await?;
        let provider = auth.provider()?;
        let cookie_name = passage_auth::codec::storage_key(provider.config().service_url());

        let addr = serve(passage_api::router(Arc::new(provider))).await?;

        Ok(Self {
            base_url: format!("http://{addr}"),
            auth,
            cookie_name,
        })
    }

    /// Get a configured HTTP client for this server.
    pub fn client(&self) -> PassageClient {
        PassageClient::new(&self.base_url)
    }

    /// `Cookie` header value carrying `session`.
    pub fn session_cookie(&self, session: &Session) -> String {
        let value = encode_session(session).expect("encode session");
        format!("{}={}", self.cookie_name, value)
    }
}

/// Builds a session expiring `expires_in` seconds from now.
pub fn session(access_token: &str, refresh_token: &str, expires_in: i64) -> Session {
    Session {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        token_type: "bearer".to_string(),
        expires_in: expires_in.max(0),
        expires_at: Some(passage_auth::types::now_unix() + expires_in),
        user: None,
    }
}

// ============================================================================
// Test Client
// ============================================================================

/// Response of a call that may set cookies.
pub struct CookieResponse<T> {
    pub status: StatusCode,
    pub set_cookies: Vec<String>,
    pub body: Option<T>,
}

/// HTTP client for testing the Passage API.
pub struct PassageClient {
    client: Client,
    base_url: String,
    cookie: Option<String>,
}

impl PassageClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            cookie: None,
        }
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.cookie = Some(cookie.to_string());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let req = self.client.request(method, self.url(path));
        match &self.cookie {
            Some(cookie) => req.header(reqwest::header::COOKIE, cookie),
            None => req,
        }
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<CookieResponse<T>> {
        let resp = self.request(method, path).send().await?;
        let status = resp.status();
        let set_cookies = resp
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_owned))
            .collect();
        let bytes = resp.bytes().await?;
        let body = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };

        Ok(CookieResponse {
            status,
            set_cookies,
            body,
        })
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self.client.get(self.url("/v1/sys/health")).send().await?;
        Ok(resp.json().await?)
    }

    pub async fn session(&self) -> Result<CookieResponse<SessionResponse>> {
        self.send(reqwest::Method::GET, "/v1/session").await
    }

    pub async fn refresh(&self) -> Result<CookieResponse<SessionResponse>> {
        self.send(reqwest::Method::POST, "/v1/session/refresh").await
    }

    pub async fn sign_out(&self) -> Result<CookieResponse<Value>> {
        self.send(reqwest::Method::POST, "/v1/session/signout").await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use passage_cookies::{BrowserCookies, CookieStore};

    fn set_cookie_value<'a>(set_cookies: &'a [String], name: &str) -> Option<&'a str> {
        set_cookies.iter().find_map(|line| {
            let pair = line.split(';').next()?;
            let (cookie_name, value) = pair.split_once('=')?;
            (cookie_name == name).then_some(value)
        })
    }

    #[tokio::test]
    async fn test_server_health() {
        let server = TestServer::start().await.unwrap();

        let health = server.client().health().await.unwrap();

        assert_eq!(health.status, "ok");
        assert!(!health.version.is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_session() {
        let server = TestServer::start().await.unwrap();

        let resp = server.client().session().await.unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        let body = resp.body.unwrap();
        assert!(!body.authenticated);
        assert!(body.user.is_none());
        assert_eq!(server.auth.calls.user.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_session_returns_backend_user_unchanged() {
        let server = TestServer::start().await.unwrap();
        let cookie = server.session_cookie(&session(VALID_ACCESS, VALID_REFRESH, 3600));

        let resp = server.client().with_cookie(&cookie).session().await.unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        assert!(resp.set_cookies.is_empty());
        let body = resp.body.unwrap();
        assert!(body.authenticated);
        assert_eq!(body.user, Some(user_json()));
    }

    #[tokio::test]
    async fn test_read_only_path_never_sets_cookies() {
        let server = TestServer::start().await.unwrap();
        let cookie = server.session_cookie(&session("stale-access", VALID_REFRESH, -60));

        let resp = server.client().with_cookie(&cookie).session().await.unwrap();

        // The refresh happens, but it cannot be persisted from here
        assert_eq!(resp.status, StatusCode::OK);
        assert!(resp.body.unwrap().authenticated);
        assert!(resp.set_cookies.is_empty());
        assert_eq!(server.auth.calls.token.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_sets_new_session_cookie() {
        let server = TestServer::start().await.unwrap();
        let cookie = server.session_cookie(&session("stale-access", VALID_REFRESH, -60));

        let resp = server.client().with_cookie(&cookie).refresh().await.unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        let body = resp.body.unwrap();
        assert!(body.authenticated);
        assert!(body.expires_at.is_some());

        let value = set_cookie_value(&resp.set_cookies, &server.cookie_name).unwrap();
        let refreshed = passage_auth::codec::decode_session(value).unwrap();
        assert_eq!(refreshed.access_token, REFRESHED_ACCESS);
        assert_eq!(refreshed.refresh_token, "next-refresh");
    }

    #[tokio::test]
    async fn test_rejected_refresh_clears_cookie() {
        let server = TestServer::start().await.unwrap();
        let cookie = server.session_cookie(&session("stale-access", "revoked", -60));

        let resp = server.client().with_cookie(&cookie).refresh().await.unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        assert!(!resp.body.unwrap().authenticated);
        assert_eq!(set_cookie_value(&resp.set_cookies, &server.cookie_name), Some(""));
        assert!(resp.set_cookies[0].contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_sign_out_expires_cookie() {
        let server = TestServer::start().await.unwrap();
        let cookie = server.session_cookie(&session(VALID_ACCESS, VALID_REFRESH, 3600));

        let resp = server.client().with_cookie(&cookie).sign_out().await.unwrap();

        assert_eq!(resp.status, StatusCode::NO_CONTENT);
        assert_eq!(server.auth.calls.logout.load(Ordering::SeqCst), 1);
        assert_eq!(resp.set_cookies.len(), 1);
        assert_eq!(set_cookie_value(&resp.set_cookies, &server.cookie_name), Some(""));
        assert!(resp.set_cookies[0].contains("Max-Age=0"));
        assert!(resp.set_cookies[0].contains("Path=/"));
    }

    #[tokio::test]
    async fn test_sign_out_without_session() {
        let server = TestServer::start().await.unwrap();

        let resp = server.client().sign_out().await.unwrap();

        assert_eq!(resp.status, StatusCode::NO_CONTENT);
        assert!(resp.set_cookies.is_empty());
        assert_eq!(server.auth.calls.logout.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_browser_helpers() {
        let auth = MockAuthService::start().await.unwrap();
        let jar = BrowserCookies::new();
        let provider = auth.provider().unwrap().with_browser_cookies(jar.clone());

        assert!(!provider.is_authenticated().await.unwrap());
        assert_eq!(provider.get_current_user().await.unwrap(), None);

        let key = passage_auth::codec::storage_key(provider.config().service_url());
        let value = encode_session(&session("stale-access", VALID_REFRESH, -60)).unwrap();
        jar.load_cookie_header(&format!("{key}={value}"));

        assert!(provider.is_authenticated().await.unwrap());
        let user = provider.get_current_user().await.unwrap().unwrap();
        assert_eq!(serde_json::to_value(&user).unwrap(), user_json());

        // The browser jar picked up the refreshed session
        let stored = passage_auth::codec::decode_session(&jar.get(&key).unwrap()).unwrap();
        assert_eq!(stored.access_token, REFRESHED_ACCESS);
        assert_eq!(auth.calls.token.load(Ordering::SeqCst), 1);
    }
}

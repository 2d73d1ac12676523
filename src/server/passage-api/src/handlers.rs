//! Request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use passage_auth::User;
use passage_cookies::{CookieJar, ReadOnlyCookies, ResponseCookies};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ApiError, AppState};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Session state of the caller.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// True if a session is present.
    pub authenticated: bool,
    /// Session expiration (Unix seconds), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// User the session belongs to.
    pub user: Option<User>,
}

/// `GET /v1/sys/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /v1/session`
///
/// Runs in the read-only context: a refresh triggered here is not persisted.
pub async fn get_session(
    State(state): State<AppState>,
    cookies: ReadOnlyCookies,
) -> Result<Json<SessionResponse>, ApiError> {
    let client = state.provider().create_client_server(cookies);
    let user = client.auth().get_user().await?;

    Ok(Json(SessionResponse {
        authenticated: user.is_some(),
        expires_at: None,
        user,
    }))
}

/// `POST /v1/session/refresh`
pub async fn refresh_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(ResponseCookies, Json<SessionResponse>), ApiError> {
    let response = ResponseCookies::new();
    let client = state.provider().create_client_route(jar, &response);
    let session = client.auth().get_session().await?;

    debug!(authenticated = session.is_some(), "Session refreshed");

    let body = match session {
        Some(session) => SessionResponse {
            authenticated: true,
            expires_at: session.expires_at,
            user: session.user,
        },
        None => SessionResponse {
            authenticated: false,
            expires_at: None,
            user: None,
        },
    };

    Ok((response, Json(body)))
}

/// `POST /v1/session/signout`
pub async fn sign_out(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(ResponseCookies, StatusCode), ApiError> {
    let response = ResponseCookies::new();
    let client = state.provider().create_client_route(jar, &response);
    client.auth().sign_out().await?;

    Ok((response, StatusCode::NO_CONTENT))
}

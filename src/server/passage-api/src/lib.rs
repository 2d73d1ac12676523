//! # Passage API
//!
//! HTTP surface hosting the session provider.
//!
//! ## Endpoints
//!
//! - `GET /v1/sys/health` - Liveness
//! - `GET /v1/session` - Current user (read-only cookies)
//! - `POST /v1/session/refresh` - Refresh the session (writes cookies)
//! - `POST /v1/session/signout` - End the session (clears cookies)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use passage_session::SessionProvider;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    provider: Arc<SessionProvider>,
}

impl AppState {
    /// Wraps a provider.
    pub fn new(provider: Arc<SessionProvider>) -> Self {
        Self { provider }
    }

    /// Session provider.
    pub fn provider(&self) -> &SessionProvider {
        &self.provider
    }
}

/// Builds the API router.
pub fn router(provider: Arc<SessionProvider>) -> Router {
    Router::new()
        .route("/v1/sys/health", get(handlers::health))
        .route("/v1/session", get(handlers::get_session))
        .route("/v1/session/refresh", post(handlers::refresh_session))
        .route("/v1/session/signout", post(handlers::sign_out))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(provider))
}

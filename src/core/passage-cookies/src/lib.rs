//! # Passage Cookies
//!
//! Cookie access policies for Passage session clients.
//!
//! A session client never touches cookies directly. It goes through a
//! [`CookieStore`], and which operations actually take effect depends on where
//! the client runs:
//!
//! - **Browser**: long-lived interactive client, full get/set/remove
//! - **Read-only server**: server-rendered read path, `set`/`remove` are no-ops
//! - **Read-write handler**: request handler, reads the request and writes the response

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod browser;
pub mod options;
pub mod route;
pub mod server;
pub mod store;

pub use access::CookieAccess;
pub use browser::BrowserCookies;
pub use options::CookieOptions;
pub use route::{ResponseCookies, RouteCookies};
pub use server::ReadOnlyCookies;
pub use store::{CookieStore, ExecutionContext};

pub use axum_extra::extract::cookie::CookieJar;
pub use cookie::{Cookie, SameSite};

//! # Passage Auth
//!
//! Authentication backend access for Passage session clients.
//!
//! The session lives in cookies written by the backend SDKs. This crate knows
//! how to read it back ([`codec`]), how to keep it fresh, and how to ask the
//! backend who the session belongs to ([`RestAuthBackend`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod codec;
pub mod error;
pub mod rest;
pub mod types;

pub use backend::AuthBackend;
pub use codec::SessionCookieCodec;
pub use error::AuthError;
pub use rest::{RestAuthBackend, RestAuthConfig};
pub use types::{Session, User};

pub use reqwest::Url;

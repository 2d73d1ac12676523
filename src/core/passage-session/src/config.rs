//! Client configuration.
//!
//! The two connection values come from the process environment and are
//! validated in one place, [`ClientConfig::from_env`].

use passage_auth::{RestAuthConfig, Url};
use thiserror::Error;

/// Environment variable holding the service URL.
pub const SERVICE_URL_VAR: &str = "PASSAGE_SERVICE_URL";

/// Environment variable holding the public API key.
pub const SERVICE_PUBLIC_KEY_VAR: &str = "PASSAGE_SERVICE_PUBLIC_KEY";

/// Configuration errors. These are fatal misconfigurations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable is not set.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// Required variable is set but blank.
    #[error("environment variable {0} is empty")]
    Empty(&'static str),

    /// Service URL does not parse or is not http(s).
    #[error("invalid service URL {url:?}: {reason}")]
    InvalidUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The auth backend could not be built from otherwise valid values.
    #[error("cannot build auth backend: {0}")]
    Backend(String),
}

/// Connection values shared by every session client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    service_url: Url,
    public_key: String,
}

impl ClientConfig {
    /// Validates and builds a configuration from raw values.
    pub fn new(service_url: &str, public_key: &str) -> Result<Self, ConfigError> {
        let service_url = service_url.trim();
        let public_key = public_key.trim();

        if service_url.is_empty() {
            return Err(ConfigError::Empty(SERVICE_URL_VAR));
        }
        if public_key.is_empty() {
            return Err(ConfigError::Empty(SERVICE_PUBLIC_KEY_VAR));
        }

        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: service_url.to_string(),
            reason,
        };

        let url = Url::parse(service_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        Ok(Self {
            service_url: url,
            public_key: public_key.to_string(),
        })
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either variable is missing, blank, or the
    /// URL is invalid. Callers should treat this as fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_url = lookup(SERVICE_URL_VAR).ok_or(ConfigError::Missing(SERVICE_URL_VAR))?;
        let public_key =
            lookup(SERVICE_PUBLIC_KEY_VAR).ok_or(ConfigError::Missing(SERVICE_PUBLIC_KEY_VAR))?;

        Self::new(&service_url, &public_key)
    }

    /// Service URL.
    pub fn service_url(&self) -> &Url {
        &self.service_url
    }

    /// Public API key.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Settings for the REST auth backend of this service.
    pub fn rest_auth_config(&self) -> RestAuthConfig {
        RestAuthConfig::new(self.service_url.clone(), self.public_key.clone())
    }
}

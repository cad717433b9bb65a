// Client configuration.
// Explicit context (API root + consumer credentials) handed to each call at construction.

use url::Url;

use crate::error::{ApiError, Result};

/// Production API root used when no override is configured.
pub const DEFAULT_API_URL: &str = "https://api.discograph.example/1.0/";

/// Consumer key/secret pair identifying the calling application.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl OAuthCredentials {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Read credentials from `DISCOGRAPH_CONSUMER_KEY` / `DISCOGRAPH_CONSUMER_SECRET`.
    pub fn from_env() -> Result<Self> {
        let consumer_key = std::env::var("DISCOGRAPH_CONSUMER_KEY")
            .map_err(|_| ApiError::Config("DISCOGRAPH_CONSUMER_KEY is not set".into()))?;
        let consumer_secret = std::env::var("DISCOGRAPH_CONSUMER_SECRET").unwrap_or_default();
        Ok(Self {
            consumer_key,
            consumer_secret,
        })
    }
}

/// Everything a call needs to know about the remote API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub credentials: OAuthCredentials,
}

impl ApiConfig {
    pub fn new(base_url: &str, credentials: OAuthCredentials) -> Result<Self> {
        // Endpoint paths are joined onto the root, so it must end in a slash
        // or Url::join would replace its last segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| ApiError::Config(format!("invalid API base URL {base_url:?}: {e}")))?;
        Ok(Self {
            base_url,
            credentials,
        })
    }

    /// Configuration from the environment, falling back to the default API
    /// root when `DISCOGRAPH_API_URL` is unset.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("DISCOGRAPH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&base_url, OAuthCredentials::from_env()?)
    }
}

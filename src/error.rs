// Error types for the discograph client.
// Distinguishes transport failures, API-reported errors, and parse/configuration problems.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response: connection, timeout, DNS.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered and reported an application-level error.
    #[error("API error {code}: {message} ({url})")]
    Api {
        code: u32,
        message: String,
        url: String,
    },

    /// The response body matched neither the success nor the error schema
    /// for its declared content type.
    #[error("unparseable response from {url} (HTTP {status}): {detail}")]
    Parse {
        url: String,
        status: u16,
        detail: String,
    },

    /// Endpoint metadata, credentials, or serializers were missing before a
    /// request could be built.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

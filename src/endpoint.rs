// Endpoint metadata.
// Response types declare their endpoint path, default method, and parameter defaults statically.

use serde::de::DeserializeOwned;

/// HTTP methods the API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one API endpoint.
#[derive(Debug, Clone, Copy)]
pub struct EndpointInfo {
    /// URL path relative to the API root; may contain `{name}` placeholders
    /// filled from parameters at build time.
    pub path: &'static str,
    /// Method used unless overridden per call.
    pub method: HttpMethod,
    /// Parameter values populated before any per-call mutation.
    pub defaults: &'static [(&'static str, &'static str)],
    /// Parameters the remote rejects the request without.
    pub required: &'static [&'static str],
    /// Whether the endpoint expects a user token/secret pair.
    pub user_auth: bool,
}

impl EndpointInfo {
    pub const fn new(path: &'static str, method: HttpMethod) -> Self {
        Self {
            path,
            method,
            defaults: &[],
            required: &[],
            user_auth: false,
        }
    }
}

/// Declares the endpoint a response type is fetched from.
///
/// The trait is the crate's endpoint registry: metadata lives with the type
/// and is looked up once, when a call is constructed.
pub trait ApiEndpoint: DeserializeOwned {
    fn endpoint() -> EndpointInfo;
}

// HTTP transport.
// The seam between request construction and the network; default implementation over reqwest.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::endpoint::HttpMethod;
use crate::error::{ApiError, Result};
use crate::request::builder::BuiltRequest;
use crate::response::parser::RawResponse;

/// Dispatches built requests and returns raw responses.
///
/// Implementations block or suspend only here; every other pipeline step is
/// synchronous and in-memory.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &BuiltRequest) -> Result<RawResponse>;
}

/// Transport backed by a shared reqwest client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("discograph"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Config(format!("could not build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &BuiltRequest) -> Result<RawResponse> {
        let mut dispatch = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };
        for (name, value) in &request.headers {
            dispatch = dispatch.header(name, value);
        }
        if let Some(payload) = &request.body {
            dispatch = dispatch.body(payload.body.clone());
        }

        debug!(method = %request.method, url = %request.url, "dispatching request");
        let response = dispatch.send().await.map_err(|source| ApiError::Transport {
            url: request.url.clone(),
            source,
        })?;

        let status = response.status().as_u16();
        // The API answers XML unless told otherwise, so a missing content
        // type falls back to the XML detector.
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/xml")
            .to_string();
        let url = response.url().to_string();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        Ok(RawResponse {
            status,
            content_type,
            body,
            url,
        })
    }
}

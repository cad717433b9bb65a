// Fluent orchestration.
// One ApiCall per request session: chainable mutation, then execute.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cache::{NullCache, ResponseCache};
use crate::config::ApiConfig;
use crate::endpoint::{ApiEndpoint, HttpMethod};
use crate::error::{ApiError, Result};
use crate::request::builder::RequestBuilder;
use crate::request::descriptor::RequestDescriptor;
use crate::request::payload::{
    PayloadFormat, PayloadSerializer, RequestPayload, default_serializers,
};
use crate::response::parser::ResponseParser;
use crate::transport::{HttpTransport, ReqwestTransport};

/// A single orchestration session against one endpoint.
///
/// Mutators consume and return the call so configuration chains; `execute`
/// runs the full pipeline: cache lookup, build, dispatch, classify, parse,
/// cache store. The descriptor is mutated in place, so a call must not be
/// driven from multiple threads without external synchronization.
pub struct ApiCall<T: ApiEndpoint> {
    descriptor: RequestDescriptor,
    builder: RequestBuilder,
    parser: ResponseParser,
    transport: Arc<dyn HttpTransport>,
    cache: Arc<dyn ResponseCache<T>>,
    serializers: Vec<Box<dyn PayloadSerializer>>,
}

impl<T: ApiEndpoint> ApiCall<T> {
    /// Resolve `T`'s endpoint metadata and prepare a call with the default
    /// transport and the no-op cache.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            descriptor: RequestDescriptor::resolve::<T>()?,
            builder: RequestBuilder::new(config.clone()),
            parser: ResponseParser,
            transport: Arc::new(ReqwestTransport::new()?),
            cache: Arc::new(NullCache),
            serializers: default_serializers(),
        })
    }

    /// Substitute the transport, e.g. for tests or instrumentation.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Opt in to response caching.
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache<T>>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the payload serializer registry.
    pub fn with_serializers(mut self, serializers: Vec<Box<dyn PayloadSerializer>>) -> Self {
        self.serializers = serializers;
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.descriptor.method = method;
        self
    }

    /// Insert or overwrite one request parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.descriptor.set_parameter(name, value);
        self
    }

    /// Drop every parameter set so far, endpoint defaults included.
    pub fn clear_parameters(mut self) -> Self {
        self.descriptor.clear_parameters();
        self
    }

    /// Authenticate as a user; the request will be signed.
    pub fn for_user(mut self, token: impl Into<String>, secret: impl Into<String>) -> Self {
        self.descriptor.user_token = Some(token.into());
        self.descriptor.token_secret = Some(secret.into());
        self
    }

    /// Attach an already serialized body.
    pub fn with_payload(mut self, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        self.descriptor.payload = Some(RequestPayload::new(content_type, body));
        self
    }

    /// Serialize `payload` with the registered serializer for `format`.
    pub fn with_payload_in<P: Serialize>(
        mut self,
        format: PayloadFormat,
        payload: &P,
    ) -> Result<Self> {
        let serializer = self
            .serializers
            .iter()
            .find(|candidate| candidate.handles() == format)
            .ok_or_else(|| {
                ApiError::Config(format!("no payload serializer registered for {format:?}"))
            })?;
        let body = serializer.serialize(payload)?;
        self.descriptor.payload = Some(RequestPayload::new(serializer.content_type(), body));
        Ok(self)
    }

    /// Current parameter set, endpoint defaults included.
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.descriptor.parameters
    }

    /// The URL `execute` would request, for diagnostics. No network I/O.
    pub fn endpoint_url(&self) -> Result<String> {
        Ok(self.builder.build(&self.descriptor)?.url)
    }

    /// Run the pipeline. The cache is consulted before the transport and
    /// written only after a successful parse; failures of any kind leave it
    /// untouched.
    pub async fn execute(&mut self) -> Result<T> {
        if let Some(hit) = self.cache.try_get(&self.descriptor) {
            debug!(path = %self.descriptor.path, "cache hit, skipping dispatch");
            return Ok(hit);
        }

        let request = self.builder.build(&self.descriptor)?;
        let response = self.transport.send(&request).await?;
        let result = self.parser.parse::<T>(&response)?;
        self.cache.set(&self.descriptor, &result);
        Ok(result)
    }

    /// `execute` on a freshly built single-thread runtime, for callers that
    /// have none. Must not be invoked from inside an async context.
    pub fn execute_blocking(&mut self) -> Result<T> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.execute())
    }
}

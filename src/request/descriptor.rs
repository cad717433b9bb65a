// Request descriptor.
// Mutable per-session request state: method, path, parameters, user credentials, payload.

use std::collections::BTreeMap;

use crate::endpoint::{ApiEndpoint, EndpointInfo, HttpMethod};
use crate::error::{ApiError, Result};
use crate::request::payload::RequestPayload;

/// The request shape one call session mutates and finally builds.
///
/// Parameters live in a `BTreeMap` so every iteration is name-sorted, which
/// the signer and the cache fingerprint both depend on. Insertion is
/// last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub parameters: BTreeMap<String, String>,
    pub user_token: Option<String>,
    pub token_secret: Option<String>,
    pub payload: Option<RequestPayload>,
}

impl RequestDescriptor {
    /// Initial descriptor for `T`, with its endpoint defaults populated.
    pub fn resolve<T: ApiEndpoint>() -> Result<Self> {
        Self::from_info(T::endpoint())
    }

    pub(crate) fn from_info(info: EndpointInfo) -> Result<Self> {
        if info.path.is_empty() {
            return Err(ApiError::Config(
                "endpoint declares an empty path".to_string(),
            ));
        }
        let mut descriptor = Self {
            method: info.method,
            path: info.path.to_string(),
            ..Self::default()
        };
        for (name, value) in info.defaults {
            descriptor.set_parameter(*name, *value);
        }
        Ok(descriptor)
    }

    /// Insert or overwrite one parameter.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(name.into(), value.into());
    }

    pub fn clear_parameters(&mut self) {
        self.parameters.clear();
    }

    /// Whether a user token/secret pair is attached.
    pub fn has_user_credentials(&self) -> bool {
        self.user_token.is_some() && self.token_secret.is_some()
    }
}

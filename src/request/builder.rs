// Request construction.
// Turns a descriptor plus configuration into a fully formed, signed request.

use std::collections::BTreeMap;

use crate::config::ApiConfig;
use crate::endpoint::HttpMethod;
use crate::error::{ApiError, Result};
use crate::request::descriptor::RequestDescriptor;
use crate::request::payload::RequestPayload;
use crate::request::signature;

/// A request ready for dispatch. Derived deterministically from its
/// descriptor: same descriptor and configuration, byte-identical request.
#[derive(Debug, Clone)]
pub struct BuiltRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestPayload>,
}

/// Builds signed requests against one API root with one set of consumer
/// credentials.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: ApiConfig,
}

impl RequestBuilder {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, descriptor: &RequestDescriptor) -> Result<BuiltRequest> {
        let credentials = &self.config.credentials;
        if credentials.consumer_key.is_empty() {
            return Err(ApiError::Config("consumer key is not configured".to_string()));
        }

        let mut parameters = descriptor.parameters.clone();
        let path = substitute_path(&descriptor.path, &mut parameters)?;
        let endpoint = self
            .config
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| {
                ApiError::Config(format!("could not resolve endpoint path {path:?}: {e}"))
            })?;

        parameters.insert(
            "oauth_consumer_key".to_string(),
            credentials.consumer_key.clone(),
        );
        if let (Some(token), Some(secret)) = (&descriptor.user_token, &descriptor.token_secret) {
            if credentials.consumer_secret.is_empty() {
                return Err(ApiError::Config(
                    "consumer secret is required to sign user requests".to_string(),
                ));
            }
            parameters.insert("oauth_token".to_string(), token.clone());
            // Signed over the URL without its query; the signature itself is
            // never part of the signed parameter set.
            let signature = signature::sign(
                descriptor.method,
                endpoint.as_str(),
                &parameters,
                &credentials.consumer_secret,
                secret,
            );
            parameters.insert("oauth_signature".to_string(), signature);
        }

        let query = parameters
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    signature::percent_encode(name),
                    signature::percent_encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{endpoint}?{query}");

        let mut headers = Vec::new();
        if let Some(payload) = &descriptor.payload {
            headers.push(("Content-Type".to_string(), payload.content_type.clone()));
        }

        Ok(BuiltRequest {
            method: descriptor.method,
            url,
            headers,
            body: descriptor.payload.clone(),
        })
    }
}

/// Replace `{name}` placeholders in the path template, consuming the matching
/// parameters so they are not re-sent as query parameters.
fn substitute_path(template: &str, parameters: &mut BTreeMap<String, String>) -> Result<String> {
    let mut path = template.to_string();
    while let Some(start) = path.find('{') {
        let end = path[start..]
            .find('}')
            .map(|offset| start + offset)
            .ok_or_else(|| {
                ApiError::Config(format!("unterminated placeholder in path {template:?}"))
            })?;
        let name = path[start + 1..end].to_string();
        let value = parameters.remove(&name).ok_or_else(|| {
            ApiError::Config(format!("missing path parameter {name:?} for {template:?}"))
        })?;
        path.replace_range(start..=end, &signature::percent_encode(&value));
    }
    Ok(path)
}

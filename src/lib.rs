//! Fluent client for the Discograph music catalog REST API.
//!
//! Response types declare their endpoint via [`ApiEndpoint`]; an [`ApiCall`]
//! resolves that metadata once, accepts per-call configuration, builds a
//! signed URL, dispatches it, classifies the response as success or API
//! error, and deserializes the payload — optionally caching parsed results.
//!
//! ```rust,ignore
//! use discograph::{ApiCall, ApiConfig};
//!
//! let config = ApiConfig::from_env()?;
//! let artist = ApiCall::<Artist>::new(&config)?
//!     .with_parameter("artistId", "1")
//!     .execute()
//!     .await?;
//! ```

pub mod cache;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod fluent;
pub mod request;
pub mod response;
pub mod transport;

pub use cache::{FileCache, MemoryCache, NullCache, ResponseCache};
pub use config::{ApiConfig, OAuthCredentials};
pub use endpoint::{ApiEndpoint, EndpointInfo, HttpMethod};
pub use error::{ApiError, Result};
pub use fluent::ApiCall;
pub use request::{BuiltRequest, PayloadFormat, PayloadSerializer, RequestDescriptor, RequestPayload};
pub use response::{RawResponse, ResponseParser};
pub use transport::{HttpTransport, ReqwestTransport};

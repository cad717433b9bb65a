// Response caching.
// Pluggable cache keyed by a request-shape fingerprint; the default is a no-op.

pub mod file;
pub mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use crate::request::descriptor::RequestDescriptor;

/// Maps request shapes to previously parsed results.
///
/// `try_get` runs before the network, `set` only after a successful parse;
/// error responses and transport failures never reach `set`. Thread safety
/// and eviction are implementation concerns.
pub trait ResponseCache<T>: Send + Sync {
    fn try_get(&self, descriptor: &RequestDescriptor) -> Option<T>;
    fn set(&self, descriptor: &RequestDescriptor, value: &T);
}

/// The default cache: always misses, discards every set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl<T> ResponseCache<T> for NullCache {
    fn try_get(&self, _descriptor: &RequestDescriptor) -> Option<T> {
        None
    }

    fn set(&self, _descriptor: &RequestDescriptor, _value: &T) {}
}

/// Stable key for one request shape: method, path, sorted parameters, and
/// whether user credentials are attached. Secret values never enter the key.
pub fn fingerprint(descriptor: &RequestDescriptor) -> String {
    let parameters = descriptor
        .parameters
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let auth = if descriptor.user_token.is_some() {
        "user"
    } else {
        "anonymous"
    };
    format!(
        "{} {}?{} [{}]",
        descriptor.method.as_str(),
        descriptor.path,
        parameters,
        auth
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::HttpMethod;

    fn descriptor(path: &str, pairs: &[(&str, &str)]) -> RequestDescriptor {
        let mut descriptor = RequestDescriptor {
            path: path.to_string(),
            ..RequestDescriptor::default()
        };
        for (name, value) in pairs {
            descriptor.set_parameter(*name, *value);
        }
        descriptor
    }

    #[test]
    fn test_fingerprint_is_order_independent() {
        let forward = descriptor("track/search", &[("a", "1"), ("b", "2")]);
        let reverse = descriptor("track/search", &[("b", "2"), ("a", "1")]);
        assert_eq!(fingerprint(&forward), fingerprint(&reverse));
    }

    #[test]
    fn test_fingerprint_varies_by_shape() {
        let base = descriptor("artist/details", &[("artistId", "1")]);
        assert_ne!(
            fingerprint(&base),
            fingerprint(&descriptor("artist/details", &[("artistId", "2")]))
        );
        assert_ne!(
            fingerprint(&base),
            fingerprint(&descriptor("artist/toptracks", &[("artistId", "1")]))
        );
        let mut posted = base.clone();
        posted.method = HttpMethod::Post;
        assert_ne!(fingerprint(&base), fingerprint(&posted));
    }

    #[test]
    fn test_fingerprint_marks_credential_presence_without_secrets() {
        let anonymous = descriptor("user/locker", &[]);
        let mut signed = anonymous.clone();
        signed.user_token = Some("token-value".to_string());
        signed.token_secret = Some("secret-value".to_string());

        assert_ne!(fingerprint(&anonymous), fingerprint(&signed));
        assert!(!fingerprint(&signed).contains("token-value"));
        assert!(!fingerprint(&signed).contains("secret-value"));
    }

    #[test]
    fn test_null_cache_always_misses() {
        let cache = NullCache;
        let descriptor = descriptor("artist/details", &[("artistId", "1")]);
        cache.set(&descriptor, &"cached".to_string());
        let hit: Option<String> = cache.try_get(&descriptor);
        assert!(hit.is_none());
    }
}

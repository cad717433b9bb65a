// Request signing.
// Canonical base string + HMAC-SHA1, attached to the request as an oauth_signature parameter.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::endpoint::HttpMethod;

type HmacSha1 = Hmac<Sha1>;

/// Percent-encode with the RFC 3986 unreserved set, as the signature scheme
/// requires for every base-string component.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Canonical base string: method, encoded URL, encoded name-sorted parameter
/// string. Reproducing this byte-for-byte is what keeps signatures valid
/// against the remote; any ordering or encoding divergence invalidates them.
pub fn base_string(
    method: HttpMethod,
    url: &str,
    parameters: &BTreeMap<String, String>,
) -> String {
    let parameter_string = parameters
        .iter()
        .map(|(name, value)| format!("{}={}", percent_encode(name), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.as_str(),
        percent_encode(url),
        percent_encode(&parameter_string)
    )
}

/// Signature over the base string, keyed by the consumer secret and the user
/// token secret. Deliberately nonce- and timestamp-free: a signature is a
/// pure function of the request shape.
pub fn sign(
    method: HttpMethod,
    url: &str,
    parameters: &BTreeMap<String, String>,
    consumer_secret: &str,
    token_secret: &str,
) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(base_string(method, url, parameters).as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_base_string_shape() {
        let params = parameters(&[("artistId", "1"), ("country", "GB")]);
        let base = base_string(
            HttpMethod::Get,
            "https://api.example.com/1.0/artist/details",
            &params,
        );
        assert_eq!(
            base,
            "GET&https%3A%2F%2Fapi.example.com%2F1.0%2Fartist%2Fdetails\
             &artistId%3D1%26country%3DGB"
        );
    }

    #[test]
    fn test_base_string_sorts_parameters() {
        let forward = parameters(&[("a", "1"), ("b", "2")]);
        let reverse = parameters(&[("b", "2"), ("a", "1")]);
        let url = "https://api.example.com/1.0/track/search";
        assert_eq!(
            base_string(HttpMethod::Get, url, &forward),
            base_string(HttpMethod::Get, url, &reverse)
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let params = parameters(&[("artistId", "1")]);
        let url = "https://api.example.com/1.0/artist/details";
        let first = sign(HttpMethod::Get, url, &params, "consumer", "token");
        let second = sign(HttpMethod::Get, url, &params, "consumer", "token");
        assert_eq!(first, second);
    }

    #[test]
    fn test_signature_varies_with_secrets() {
        let params = parameters(&[("artistId", "1")]);
        let url = "https://api.example.com/1.0/artist/details";
        let original = sign(HttpMethod::Get, url, &params, "consumer", "token");
        assert_ne!(
            original,
            sign(HttpMethod::Get, url, &params, "other", "token")
        );
        assert_ne!(
            original,
            sign(HttpMethod::Get, url, &params, "consumer", "other")
        );
    }

    #[test]
    fn test_signature_varies_with_method() {
        let params = parameters(&[("artistId", "1")]);
        let url = "https://api.example.com/1.0/artist/details";
        assert_ne!(
            sign(HttpMethod::Get, url, &params, "consumer", "token"),
            sign(HttpMethod::Post, url, &params, "consumer", "token")
        );
    }

    #[test]
    fn test_percent_encoding_is_strict() {
        assert_eq!(percent_encode("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(percent_encode("safe-chars_.~"), "safe-chars_.~");
    }
}

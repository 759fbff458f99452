//! Gameflip Authentication - HMAC-SHA256 Request Signing
//!
//! Signs every Gameflip API request with HMAC-SHA256 over
//! `path + method + nonce + body`, keyed by the API secret. A fresh
//! UUID v4 nonce is generated for every signature, retries included.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use uuid::Uuid;

pub const HEADER_API_KEY: &str = "GF-API-KEY";
pub const HEADER_NONCE: &str = "GF-API-NONCE";
pub const HEADER_SIGNATURE: &str = "GF-API-SIGNATURE";

/// Gameflip API credentials and request signer.
pub struct GfAuth {
    /// API key, sent in every request.
    api_key: String,
    /// API secret, only ever used as the HMAC key.
    api_secret: String,
}

impl GfAuth {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Generate a single-use nonce.
    pub fn generate_nonce() -> String {
        Uuid::new_v4().to_string()
    }

    /// Hex-encoded HMAC-SHA256(secret, path + method + nonce + body).
    pub fn sign(&self, path: &str, method: &str, nonce: &str, body: &str) -> String {
        let message = format!("{path}{method}{nonce}{body}");
        let mac = hmac_sha256::HMAC::mac(message.as_bytes(), self.api_secret.as_bytes());
        hex::encode(mac)
    }

    /// Build the full header set for one request with a fresh nonce.
    ///
    /// `body` is the exact string sent on the wire, empty for DELETE.
    pub fn auth_headers(&self, path: &str, method: &str, body: &str) -> Result<HeaderMap> {
        let nonce = Self::generate_nonce();
        let signature = self.sign(path, method, &nonce, body);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HEADER_API_KEY,
            HeaderValue::from_str(&self.api_key).context("API key is not a valid header value")?,
        );
        headers.insert(HEADER_NONCE, HeaderValue::from_str(&nonce)?);
        headers.insert(HEADER_SIGNATURE, HeaderValue::from_str(&signature)?);

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_post_reference_vector() {
        let auth = GfAuth::new("key", "s3cret");
        let sig = auth.sign(
            "/listing",
            "POST",
            "00000000-0000-4000-8000-000000000000",
            r#"{"title":"Sword"}"#,
        );
        assert_eq!(
            sig,
            "4f67287fe8c695eef6ff60297fe8259f665f6c2f3e8ece048eeddcb882ad8413"
        );
    }

    #[test]
    fn test_sign_delete_reference_vector() {
        let auth = GfAuth::new("key", "s3cret");
        let sig = auth.sign(
            "/listing/abc123",
            "DELETE",
            "11111111-1111-4111-8111-111111111111",
            "",
        );
        assert_eq!(
            sig,
            "d24b9353a5ade54599e8b55a9057552afc65bc3bbfc109913dc076aa8681fbf0"
        );
    }

    #[test]
    fn test_headers_carry_signature_of_nonce() {
        let auth = GfAuth::new("key", "s3cret");
        let headers = auth.auth_headers("/listing", "POST", "{}").unwrap();

        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[HEADER_API_KEY], "key");

        let nonce = headers[HEADER_NONCE].to_str().unwrap();
        let expected = auth.sign("/listing", "POST", nonce, "{}");
        assert_eq!(headers[HEADER_SIGNATURE], expected.as_str());
    }

    #[test]
    fn test_fresh_nonce_per_request() {
        let auth = GfAuth::new("key", "s3cret");
        let first = auth.auth_headers("/listing/1", "DELETE", "").unwrap();
        let second = auth.auth_headers("/listing/1", "DELETE", "").unwrap();

        assert_ne!(first[HEADER_NONCE], second[HEADER_NONCE]);
        assert_ne!(first[HEADER_SIGNATURE], second[HEADER_SIGNATURE]);
    }
}

//! HMAC-SHA256 request signing for the Ripio Trade API.
//!
//! Every REST call and the WebSocket handshake are authenticated the same
//! way: the canonical message `timestamp + METHOD + path + payload` (no
//! separators) is signed with the API secret and the raw digest is
//! base64-encoded with the standard alphabet.

use crate::credentials::ApiCredentials;
use crate::error::AuthError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the raw API key.
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// Header carrying the signed timestamp in milliseconds.
pub const HEADER_TIMESTAMP: &str = "timestamp";
/// Header carrying the base64 signature.
pub const HEADER_SIGNATURE: &str = "signature";
/// Content type sent with every authenticated request.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP methods accepted by the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    /// Uppercase wire form used in the canonical message.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the canonical message for a request.
pub fn canonical_message(timestamp_ms: i64, method: HttpMethod, path: &str, payload: &str) -> String {
    format!("{}{}{}{}", timestamp_ms, method.as_str(), path, payload)
}

/// Sign a request with `secret`.
///
/// Pure and deterministic: identical inputs always yield the same signature.
pub fn sign(secret: &str, timestamp_ms: i64, method: HttpMethod, path: &str, payload: &str) -> String {
    hmac_sha256_base64(secret, &canonical_message(timestamp_ms, method, path, payload))
}

fn hmac_sha256_base64(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");

    mac.update(message.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Authentication headers for one request.
///
/// The timestamp stored here is the one that was signed; it must be sent
/// unchanged or the server rejects the signature.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    api_key: String,
    timestamp_ms: i64,
    signature: String,
}

impl AuthHeaders {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Header name/value pairs in the order they are sent.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", CONTENT_TYPE_JSON.to_string()),
            (HEADER_AUTHORIZATION, self.api_key.clone()),
            (HEADER_TIMESTAMP, self.timestamp_ms.to_string()),
            (HEADER_SIGNATURE, self.signature.clone()),
        ]
    }
}

impl fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHeaders")
            .field("api_key", &crate::mask(&self.api_key))
            .field("timestamp_ms", &self.timestamp_ms)
            .field("signature", &self.signature)
            .finish()
    }
}

/// Request signer for authenticated Ripio calls.
pub struct RequestSigner<'a> {
    credentials: &'a ApiCredentials,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer with the given credentials.
    pub fn new(credentials: &'a ApiCredentials) -> Self {
        Self { credentials }
    }

    /// Sign a request with an explicit timestamp.
    pub fn sign(&self, timestamp_ms: i64, method: HttpMethod, path: &str, payload: &str) -> String {
        sign(
            self.credentials.expose_secret(),
            timestamp_ms,
            method,
            path,
            payload,
        )
    }

    /// Build authentication headers stamped with the current time.
    ///
    /// The clock is read exactly once; that value is both signed and
    /// returned in the headers.
    pub fn build_headers(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &str,
    ) -> Result<AuthHeaders, AuthError> {
        self.build_headers_at(method, path, payload, common::now_ms())
    }

    /// Build authentication headers for a given timestamp.
    ///
    /// # Errors
    /// - `InvalidSignatureInput` for an empty secret, or a path that is
    ///   empty or contains whitespace/control characters.
    /// - `InvalidKeyFormat` if the API key is not a valid header value.
    pub fn build_headers_at(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &str,
        timestamp_ms: i64,
    ) -> Result<AuthHeaders, AuthError> {
        validate_inputs(self.credentials, path)?;

        let signature = self.sign(timestamp_ms, method, path, payload);

        tracing::trace!(
            method = %method,
            path = %path,
            timestamp_ms = timestamp_ms,
            payload_len = payload.len(),
            "Signed request"
        );

        Ok(AuthHeaders {
            api_key: self.credentials.api_key().to_string(),
            timestamp_ms,
            signature,
        })
    }
}

fn validate_inputs(credentials: &ApiCredentials, path: &str) -> Result<(), AuthError> {
    if credentials.expose_secret().is_empty() {
        return Err(AuthError::InvalidSignatureInput("empty API secret".into()));
    }

    let key = credentials.api_key();
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(AuthError::InvalidKeyFormat);
    }

    if path.is_empty() {
        return Err(AuthError::InvalidSignatureInput("empty path".into()));
    }
    if path.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(AuthError::InvalidSignatureInput(format!(
            "path contains whitespace or control characters: {:?}",
            path
        )));
    }

    Ok(())
}

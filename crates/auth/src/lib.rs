//! Authentication and signing for the Ripio Trade API.
//!
//! This crate provides secure credential management and request signing
//! shared by every REST call and the WebSocket handshake.
//!
//! # Features
//!
//! - **Secure Credentials**: API secrets are wrapped in `SecretString` to prevent
//!   accidental logging and ensure memory is zeroed on drop.
//! - **HMAC-SHA256 Signing**: `timestamp + METHOD + path + payload`, base64-encoded.
//! - **Environment Loading**: Credentials can be loaded from environment variables
//!   or a `.env` file.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::{ApiCredentials, HttpMethod, RequestSigner};
//!
//! let credentials = ApiCredentials::from_env()?;
//! let signer = RequestSigner::new(&credentials);
//!
//! let payload = r#"{"pair":"BTC_BRL","side":"buy"}"#;
//! let headers = signer.build_headers(HttpMethod::Post, "/v4/orders", payload)?;
//! for (name, value) in headers.to_pairs() {
//!     request = request.header(name, value);
//! }
//! ```

mod credentials;
mod error;
mod signer;

pub use credentials::{mask, ApiCredentials, API_KEY_ENV, API_SECRET_ENV};
pub use error::AuthError;
pub use signer::{
    canonical_message, sign, AuthHeaders, HttpMethod, RequestSigner, CONTENT_TYPE_JSON,
    HEADER_AUTHORIZATION, HEADER_SIGNATURE, HEADER_TIMESTAMP,
};

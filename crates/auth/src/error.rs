use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required environment variable is missing or empty.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The API key cannot be sent as a header value.
    #[error("Invalid API key format")]
    InvalidKeyFormat,

    /// Method, path, payload or secret cannot produce a valid signature.
    #[error("Invalid signature input: {0}")]
    InvalidSignatureInput(String),
}

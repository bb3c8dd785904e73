//! Ripio Trade API key and secret.
//!
//! The secret lives in a `secrecy::SecretString` so it never reaches a log
//! line and is zeroed when dropped.

use crate::error::AuthError;
use secrecy::{ExposeSecret, SecretString};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "RIPIO_API_KEY";

/// Environment variable holding the API secret.
pub const API_SECRET_ENV: &str = "RIPIO_API_SECRET";

/// API credentials for authenticated requests.
///
/// The key is sent verbatim in the `Authorization` header. The secret is
/// only ever used as the HMAC key and is wrapped in `SecretString`, which:
/// - Prevents accidental Debug/Display printing
/// - Zeros memory on drop via zeroize
#[derive(Clone)]
pub struct ApiCredentials {
    api_key: String,
    secret_key: SecretString,
}

impl ApiCredentials {
    /// Load credentials from environment variables.
    ///
    /// Looks for:
    /// - `RIPIO_API_KEY` - The API key
    /// - `RIPIO_API_SECRET` - The API secret
    ///
    /// # Errors
    /// Returns `AuthError::MissingEnvVar` if either variable is unset or empty.
    pub fn from_env() -> Result<Self, AuthError> {
        // A missing .env file is fine
        dotenvy::dotenv().ok();

        let api_key = read_non_empty(API_KEY_ENV)?;
        let secret_key = read_non_empty(API_SECRET_ENV)?;

        Ok(Self::new(api_key, secret_key))
    }

    /// Credentials from explicit values, e.g. a secrets manager or tests.
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key: SecretString::from(secret_key),
        }
    }

    /// Get the API key.
    ///
    /// Prefer [`ApiCredentials::masked_api_key`] when logging.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// API key with everything but a short prefix hidden, for logs.
    pub fn masked_api_key(&self) -> String {
        mask(&self.api_key)
    }

    /// Expose the secret key for signing.
    ///
    /// **WARNING**: Only use this for cryptographic operations.
    /// Never log or display the return value.
    pub fn expose_secret(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.masked_api_key())
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Keep the first few characters of a token and hide the rest.
///
/// Used for API keys and WebSocket tickets in log lines.
pub fn mask(value: &str) -> String {
    const VISIBLE: usize = 4;

    let visible: String = value.chars().take(VISIBLE).collect();
    if value.chars().count() <= VISIBLE {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

fn read_non_empty(name: &str) -> Result<String, AuthError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AuthError::MissingEnvVar(name.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_new() {
        let creds = ApiCredentials::new("my_api_key".into(), "my_secret".into());
        assert_eq!(creds.api_key(), "my_api_key");
        assert_eq!(creds.expose_secret(), "my_secret");
    }

    #[test]
    fn test_debug_redacts_secret_and_masks_key() {
        let creds = ApiCredentials::new("my_api_key".into(), "super_secret_key".into());
        let debug_str = format!("{:?}", creds);

        assert!(debug_str.contains("my_a****"));
        assert!(!debug_str.contains("my_api_key"));
        assert!(!debug_str.contains("super_secret_key"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_mask_short_values() {
        assert_eq!(mask(""), "****");
        assert_eq!(mask("abcd"), "****");
        assert_eq!(mask("abcde"), "abcd****");
    }

    #[test]
    fn test_missing_env_var_is_reported_by_name() {
        let err = read_non_empty("RIPIO_TEST_DEFINITELY_UNSET_VARIABLE").unwrap_err();
        assert!(matches!(
            err,
            AuthError::MissingEnvVar(ref name) if name == "RIPIO_TEST_DEFINITELY_UNSET_VARIABLE"
        ));
    }
}

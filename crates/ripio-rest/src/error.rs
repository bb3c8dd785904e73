//! Ripio REST API error types.

use auth::AuthError;
use rest_client::{ErrorBody, RestError};
use thiserror::Error;

/// Errors that can occur when interacting with the Ripio REST API.
#[derive(Debug, Error)]
pub enum RipioRestError {
    /// REST client error (HTTP status, network, timeout, parse).
    #[error("REST client error: {0}")]
    Rest(#[from] RestError),

    /// Credential or signature input error. Never retried.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Request body could not be serialized.
    #[error("Serialize error: {0}")]
    Serialize(String),

    /// A 200 response lacked a field the caller needs.
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),
}

impl RipioRestError {
    /// HTTP status when the server answered with an error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rest(rest) => rest.status(),
            _ => None,
        }
    }

    /// True when no HTTP response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Rest(rest) if rest.is_transport())
    }

    /// Error body of a non-200 response.
    pub fn error_body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Rest(RestError::Api { body, .. }) => Some(body),
            _ => None,
        }
    }

    /// Ripio's numeric `error_code`, when the error body carries one.
    pub fn error_code(&self) -> Option<i64> {
        self.error_body()
            .and_then(ErrorBody::as_json)
            .and_then(|body| body.get("error_code"))
            .and_then(serde_json::Value::as_i64)
    }

    /// Ripio's human-readable `message`, when the error body carries one.
    pub fn api_message(&self) -> Option<&str> {
        self.error_body()
            .and_then(ErrorBody::as_json)
            .and_then(|body| body.get("message"))
            .and_then(serde_json::Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_accessors() {
        let err = RipioRestError::from(RestError::Api {
            status: 400,
            body: ErrorBody::Json(json!({"error_code": 40002, "message": "Invalid pair"})),
        });

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.error_code(), Some(40002));
        assert_eq!(err.api_message(), Some("Invalid pair"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_raw_body_has_no_code() {
        let err = RipioRestError::from(RestError::Api {
            status: 502,
            body: ErrorBody::Raw("Bad Gateway".into()),
        });

        assert_eq!(err.status(), Some(502));
        assert_eq!(err.error_code(), None);
        assert_eq!(err.api_message(), None);
    }

    #[test]
    fn test_transport_and_auth_errors() {
        let err = RipioRestError::from(RestError::Connection("refused".into()));
        assert!(err.is_transport());
        assert_eq!(err.status(), None);

        let err = RipioRestError::from(AuthError::MissingEnvVar("RIPIO_API_KEY".into()));
        assert!(!err.is_transport());
        assert!(err.to_string().contains("RIPIO_API_KEY"));
    }
}

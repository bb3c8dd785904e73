//! REST client error types.

use std::fmt;
use thiserror::Error;

/// Body of a non-200 response, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// The body parsed as JSON.
    Json(serde_json::Value),
    /// The body was not JSON (or was empty).
    Raw(String),
}

impl ErrorBody {
    /// Parse a response body, falling back to the raw text.
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Raw(text),
        }
    }

    /// Parsed JSON body, if any.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{}", value),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

/// Errors that can occur during REST API calls.
///
/// `Api` means the server answered with an error status; `Timeout` and
/// `Connection` mean no response was received at all.
#[derive(Debug, Error)]
pub enum RestError {
    /// Non-200 response with status code and body.
    #[error("HTTP error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Parsed or raw response body.
        body: ErrorBody,
    },

    /// Request timed out before a response arrived.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Connection error (refused, DNS, TLS, reset).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Failed to parse a 200 response body as JSON.
    #[error("JSON parse error: {0}")]
    Parse(String),

    /// Failed to build the HTTP client or request.
    #[error("Request build error: {0}")]
    RequestBuild(String),
}

impl RestError {
    /// True when no HTTP response was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self, RestError::Timeout(_) | RestError::Connection(_))
    }

    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RestError::Timeout(err.to_string())
        } else if err.is_connect() {
            RestError::Connection(err.to_string())
        } else if err.is_decode() {
            RestError::Parse(err.to_string())
        } else if err.is_builder() {
            RestError::RequestBuild(err.to_string())
        } else if let Some(status) = err.status() {
            RestError::Api {
                status: status.as_u16(),
                body: ErrorBody::Raw(err.to_string()),
            }
        } else {
            RestError::Connection(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_prefers_json() {
        let body = ErrorBody::from_text(r#"{"error_code":40101,"message":"Unauthorized"}"#.into());
        assert_eq!(body.as_json().unwrap()["error_code"], 40101);
    }

    #[test]
    fn test_error_body_falls_back_to_raw() {
        let body = ErrorBody::from_text("<html>Bad Gateway</html>".into());
        assert_eq!(body, ErrorBody::Raw("<html>Bad Gateway</html>".into()));
        assert_eq!(body.to_string(), "<html>Bad Gateway</html>");
    }

    #[test]
    fn test_classification() {
        let api = RestError::Api {
            status: 401,
            body: ErrorBody::Raw(String::new()),
        };
        assert!(!api.is_transport());
        assert_eq!(api.status(), Some(401));

        assert!(RestError::Connection("refused".into()).is_transport());
        assert!(RestError::Timeout("30s".into()).is_transport());
        assert!(!RestError::Parse("eof".into()).is_transport());
        assert_eq!(RestError::Timeout("30s".into()).status(), None);
    }
}

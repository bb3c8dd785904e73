//! Generic REST client wrapper around reqwest.

use crate::error::{ErrorBody, RestError};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Generic REST client for making HTTP requests.
///
/// Only HTTP 200 counts as success; every other status becomes
/// `RestError::Api`. Nothing is retried.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    /// Create a new REST client with the given base URL.
    ///
    /// # Arguments
    /// * `base_url` - Scheme and host for all requests (e.g., "https://api.ripiotrade.co")
    /// * `timeout` - Request timeout duration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RestError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RestError::RequestBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new REST client with default timeout.
    pub fn with_default_timeout(base_url: &str) -> Result<Self, RestError> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request.
    ///
    /// # Arguments
    /// * `path` - Request path (e.g., "/v4/orders")
    /// * `query` - Query parameters, url-encoded and appended to the URL
    /// * `headers` - Headers to attach (authentication, content type)
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        headers: &[(&str, String)],
    ) -> Result<T, RestError> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, params = query.len(), "GET request");

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        self.execute(request, headers).await
    }

    /// Make a POST request with an optional pre-serialized body.
    ///
    /// The body is sent byte-for-byte as given.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<String>,
        headers: &[(&str, String)],
    ) -> Result<T, RestError> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "POST request");

        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.body(body);
        }

        self.execute(request, headers).await
    }

    /// Make a DELETE request with an optional pre-serialized body.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<String>,
        headers: &[(&str, String)],
    ) -> Result<T, RestError> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "DELETE request");

        let mut request = self.client.delete(&url);
        if let Some(body) = body {
            request = request.body(body);
        }

        self.execute(request, headers).await
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        mut request: RequestBuilder,
        headers: &[(&str, String)],
    ) -> Result<T, RestError> {
        for (key, value) in headers {
            request = request.header(*key, value.as_str());
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle HTTP response and deserialize JSON body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, RestError> {
        let status = response.status();

        if status == StatusCode::OK {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                tracing::warn!(body = %body, error = %e, "Failed to parse response");
                RestError::Parse(e.to_string())
            })
        } else {
            let body = ErrorBody::from_text(response.text().await.unwrap_or_default());

            tracing::warn!(status = status.as_u16(), body = %body, "API request failed");

            Err(RestError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    #[test]
    fn test_build_url() {
        let client = RestClient::with_default_timeout("https://api.example.com").unwrap();
        assert_eq!(
            client.build_url("/v4/orders"),
            "https://api.example.com/v4/orders"
        );
    }

    #[test]
    fn test_build_url_strips_trailing_slash() {
        let client = RestClient::with_default_timeout("https://api.example.com/").unwrap();
        assert_eq!(client.build_url("/v4/time"), "https://api.example.com/v4/time");
    }

    #[tokio::test]
    async fn test_get_sends_query_and_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v4/orders")
                    .query_param("pair", "BTC_BRL")
                    .query_param("limit", "5")
                    .header("Authorization", "key");
                then.status(200).json_body(json!({"data": {"orders": []}}));
            })
            .await;

        let client = RestClient::with_default_timeout(&server.base_url()).unwrap();
        let query = [("pair", "BTC_BRL".to_string()), ("limit", "5".to_string())];
        let headers = [("Authorization", "key".to_string())];

        let body: Value = client.get("/v4/orders", &query, &headers).await.unwrap();

        mock.assert_async().await;
        assert_eq!(body["data"]["orders"], json!([]));
    }

    #[tokio::test]
    async fn test_post_sends_body_verbatim() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v4/orders")
                    .body(r#"{"pair":"BTCUSD","side":"buy"}"#);
                then.status(200).json_body(json!({"data": {"id": "abc"}}));
            })
            .await;

        let client = RestClient::with_default_timeout(&server.base_url()).unwrap();
        let body: Value = client
            .post(
                "/v4/orders",
                Some(r#"{"pair":"BTCUSD","side":"buy"}"#.to_string()),
                &[],
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body["data"]["id"], "abc");
    }

    #[tokio::test]
    async fn test_non_200_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/v4/orders");
                then.status(202).body("accepted");
            })
            .await;

        let client = RestClient::with_default_timeout(&server.base_url()).unwrap();
        let err = client
            .delete::<Value>("/v4/orders", None, &[])
            .await
            .unwrap_err();

        match err {
            RestError::Api { status, body } => {
                assert_eq!(status, 202);
                assert_eq!(body, ErrorBody::Raw("accepted".into()));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_json_error_body_is_preserved() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v4/user/balances");
                then.status(401)
                    .json_body(json!({"error_code": 40101, "message": "Invalid signature"}));
            })
            .await;

        let client = RestClient::with_default_timeout(&server.base_url()).unwrap();
        let err = client
            .get::<Value>("/v4/user/balances", &[], &[])
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(!err.is_transport());
        if let RestError::Api { body, .. } = err {
            assert_eq!(body.as_json().unwrap()["message"], "Invalid signature");
        }
    }

    #[tokio::test]
    async fn test_invalid_json_on_200_is_parse_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v4/ticker");
                then.status(200).body("not json");
            })
            .await;

        let client = RestClient::with_default_timeout(&server.base_url()).unwrap();
        let err = client.get::<Value>("/v4/ticker", &[], &[]).await.unwrap_err();

        assert!(matches!(err, RestError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = RestClient::new(&format!("http://127.0.0.1:{}", port), Duration::from_secs(5))
            .unwrap();
        let err = client.get::<Value>("/v4/orders", &[], &[]).await.unwrap_err();

        assert!(err.is_transport(), "expected transport error, got {:?}", err);
        assert_eq!(err.status(), None);
    }
}

//! Immutable API configuration.
//!
//! Hosts, the version segment and WebSocket tuning live in one value that is
//! handed to each client at construction, so several environments or
//! credentials can coexist in a single process.

use crate::environment::RipioEnvironment;
use std::time::Duration;

/// Version segment prefixed to every REST endpoint (and to the signed path).
pub const DEFAULT_API_VERSION: &str = "/v4";

/// Logical path signed for the WebSocket handshake.
pub const DEFAULT_WS_AUTH_PATH: &str = "ws";

/// Default REST request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default WebSocket connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default wait for a single WebSocket receive attempt.
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);

/// Default number of receive attempts after subscribing.
pub const DEFAULT_RECEIVE_ATTEMPTS: u32 = 3;

/// Connection settings for the Ripio Trade REST and WebSocket APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    environment: RipioEnvironment,
    rest_base_url: String,
    api_version: String,
    ws_url: String,
    ws_auth_path: String,
    request_timeout: Duration,
    connect_timeout: Duration,
    receive_timeout: Duration,
    receive_attempts: u32,
    topics: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::for_environment(RipioEnvironment::default())
    }
}

impl ApiConfig {
    /// Build the default configuration for an environment.
    pub fn for_environment(environment: RipioEnvironment) -> Self {
        Self {
            environment,
            rest_base_url: environment.rest_base_url().to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            ws_url: environment.ws_url().to_string(),
            ws_auth_path: DEFAULT_WS_AUTH_PATH.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
            receive_attempts: DEFAULT_RECEIVE_ATTEMPTS,
            topics: vec!["balance".to_string()],
        }
    }

    /// Configuration for the environment named by `RIPIO_ENVIRONMENT`.
    pub fn from_env() -> Self {
        Self::for_environment(RipioEnvironment::from_env())
    }

    /// Override the REST host. Marks the config as `Custom`.
    pub fn with_rest_base_url(mut self, url: impl Into<String>) -> Self {
        self.rest_base_url = url.into().trim_end_matches('/').to_string();
        self.environment = RipioEnvironment::Custom;
        self
    }

    /// Override the WebSocket endpoint. Marks the config as `Custom`.
    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self.environment = RipioEnvironment::Custom;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    pub fn with_receive_attempts(mut self, attempts: u32) -> Self {
        self.receive_attempts = attempts;
        self
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn environment(&self) -> RipioEnvironment {
        self.environment
    }

    pub fn rest_base_url(&self) -> &str {
        &self.rest_base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    pub fn ws_auth_path(&self) -> &str {
        &self.ws_auth_path
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn receive_timeout(&self) -> Duration {
        self.receive_timeout
    }

    pub fn receive_attempts(&self) -> u32 {
        self.receive_attempts
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Path that gets signed for an endpoint: version segment + endpoint.
    ///
    /// `/orders` becomes `/v4/orders`.
    pub fn signed_path(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_version, endpoint)
    }

    /// Full request URL for an endpoint: host + signed path.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.rest_base_url, self.signed_path(endpoint))
    }
}

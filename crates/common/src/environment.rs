//! Ripio environment selection.
//!
//! Ripio Trade only exposes a production deployment; `Custom` exists so the
//! client can be pointed at a proxy or a local test server.

use std::fmt;
use std::str::FromStr;

/// Ripio Trade environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RipioEnvironment {
    /// Production environment (real money).
    #[default]
    Production,
    /// Hosts supplied explicitly through `ApiConfig::with_*` overrides.
    Custom,
}

impl RipioEnvironment {
    /// REST API host (scheme + host, no version segment).
    pub fn rest_base_url(&self) -> &'static str {
        match self {
            Self::Production | Self::Custom => "https://api.ripiotrade.co",
        }
    }

    /// WebSocket streaming endpoint.
    pub fn ws_url(&self) -> &'static str {
        match self {
            Self::Production | Self::Custom => "wss://ws.ripiotrade.co",
        }
    }

    /// Returns true if this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Load environment from `RIPIO_ENVIRONMENT` env var.
    ///
    /// Returns `Production` if not set or invalid.
    pub fn from_env() -> Self {
        std::env::var("RIPIO_ENVIRONMENT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for RipioEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for RipioEnvironment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" | "mainnet" | "main" => Ok(Self::Production),
            "custom" | "local" => Ok(Self::Custom),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

/// Error parsing environment string.
#[derive(Debug, Clone)]
pub struct ParseEnvironmentError(String);

impl fmt::Display for ParseEnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid environment '{}', expected 'production' or 'custom'",
            self.0
        )
    }
}

impl std::error::Error for ParseEnvironmentError {}

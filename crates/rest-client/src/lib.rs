//! Generic REST client infrastructure.
//!
//! This crate provides a thin wrapper around `reqwest` with:
//!
//! - Consistent error handling via `RestError`
//! - GET with query parameters, POST/DELETE with a pre-serialized body
//! - JSON response deserialization
//! - Header injection for authentication
//! - A clear split between "server answered with an error" (`RestError::Api`)
//!   and "no response at all" (`RestError::is_transport`)
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_client::RestClient;
//! use serde_json::Value;
//!
//! let client = RestClient::with_default_timeout("https://api.ripiotrade.co")?;
//! let book: Value = client
//!     .get("/v4/book/orders/level-2", &[("pair", "BTC_BRL".to_string())], &[])
//!     .await?;
//! ```

mod client;
mod error;

pub use client::RestClient;
pub use error::{ErrorBody, RestError};

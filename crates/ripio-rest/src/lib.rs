//! Ripio Trade REST API client.
//!
//! This crate provides a typed client for the Ripio Trade v4 REST API with:
//!
//! - **Authenticated transport**: every call is signed with a fresh timestamp;
//!   the signed path is `/v4` + endpoint and the request goes to host + path
//! - **Exact payloads**: bodies are serialized once to compact JSON and that
//!   same string is both signed and sent
//! - **Orders**: create, cancel and list
//! - **Withdrawals**: fee estimate, create, status and list
//! - **Market data**: level-2 order book snapshots
//! - **WebSocket tickets**: short-lived tokens for private channels
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::ApiCredentials;
//! use ripio_rest::{NewOrder, OrderSide, RipioRestClient};
//! use rust_decimal_macros::dec;
//!
//! let credentials = ApiCredentials::from_env()?;
//! let client = RipioRestClient::new(credentials)?;
//!
//! let order = NewOrder::limit("USDC_ARS", OrderSide::Buy, dec!(10), dec!(1200)).post_only();
//! let placed = client.create_order(&order).await?;
//! client.cancel_order(&placed.id).await?;
//! ```

mod client;
mod error;
mod requests;
mod responses;

pub use client::RipioRestClient;
pub use error::RipioRestError;
pub use requests::{
    CancelOrder, NewOrder, NewWithdrawal, OrderQuery, OrderSide, OrderType, WithdrawalQuery,
};
pub use responses::{
    ApiResponse, Balance, BookLevel, Order, OrderBook, OrderPage, Pagination, Withdrawal,
    WithdrawalFee, WithdrawalPage,
};

//! Ripio Trade REST API client.

use crate::error::RipioRestError;
use crate::requests::{CancelOrder, NewOrder, NewWithdrawal, OrderQuery, WithdrawalQuery};
use crate::responses::{
    ApiResponse, Balance, Order, OrderBook, OrderPage, Withdrawal, WithdrawalFee, WithdrawalPage,
};
use auth::{mask, ApiCredentials, AuthError, AuthHeaders, HttpMethod, RequestSigner};
use common::ApiConfig;
use rest_client::RestClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A request after signing, before dispatch.
#[derive(Debug)]
pub(crate) struct PreparedRequest {
    /// Version segment + endpoint; this is what gets signed.
    pub(crate) path: String,
    /// Compact JSON body, empty when there is none. Sent exactly as signed.
    pub(crate) payload: String,
    pub(crate) headers: AuthHeaders,
}

/// Ripio Trade REST API client with authentication support.
///
/// Every call is signed independently with a fresh timestamp, so a single
/// client can be shared across tasks behind an `Arc`.
pub struct RipioRestClient {
    client: RestClient,
    credentials: ApiCredentials,
    config: ApiConfig,
}

impl RipioRestClient {
    /// Create a client for the production environment.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(credentials: ApiCredentials) -> Result<Self, RipioRestError> {
        Self::with_config(credentials, ApiConfig::default())
    }

    /// Create a client with an explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_config(
        credentials: ApiCredentials,
        config: ApiConfig,
    ) -> Result<Self, RipioRestError> {
        let client = RestClient::new(config.rest_base_url(), config.request_timeout())?;

        Ok(Self {
            client,
            credentials,
            config,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn credentials(&self) -> &ApiCredentials {
        &self.credentials
    }

    /// Perform one authenticated call and return the parsed JSON body.
    ///
    /// `endpoint` is relative to the version segment (e.g. `/orders`).
    /// `query` is only allowed on GET and is not signed; `body` is only
    /// allowed on POST/DELETE and is serialized once, signed and sent as is.
    ///
    /// # Errors
    /// - `Rest(RestError::Api { .. })` for any non-200 status
    /// - `Rest(..)` with `is_transport()` when no response was received
    /// - `Auth(InvalidSignatureInput)` for malformed call-site input
    pub async fn call(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, RipioRestError> {
        self.send(method, endpoint, query, body).await
    }

    pub(crate) fn prepare<B>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<PreparedRequest, RipioRestError>
    where
        B: Serialize + ?Sized,
    {
        if !endpoint.starts_with('/') {
            return Err(AuthError::InvalidSignatureInput(format!(
                "endpoint must start with '/': {:?}",
                endpoint
            ))
            .into());
        }

        let payload = match (method, body) {
            (HttpMethod::Get, Some(_)) => {
                return Err(
                    AuthError::InvalidSignatureInput("GET requests cannot carry a body".into())
                        .into(),
                );
            }
            (_, Some(body)) => {
                serde_json::to_string(body).map_err(|e| RipioRestError::Serialize(e.to_string()))?
            }
            (_, None) => String::new(),
        };

        if method != HttpMethod::Get && !query.is_empty() {
            return Err(AuthError::InvalidSignatureInput(format!(
                "query parameters are only sent with GET, got {}",
                method
            ))
            .into());
        }

        let path = self.config.signed_path(endpoint);
        let headers = RequestSigner::new(&self.credentials).build_headers(method, &path, &payload)?;

        Ok(PreparedRequest {
            path,
            payload,
            headers,
        })
    }

    async fn send<T, B>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, RipioRestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let PreparedRequest {
            path,
            payload,
            headers,
        } = self.prepare(method, endpoint, query, body)?;

        let headers = headers.to_pairs();
        let body = (!payload.is_empty()).then_some(payload);

        let response = match method {
            HttpMethod::Get => self.client.get(&path, query, &headers).await?,
            HttpMethod::Post => self.client.post(&path, body, &headers).await?,
            HttpMethod::Delete => self.client.delete(&path, body, &headers).await?,
        };

        Ok(response)
    }

    // ========================================================================
    // Account
    // ========================================================================

    /// Get account balances.
    ///
    /// GET /user/balances/
    pub async fn get_balances(&self) -> Result<Vec<Balance>, RipioRestError> {
        let response: ApiResponse<Vec<Balance>> = self
            .send::<_, ()>(HttpMethod::Get, "/user/balances/", &[], None)
            .await?;

        tracing::debug!(currencies = response.data.len(), "Balances received");
        Ok(response.data)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Place a new order.
    ///
    /// POST /orders
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, RipioRestError> {
        tracing::info!(
            pair = %order.pair,
            side = %order.side,
            order_type = %order.order_type,
            amount = %order.amount,
            price = ?order.price,
            "Placing order"
        );

        let response: ApiResponse<Order> = self
            .send(HttpMethod::Post, "/orders", &[], Some(order))
            .await?;

        tracing::info!(
            order_id = %response.data.id,
            status = ?response.data.status,
            "Order placed"
        );

        Ok(response.data)
    }

    /// Cancel an order by id.
    ///
    /// DELETE /orders with body `{"id": ...}`
    pub async fn cancel_order(&self, order_id: &str) -> Result<Order, RipioRestError> {
        tracing::info!(order_id = %order_id, "Canceling order");

        let response: ApiResponse<Order> = self
            .send(
                HttpMethod::Delete,
                "/orders",
                &[],
                Some(&CancelOrder { id: order_id }),
            )
            .await?;

        tracing::info!(
            order_id = %response.data.id,
            status = ?response.data.status,
            "Order canceled"
        );

        Ok(response.data)
    }

    /// List the user's orders.
    ///
    /// GET /orders
    pub async fn list_orders(&self, filter: &OrderQuery) -> Result<OrderPage, RipioRestError> {
        let query = filter.to_query();
        tracing::debug!(filters = ?query, "Listing orders");

        let response: ApiResponse<OrderPage> = self
            .send::<_, ()>(HttpMethod::Get, "/orders", &query, None)
            .await?;

        Ok(response.data)
    }

    // ========================================================================
    // Market Data
    // ========================================================================

    /// Level-2 order book snapshot.
    ///
    /// GET /book/orders/level-2
    pub async fn order_book_level2(
        &self,
        pair: &str,
        limit: Option<u32>,
        aggregation: Option<&str>,
    ) -> Result<OrderBook, RipioRestError> {
        let mut query = vec![("pair", pair.to_string())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(aggregation) = aggregation {
            query.push(("aggregation", aggregation.to_string()));
        }

        let response: ApiResponse<OrderBook> = self
            .send::<_, ()>(HttpMethod::Get, "/book/orders/level-2", &query, None)
            .await?;

        tracing::debug!(
            pair = %pair,
            bid_levels = response.data.bids.len(),
            ask_levels = response.data.asks.len(),
            "Order book received"
        );

        Ok(response.data)
    }

    // ========================================================================
    // Withdrawals
    // ========================================================================

    /// Estimated network fee for withdrawing `currency_code`.
    ///
    /// GET /withdrawals/estimate-fee/{currency_code}
    pub async fn estimate_withdrawal_fee(
        &self,
        currency_code: &str,
    ) -> Result<WithdrawalFee, RipioRestError> {
        let endpoint = format!("/withdrawals/estimate-fee/{}", path_segment(currency_code)?);

        let response: ApiResponse<WithdrawalFee> = self
            .send::<_, ()>(HttpMethod::Get, &endpoint, &[], None)
            .await?;

        Ok(response.data)
    }

    /// Request a crypto withdrawal.
    ///
    /// POST /withdrawals
    pub async fn create_withdrawal(
        &self,
        withdrawal: &NewWithdrawal,
    ) -> Result<Withdrawal, RipioRestError> {
        tracing::info!(
            currency = %withdrawal.currency_code,
            amount = %withdrawal.amount,
            network = ?withdrawal.network,
            "Creating withdrawal"
        );

        let response: ApiResponse<Withdrawal> = self
            .send(HttpMethod::Post, "/withdrawals", &[], Some(withdrawal))
            .await?;

        tracing::info!(
            withdrawal_id = %response.data.id,
            status = ?response.data.status,
            "Withdrawal created"
        );

        Ok(response.data)
    }

    /// Get one withdrawal by id.
    ///
    /// GET /withdrawals/{id}
    pub async fn get_withdrawal(&self, withdrawal_id: &str) -> Result<Withdrawal, RipioRestError> {
        let endpoint = format!("/withdrawals/{}", path_segment(withdrawal_id)?);

        let response: ApiResponse<Withdrawal> = self
            .send::<_, ()>(HttpMethod::Get, &endpoint, &[], None)
            .await?;

        Ok(response.data)
    }

    /// List withdrawals.
    ///
    /// GET /withdrawals
    pub async fn list_withdrawals(
        &self,
        filter: &WithdrawalQuery,
    ) -> Result<WithdrawalPage, RipioRestError> {
        let query = filter.to_query();

        let response: ApiResponse<WithdrawalPage> = self
            .send::<_, ()>(HttpMethod::Get, "/withdrawals", &query, None)
            .await?;

        tracing::debug!(
            count = response.data.withdrawals.len(),
            total = ?response.data.pagination.as_ref().and_then(|p| p.registers_count),
            "Withdrawals listed"
        );

        Ok(response.data)
    }

    // ========================================================================
    // WebSocket Ticket
    // ========================================================================

    /// Obtain a short-lived WebSocket ticket.
    ///
    /// POST /ticket with an empty payload; the ticket is read from
    /// `data.ticket`.
    pub async fn create_ticket(&self) -> Result<String, RipioRestError> {
        let response: Value = self
            .send::<_, ()>(HttpMethod::Post, "/ticket", &[], None)
            .await?;

        let ticket = response
            .get("data")
            .and_then(|data| data.get("ticket"))
            .and_then(Value::as_str)
            .filter(|ticket| !ticket.is_empty())
            .ok_or(RipioRestError::MissingField("data.ticket"))?;

        tracing::info!(ticket = %mask(ticket), "Obtained WebSocket ticket");
        Ok(ticket.to_string())
    }
}

impl std::fmt::Debug for RipioRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RipioRestClient")
            .field("environment", &self.config.environment())
            .field("base_url", &self.config.rest_base_url())
            .field("api_key", &self.credentials.masked_api_key())
            .finish()
    }
}

/// Check that a caller-supplied value can be used as one path segment.
fn path_segment(value: &str) -> Result<&str, AuthError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(value)
    } else {
        Err(AuthError::InvalidSignatureInput(format!(
            "invalid path segment: {:?}",
            value
        )))
    }
}

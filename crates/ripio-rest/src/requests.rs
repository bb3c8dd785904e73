//! Request parameter types for Ripio Trade endpoints.
//!
//! Body types serialize in field order with unset optional fields omitted,
//! so the compact JSON produced by `serde_json::to_string` is exactly what
//! gets signed and sent.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "limit",
            Self::Market => "market",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of POST /orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub pair: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub post_only: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub immediate_or_cancel: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub fill_or_kill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<i64>,
}

impl NewOrder {
    /// Limit order at `price`.
    pub fn limit(pair: impl Into<String>, side: OrderSide, amount: Decimal, price: Decimal) -> Self {
        Self {
            pair: pair.into(),
            side,
            order_type: OrderType::Limit,
            amount,
            price: Some(price),
            external_id: None,
            post_only: false,
            immediate_or_cancel: false,
            fill_or_kill: false,
            expiration: None,
        }
    }

    /// Market order for `amount`.
    pub fn market(pair: impl Into<String>, side: OrderSide, amount: Decimal) -> Self {
        Self {
            order_type: OrderType::Market,
            price: None,
            ..Self::limit(pair, side, amount, Decimal::ZERO)
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Rest on the book without matching.
    pub fn post_only(mut self) -> Self {
        self.post_only = true;
        self
    }

    pub fn immediate_or_cancel(mut self) -> Self {
        self.immediate_or_cancel = true;
        self
    }

    pub fn fill_or_kill(mut self) -> Self {
        self.fill_or_kill = true;
        self
    }

    /// Expiration as a Unix timestamp.
    pub fn with_expiration(mut self, expiration: i64) -> Self {
        self.expiration = Some(expiration);
        self
    }
}

/// Body of DELETE /orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelOrder<'a> {
    pub id: &'a str,
}

/// Filters for GET /orders. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub status: Option<String>,
    pub pair: Option<String>,
    pub side: Option<OrderSide>,
    pub order_type: Option<OrderType>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl OrderQuery {
    /// All orders for a pair.
    pub fn for_pair(pair: impl Into<String>) -> Self {
        Self {
            pair: Some(pair.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        push_opt(&mut query, "status", self.status.as_ref());
        push_opt(&mut query, "pair", self.pair.as_ref());
        push_opt(&mut query, "side", self.side.map(|s| s.as_str()));
        push_opt(&mut query, "type", self.order_type.map(|t| t.as_str()));
        push_opt(&mut query, "start_time", self.start_time.as_ref());
        push_opt(&mut query, "end_time", self.end_time.as_ref());
        push_opt(&mut query, "limit", self.limit);
        push_opt(&mut query, "offset", self.offset);
        query
    }
}

/// Body of POST /withdrawals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWithdrawal {
    pub currency_code: String,
    pub amount: Decimal,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl NewWithdrawal {
    pub fn new(
        currency_code: impl Into<String>,
        amount: Decimal,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            currency_code: currency_code.into(),
            amount,
            destination: destination.into(),
            network: None,
            tag: None,
            memo: None,
            external_id: None,
        }
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Destination tag for currencies that need one (e.g. XRP).
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

/// Filters for GET /withdrawals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalQuery {
    pub currency_code: Option<String>,
    pub status: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for WithdrawalQuery {
    fn default() -> Self {
        Self {
            currency_code: None,
            status: None,
            from_date: None,
            to_date: None,
            limit: 10,
            offset: 0,
        }
    }
}

impl WithdrawalQuery {
    pub fn for_currency(currency_code: impl Into<String>) -> Self {
        Self {
            currency_code: Some(currency_code.into()),
            ..Self::default()
        }
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        push_opt(&mut query, "currency_code", self.currency_code.as_ref());
        push_opt(&mut query, "status", self.status.as_ref());
        push_opt(&mut query, "from_date", self.from_date.as_ref());
        push_opt(&mut query, "to_date", self.to_date.as_ref());
        query
    }
}

fn push_opt<V: ToString>(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<V>) {
    if let Some(v) = value {
        query.push((key, v.to_string()));
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_limit_order_serializes_compact_in_field_order() {
        let order = NewOrder::limit("USDC_ARS", OrderSide::Buy, dec!(10), dec!(1200))
            .with_external_id("test-1700000000")
            .post_only();

        assert_eq!(
            serde_json::to_string(&order).unwrap(),
            r#"{"pair":"USDC_ARS","side":"buy","type":"limit","amount":"10","price":"1200","external_id":"test-1700000000","post_only":true}"#
        );
    }

    #[test]
    fn test_market_order_omits_price_and_flags() {
        let order = NewOrder::market("BTC_BRL", OrderSide::Sell, dec!(0.001));

        assert_eq!(
            serde_json::to_string(&order).unwrap(),
            r#"{"pair":"BTC_BRL","side":"sell","type":"market","amount":"0.001"}"#
        );
    }

    #[test]
    fn test_cancel_order_body() {
        let body = CancelOrder { id: "0B4A9B2F-1A2B" };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"id":"0B4A9B2F-1A2B"}"#);
    }

    #[test]
    fn test_order_query_only_sends_set_fields() {
        let query = OrderQuery::for_pair("USDC_ARS")
            .with_side(OrderSide::Buy)
            .with_limit(5)
            .to_query();

        assert_eq!(
            query,
            vec![
                ("pair", "USDC_ARS".to_string()),
                ("side", "buy".to_string()),
                ("limit", "5".to_string()),
            ]
        );
        assert!(OrderQuery::default().to_query().is_empty());
    }

    #[test]
    fn test_withdrawal_body_field_order() {
        let withdrawal = NewWithdrawal::new("XRP", dec!(25.5), "rDestination")
            .with_network("ripple")
            .with_tag("12345");

        assert_eq!(
            serde_json::to_string(&withdrawal).unwrap(),
            r#"{"currency_code":"XRP","amount":"25.5","destination":"rDestination","network":"ripple","tag":"12345"}"#
        );
    }

    #[test]
    fn test_withdrawal_query_defaults() {
        let query = WithdrawalQuery::default().to_query();
        assert_eq!(
            query,
            vec![("limit", "10".to_string()), ("offset", "0".to_string())]
        );

        let query = WithdrawalQuery::for_currency("BTC").to_query();
        assert_eq!(query[2], ("currency_code", "BTC".to_string()));
    }
}

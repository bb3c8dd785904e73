//! Ripio Trade API response types.
//!
//! Every endpoint wraps its payload as `{"data": ...}`. Fields the client
//! does not depend on are optional so that schema additions on the server
//! side do not break deserialization.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// One entry of GET /user/balances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub currency_code: String,
    #[serde(default)]
    pub available_amount: Decimal,
    #[serde(default)]
    pub locked_amount: Decimal,
    #[serde(default)]
    pub last_update: Option<String>,
}

/// An order as returned by create, cancel and list calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub pair: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(rename = "type", default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub filled_amount: Option<Decimal>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Paging metadata attached to list responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub registers_count: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Data of GET /orders.
///
/// Anything besides `orders` and `pagination` is kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One aggregated price level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub amount: Decimal,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Data of GET /book/orders/level-2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub pair: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub bids: Vec<BookLevel>,
    #[serde(default)]
    pub asks: Vec<BookLevel>,
}

/// Data of GET /withdrawals/estimate-fee/{currency}.
///
/// Fields other than `amount` and `network` are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalFee {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A withdrawal as returned by create, get and list calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Withdrawal {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub destination_address: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Data of GET /withdrawals.
///
/// The server answers either `{"withdrawals": [...], "pagination": {...}}`
/// or a bare list; both end up here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "WithdrawalListing")]
pub struct WithdrawalPage {
    pub withdrawals: Vec<Withdrawal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WithdrawalListing {
    Paged {
        withdrawals: Vec<Withdrawal>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
    Bare(Vec<Withdrawal>),
}

impl From<WithdrawalListing> for WithdrawalPage {
    fn from(listing: WithdrawalListing) -> Self {
        match listing {
            WithdrawalListing::Paged {
                withdrawals,
                pagination,
            } => Self {
                withdrawals,
                pagination,
            },
            WithdrawalListing::Bare(withdrawals) => Self {
                withdrawals,
                pagination: None,
            },
        }
    }
}

/// Deserialize an identifier that may arrive as a string or a number.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_balances() {
        let json = r#"{
            "data": [
                {"currency_code": "BTC", "available_amount": 0.5, "locked_amount": "0.1", "last_update": "2024-01-01T00:00:00Z"},
                {"currency_code": "ARS", "available_amount": "1500.25", "locked_amount": 0}
            ],
            "message": null
        }"#;

        let response: ApiResponse<Vec<Balance>> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].available_amount, dec!(0.5));
        assert_eq!(response.data[0].locked_amount, dec!(0.1));
        assert_eq!(response.data[1].available_amount, dec!(1500.25));
        assert!(response.data[1].last_update.is_none());
    }

    #[test]
    fn test_deserialize_order_page() {
        let json = r#"{
            "data": {
                "orders": [{
                    "id": "F55E4E01-9980-44D4-9F0D-DA9B9D2A6E1D",
                    "pair": "USDC_ARS",
                    "side": "buy",
                    "type": "limit",
                    "status": "open",
                    "price": 1200,
                    "amount": "10",
                    "filled_amount": 0,
                    "created_at": "2024-03-01T12:00:00.000Z"
                }]
            }
        }"#;

        let response: ApiResponse<OrderPage> = serde_json::from_str(json).unwrap();
        let order = &response.data.orders[0];
        assert_eq!(order.id, "F55E4E01-9980-44D4-9F0D-DA9B9D2A6E1D");
        assert_eq!(order.order_type.as_deref(), Some("limit"));
        assert_eq!(order.price, Some(dec!(1200)));
        assert_eq!(order.filled_amount, Some(dec!(0)));
    }

    #[test]
    fn test_order_page_keeps_pagination() {
        let json = r#"{
            "orders": [],
            "pagination": {"current_page": 2, "total_pages": 5, "registers_count": 93},
            "next_offset": 40
        }"#;

        let page: OrderPage = serde_json::from_str(json).unwrap();
        let pagination = page.pagination.unwrap();
        assert_eq!(pagination.current_page, Some(2));
        assert_eq!(pagination.registers_count, Some(93));
        assert_eq!(page.extra["next_offset"], 40);
    }

    #[test]
    fn test_withdrawal_page_accepts_both_shapes() {
        let paged = r#"{
            "withdrawals": [{"id": 1, "status": "pending"}],
            "pagination": {"registers_count": 1, "page_size": 10}
        }"#;
        let page: WithdrawalPage = serde_json::from_str(paged).unwrap();
        assert_eq!(page.withdrawals[0].id, "1");
        let pagination = page.pagination.unwrap();
        assert_eq!(pagination.registers_count, Some(1));
        assert_eq!(pagination.extra["page_size"], 10);

        let bare = r#"[{"id": "w-7", "amount": "0.5"}]"#;
        let page: WithdrawalPage = serde_json::from_str(bare).unwrap();
        assert_eq!(page.withdrawals[0].amount, Some(dec!(0.5)));
        assert!(page.pagination.is_none());
    }

    #[test]
    fn test_cancelled_order_only_needs_id() {
        let json = r#"{"data": {"id": "abc", "status": "canceled"}}"#;
        let response: ApiResponse<Order> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.id, "abc");
        assert_eq!(response.data.status.as_deref(), Some("canceled"));
        assert!(response.data.pair.is_none());
    }

    #[test]
    fn test_numeric_withdrawal_id() {
        let json = r#"{"id": 98765, "status": "pending", "amount": "0.01", "currency_code": "BTC"}"#;
        let withdrawal: Withdrawal = serde_json::from_str(json).unwrap();
        assert_eq!(withdrawal.id, "98765");
        assert_eq!(withdrawal.amount, Some(dec!(0.01)));
    }

    #[test]
    fn test_withdrawal_fee_keeps_extra_fields() {
        let json = r#"{"amount": "0.0002", "network": "bitcoin", "min_amount": "0.001"}"#;
        let fee: WithdrawalFee = serde_json::from_str(json).unwrap();
        assert_eq!(fee.amount, Some(dec!(0.0002)));
        assert_eq!(fee.network.as_deref(), Some("bitcoin"));
        assert_eq!(fee.extra["min_amount"], "0.001");
    }

    #[test]
    fn test_deserialize_order_book() {
        let json = r#"{
            "pair": "BTC_BRL",
            "timestamp": 1700000000000,
            "bids": [{"price": 350000.5, "amount": 0.2, "count": 3}],
            "asks": [{"price": "350100", "amount": "0.15"}]
        }"#;

        let book: OrderBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.bids[0].count, Some(3));
        assert_eq!(book.asks[0].price, dec!(350100));
        assert!(book.asks[0].count.is_none());
    }
}

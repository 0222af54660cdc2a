use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Order side as reported by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Order type as reported by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

/// One order row from `GET /v1/stateless/orders`.
///
/// Market orders carry no price of their own; the sampler assigns them the
/// touch on their side.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub contract_id: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub price: Option<f64>,
    pub quantity: f64,
    pub placed_at: DateTime<Utc>,
}

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, instrument};

use super::OrderSource;
use super::errors::FeedError;
use super::types::OrderRecord;
use crate::types::Instrument;

/// Thin HTTP client for the exchange's stateless order query API.
#[derive(Clone)]
pub struct ExchangeClient {
    http: Client,
    base_url: String,
}

impl ExchangeClient {
    pub fn new(base_url: String) -> Result<Self, FeedError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl OrderSource for ExchangeClient {
    #[instrument(
        skip(self),
        fields(instrument = %instrument),
        level = "debug"
    )]
    async fn fetch_orders(
        &self,
        instrument: &Instrument,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OrderRecord>, FeedError> {
        let url = format!("{}/v1/stateless/orders", self.base_url);

        let start_param = start.to_rfc3339();
        let end_param = end.to_rfc3339();

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("contract_id", instrument.as_str()),
                ("sort_by", "placed_at"),
                ("sort_order", "asc"),
                ("placed_at_or_after", start_param.as_str()),
                ("placed_before", end_param.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let orders: Vec<OrderRecord> = resp.json().await?;

        debug!(count = orders.len(), "orders fetched");

        Ok(orders)
    }
}

//! Exchange feed adapter.
//!
//! Responsibilities:
//!   • Query the exchange's stateless order API over HTTP
//!   • Collapse each fixed sample window of orders into one normalized Tick
//!   • Keep the sampled window a constant drift behind real time
//!
//! Everything downstream of the emitted `Tick` (EMA, spread, signals,
//! persistence) lives outside this module.

pub mod client;
pub mod errors;
pub mod poller;
pub mod sampler;
pub mod types;

pub use client::ExchangeClient;
pub use errors::FeedError;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::Instrument;
use self::types::OrderRecord;

/// Read-only view of the exchange order log.
///
/// The poller is generic over this so tests can feed it canned order
/// windows instead of a live exchange.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Orders placed in `[start, end)`, sorted by placement time ascending.
    async fn fetch_orders(
        &self,
        instrument: &Instrument,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OrderRecord>, FeedError>;
}

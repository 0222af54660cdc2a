//! Runner for the signal engine.
//!
//! Wires the pieces together the way a deployment does:
//!   exchange feed poller(s) → SignalHub → SQLite store.
//!
//! Everything is configured through the environment; defaults match a local
//! exchange and a database file next to the binary.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{Instrument as _, info, warn};

use common::logger::{TraceId, init_logger, window_span};
use market::exchange::ExchangeClient;
use market::exchange::poller::{PollerConfig, run_exchange_feed};
use market::types::Instrument;
use signal::config::EngineConfig;
use signal::service::SignalHub;
use store::store::sqlite_store::SqliteMomentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("bot");

    let exchange_url = std::env::var("EXCHANGE_API_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://bot.db?mode=rwc".to_string());
    let instruments =
        std::env::var("INSTRUMENTS").unwrap_or_else(|_| "UK-BL-MAR-25".to_string());

    let config = EngineConfig::from_env();

    let store = Arc::new(SqliteMomentStore::new(&database_url).await?);
    let hub = SignalHub::new(config, store);

    let client = ExchangeClient::new(exchange_url)?;

    let (tick_tx, mut tick_rx) = mpsc::channel(256);

    for code in instruments.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let instrument = Instrument::new(code);
        let client = client.clone();
        let tx = tick_tx.clone();

        tokio::spawn(async move {
            let result =
                run_exchange_feed(client, instrument.clone(), PollerConfig::default(), tx).await;

            if let Err(e) = result {
                warn!(instrument = %instrument, error = %e, "feed poller stopped");
            }
        });
    }
    drop(tick_tx);

    info!("signal engine running");

    while let Some(tick) = tick_rx.recv().await {
        let trace = TraceId::new();

        async {
            if let Err(e) = hub.ingest(tick).await {
                warn!(error = %e, "tick not ingested");
            }
        }
        .instrument(window_span(&trace))
        .await;
    }

    Ok(())
}

//! SignalHub
//!
//! The tick ingest boundary. Responsibilities:
//!   • Route each tick to a per-instrument worker task over a bounded
//!     channel (FIFO per instrument, so the EMA recurrence sees ticks in
//!     order)
//!   • Spawn a worker on an instrument's first tick, resuming EMA state
//!     from storage before consuming anything
//!   • Broadcast every persisted TradingSignal to that instrument's
//!     subscribers
//!
//! Distinct instruments share no mutable state and run fully parallel.
//! Bounded channels block the producer instead of dropping ticks: losing a
//! price moment would corrupt the EMA recurrence irrecoverably.
//!
//! SignalHub is an Arc-managed async service so long-lived worker tasks
//! may safely capture it without lifetime issues.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{error, info, warn};

use common::logger::instrument_span;
use market::types::{Instrument, Tick};
use store::store::MomentStore;

use crate::config::EngineConfig;
use crate::engine::SignalEngine;
use crate::types::{EngineError, SignalSender};

type WorkerMap = Arc<Mutex<HashMap<Instrument, Sender<Tick>>>>;
type SubscriberMap = Arc<Mutex<HashMap<Instrument, Vec<SignalSender>>>>;

pub struct SignalHub<S> {
    config: EngineConfig,
    store: Arc<S>,

    /// Ingest channels indexed by instrument.
    workers: WorkerMap,

    /// Components interested in an instrument's signal stream.
    subscribers: SubscriberMap,
}

impl<S: MomentStore + 'static> SignalHub<S> {
    pub fn new(config: EngineConfig, store: Arc<S>) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            workers: Arc::new(Mutex::new(HashMap::new())),
            subscribers: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Register a consumer for an instrument's signal stream.
    pub async fn subscribe(&self, instrument: Instrument, sender: SignalSender) {
        let mut subs = self.subscribers.lock().await;
        subs.entry(instrument).or_default().push(sender);
    }

    /// Feed one tick into the pipeline.
    ///
    /// Blocks while the instrument's queue is full (backpressure). Returns
    /// `WorkerStopped` when the worker died on a fatal storage failure; a
    /// retried ingest spawns a replacement that resumes from the last
    /// persisted EMA row.
    pub async fn ingest(&self, tick: Tick) -> Result<(), EngineError> {
        let tx = self.worker_for(&tick.instrument).await?;

        if tx.send(tick).await.is_err() {
            return Err(EngineError::WorkerStopped);
        }

        Ok(())
    }

    async fn worker_for(&self, instrument: &Instrument) -> Result<Sender<Tick>, EngineError> {
        let mut workers = self.workers.lock().await;

        if let Some(tx) = workers.get(instrument) {
            if !tx.is_closed() {
                return Ok(tx.clone());
            }
            // Stale entry left by a dead worker: replace it.
            workers.remove(instrument);
        }

        let engine = SignalEngine::resume(
            instrument.clone(),
            self.config.clone(),
            Arc::clone(&self.store),
        )
        .await?;

        let (tx, rx) = mpsc::channel(self.config.queue_capacity);

        info!(instrument = %instrument, "spawning instrument worker");

        let worker = run_worker(
            engine,
            rx,
            tx.downgrade(),
            Arc::clone(&self.workers),
            Arc::clone(&self.subscribers),
        );
        tokio::spawn(tracing::Instrument::instrument(
            worker,
            instrument_span(instrument.as_str()),
        ));

        workers.insert(instrument.clone(), tx.clone());

        Ok(tx)
    }
}

/// Single-writer loop for one instrument.
///
/// Per-tick rejections (malformed tick, invalid price) are logged and
/// skipped; the recurrence continues with the next tick. A storage failure
/// is fatal for the worker: it deregisters itself so the next ingest can
/// respawn from the last persisted state.
async fn run_worker<S: MomentStore>(
    mut engine: SignalEngine<S>,
    mut rx: Receiver<Tick>,
    own_tx: mpsc::WeakSender<Tick>,
    workers: WorkerMap,
    subscribers: SubscriberMap,
) {
    while let Some(tick) = rx.recv().await {
        match engine.on_tick(&tick).await {
            Ok(signal) => {
                let subs = subscribers.lock().await;

                if let Some(channels) = subs.get(engine.instrument()) {
                    for ch in channels {
                        let _ = ch.send(signal.clone()).await;
                    }
                }
            }

            Err(EngineError::InvalidTick(reason)) => {
                warn!(instrument = %engine.instrument(), reason, "tick rejected");
            }

            Err(EngineError::Pulse(e)) => {
                warn!(instrument = %engine.instrument(), error = %e, "tick rejected by pulse");
            }

            Err(e) => {
                error!(
                    instrument = %engine.instrument(),
                    error = %e,
                    "persistence failure, stopping worker"
                );

                // Deregister only our own channel; a replacement may
                // already have been registered by a racing ingest.
                let mut map = workers.lock().await;
                let ours = map
                    .get(engine.instrument())
                    .zip(own_tx.upgrade())
                    .is_some_and(|(t, own)| t.same_channel(&own));
                if ours {
                    map.remove(engine.instrument());
                }
                return;
            }
        }
    }
}

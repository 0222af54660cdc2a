//! Shared types used by the signal pipeline.

use thiserror::Error;

use tokio::sync::mpsc::Sender;

use store::model::TradingSignal;

/// Errors surfaced by the pipeline for a single tick.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed tick from the feed: missing or negative required field.
    /// Rejected before anything is persisted.
    #[error("invalid tick: {0}")]
    InvalidTick(String),

    /// Rejected by a pulse (e.g. non-positive price into the EMA
    /// recurrence). Pulse state is left unchanged.
    #[error(transparent)]
    Pulse(#[from] market::pulse::PulseError),

    /// Storage failure, surfaced unmodified. The engine performs no
    /// retries of its own; replaying a stateful EMA update is unsafe
    /// without idempotency tracking at the storage boundary.
    #[error("store error: {0}")]
    Store(anyhow::Error),

    /// The instrument's worker has stopped (fatal storage failure). A
    /// later ingest spawns a fresh worker that resumes from storage.
    #[error("worker stopped for this instrument")]
    WorkerStopped,
}

/// Convenience alias for a subscriber's signal channel.
///
/// Strategy collaborators receive every persisted `TradingSignal` for the
/// instruments they subscribed to.
pub type SignalSender = Sender<TradingSignal>;

pub mod sqlite_store;

use async_trait::async_trait;

use market::pulse::momentum::MomentumReading;
use market::pulse::spread::SpreadReading;
use market::types::{Instrument, Tick};

use crate::model::{EmaCalculation, PriceMoment, SignalDraft, SpreadAnalysis, TradingSignal};

/// Append-only persistence boundary for the signal engine.
///
/// Implementations only ever insert; the engine never updates or deletes a
/// row, and ids are assigned by the storage layer.
#[async_trait]
pub trait MomentStore: Send + Sync {
    async fn insert_moment(&self, tick: &Tick) -> anyhow::Result<PriceMoment>;

    async fn insert_ema(
        &self,
        instrument: &Instrument,
        reading: &MomentumReading,
    ) -> anyhow::Result<EmaCalculation>;

    async fn insert_spread(
        &self,
        instrument: &Instrument,
        reading: &SpreadReading,
    ) -> anyhow::Result<SpreadAnalysis>;

    async fn insert_signal(
        &self,
        instrument: &Instrument,
        draft: &SignalDraft,
    ) -> anyhow::Result<TradingSignal>;

    /// Last persisted EMA row for an instrument. The engine resumes its
    /// recurrence from here after a restart.
    async fn latest_ema(&self, instrument: &Instrument) -> anyhow::Result<Option<EmaCalculation>>;

    /// Most recent signals, newest first. Read-only surface for strategy
    /// collaborators.
    async fn recent_signals(
        &self,
        instrument: &Instrument,
        limit: u32,
    ) -> anyhow::Result<Vec<TradingSignal>>;
}

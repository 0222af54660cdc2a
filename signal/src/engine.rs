//! Per-instrument signal pipeline.
//!
//! One engine owns the analytics state for exactly one instrument and must
//! only ever be driven by a single writer: EMA and momentum are
//! order-dependent recurrences, so ticks for an instrument have to be
//! applied in timestamp order. The hub guarantees this by giving each
//! instrument its own worker task.

use std::sync::Arc;

use tracing::debug;

use market::pulse::momentum::MomentumPulse;
use market::pulse::spread::SpreadPulse;
use market::types::{Instrument, Tick};
use store::model::TradingSignal;
use store::store::MomentStore;

use crate::config::EngineConfig;
use crate::recorder::MomentRecorder;
use crate::synth;
use crate::types::EngineError;

pub struct SignalEngine<S> {
    instrument: Instrument,
    config: EngineConfig,
    recorder: MomentRecorder<S>,
    momentum: MomentumPulse,
    spread: SpreadPulse,
    store: Arc<S>,
}

impl<S: MomentStore> SignalEngine<S> {
    pub fn new(instrument: Instrument, config: EngineConfig, store: Arc<S>) -> Self {
        Self {
            recorder: MomentRecorder::new(Arc::clone(&store)),
            momentum: MomentumPulse::new(config.periods),
            spread: SpreadPulse::new(config.spread),
            instrument,
            config,
            store,
        }
    }

    /// Build an engine whose EMA recurrence continues from the last
    /// persisted calculation, if any. `ema_short`/`ema_long` of that row
    /// are the full recoverable state.
    pub async fn resume(
        instrument: Instrument,
        config: EngineConfig,
        store: Arc<S>,
    ) -> Result<Self, EngineError> {
        let mut engine = Self::new(instrument, config, store);

        if let Some(ema) = engine
            .store
            .latest_ema(&engine.instrument)
            .await
            .map_err(EngineError::Store)?
        {
            engine.momentum =
                MomentumPulse::resume(engine.config.periods, ema.ema_short, ema.ema_long);

            debug!(
                instrument = %engine.instrument,
                ema_short = ema.ema_short,
                ema_long = ema.ema_long,
                "resumed ema state from storage"
            );
        }

        Ok(engine)
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Run one tick through the full pipeline:
    /// record moment → EMA update → spread analysis → synthesis → persist.
    ///
    /// A failure leaves previously persisted rows in place (the log is
    /// append-only, there is nothing to roll back) and surfaces to the
    /// caller without retry.
    pub async fn on_tick(&mut self, tick: &Tick) -> Result<TradingSignal, EngineError> {
        self.recorder.record(tick).await?;

        let momentum = self.momentum.evaluate(tick.ts_ms, tick.price)?;

        let spread =
            self.spread
                .evaluate(tick.ts_ms, tick.best_bid, tick.best_ask, Some(tick.volume));

        self.store
            .insert_ema(&self.instrument, &momentum)
            .await
            .map_err(EngineError::Store)?;

        self.store
            .insert_spread(&self.instrument, &spread)
            .await
            .map_err(EngineError::Store)?;

        let draft = synth::synthesize(&momentum, &spread, &self.config.synth);

        let signal = self
            .store
            .insert_signal(&self.instrument, &draft)
            .await
            .map_err(EngineError::Store)?;

        debug!(
            instrument = %self.instrument,
            strength = signal.signal_strength,
            action = %signal.recommended_action,
            "signal synthesized"
        );

        Ok(signal)
    }
}

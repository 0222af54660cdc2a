//! Moment recorder.
//!
//! Validates each incoming tick and hands it to the persistence
//! collaborator as an immutable price moment. Validation is deliberately
//! pure: no async, no IO. The recorder never deduplicates and never
//! retries; replaying an identical tick produces a second row.

use std::sync::Arc;

use market::types::Tick;
use store::model::PriceMoment;
use store::store::MomentStore;

use crate::types::EngineError;

/// Reject ticks with missing or negative required fields.
///
/// A zero price passes here (a printed price of zero is representable);
/// the EMA engine rejects it separately because the recurrence needs
/// strictly positive input.
pub fn validate_tick(tick: &Tick) -> Result<(), EngineError> {
    if tick.instrument.as_str().is_empty() {
        return Err(EngineError::InvalidTick("empty instrument".into()));
    }

    if !tick.price.is_finite() || tick.price < 0.0 {
        return Err(EngineError::InvalidTick(format!(
            "bad price: {}",
            tick.price
        )));
    }

    if !tick.volume.is_finite() || tick.volume < 0.0 {
        return Err(EngineError::InvalidTick(format!(
            "bad volume: {}",
            tick.volume
        )));
    }

    for (side, value) in [("best_bid", tick.best_bid), ("best_ask", tick.best_ask)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(EngineError::InvalidTick(format!("bad {}: {}", side, v)));
            }
        }
    }

    Ok(())
}

/// Persists validated ticks as immutable price moments.
pub struct MomentRecorder<S> {
    store: Arc<S>,
}

impl<S: MomentStore> MomentRecorder<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn record(&self, tick: &Tick) -> Result<PriceMoment, EngineError> {
        validate_tick(tick)?;

        self.store
            .insert_moment(tick)
            .await
            .map_err(EngineError::Store)
    }
}
